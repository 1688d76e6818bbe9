use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::StudentModel, password::Argon2Hasher, repository::StudentRepository,
    types::RegisterRequest,
};
use crate::shared::AppError;

/// Service for handling student credential logic
pub struct StudentService {
    repository: Arc<dyn StudentRepository + Send + Sync>,
    hasher: Argon2Hasher,
}

impl StudentService {
    pub fn new(repository: Arc<dyn StudentRepository + Send + Sync>) -> Self {
        Self {
            repository,
            hasher: Argon2Hasher::new(),
        }
    }

    /// Registers a new student, storing only a salted hash of the password.
    /// Both the student identifier and the card UID must be unused.
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: RegisterRequest) -> Result<StudentModel, AppError> {
        debug!(student_id = %request.student_id_str, "Registering student");

        if self
            .repository
            .find_by_student_id(&request.student_id_str)
            .await?
            .is_some()
        {
            warn!(student_id = %request.student_id_str, "Student ID already registered");
            return Err(AppError::DuplicateStudent(request.student_id_str));
        }

        if self
            .repository
            .find_by_card_uid(&request.card_uid)
            .await?
            .is_some()
        {
            warn!(card_uid = %request.card_uid, "Card UID already registered");
            return Err(AppError::DuplicateStudent(request.student_id_str));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let student = StudentModel::new(
            request.student_id_str,
            request.name,
            request.card_uid,
            password_hash,
        );

        // The repository re-checks uniqueness, so a concurrent
        // registration still surfaces as a conflict
        self.repository.insert_student(&student).await?;

        info!(
            student_id = %student.student_id_str,
            name = %student.name,
            "Student registered successfully"
        );

        Ok(student)
    }

    /// Verifies login credentials. Unknown identifier and wrong password
    /// return the identical error, and the unknown-identifier path still
    /// performs one hash computation so the two cost the same.
    #[instrument(skip(self, password))]
    pub async fn verify_credentials(
        &self,
        student_id_str: &str,
        password: &str,
    ) -> Result<StudentModel, AppError> {
        debug!(student_id = %student_id_str, "Verifying credentials");

        let student = match self.repository.find_by_student_id(student_id_str).await? {
            Some(student) => student,
            None => {
                let _ = self.hasher.hash(password);
                warn!(student_id = %student_id_str, "Credential verification failed");
                return Err(AppError::AuthenticationFailed);
            }
        };

        if !self.hasher.verify(password, &student.password_hash) {
            warn!(student_id = %student_id_str, "Credential verification failed");
            return Err(AppError::AuthenticationFailed);
        }

        info!(student_id = %student_id_str, "Credentials verified");
        Ok(student)
    }

    /// Resolves a validated token subject to its student record.
    /// Tokens are not revocable, so a subject that no longer resolves
    /// is treated as an authorization failure.
    #[instrument(skip(self))]
    pub async fn resolve_subject(&self, student_id_str: &str) -> Result<StudentModel, AppError> {
        self.repository
            .find_by_student_id(student_id_str)
            .await?
            .ok_or_else(|| {
                warn!(subject = %student_id_str, "Token subject does not resolve to a student");
                AppError::Unauthorized("Could not validate credentials".to_string())
            })
    }

    /// Resolves a card UID to its registered student
    #[instrument(skip(self))]
    pub async fn find_by_card(&self, card_uid: &str) -> Result<StudentModel, AppError> {
        self.repository
            .find_by_card_uid(card_uid)
            .await?
            .ok_or_else(|| {
                warn!(card_uid = %card_uid, "Scan for unregistered card");
                AppError::UnknownCard(card_uid.to_string())
            })
    }
}
