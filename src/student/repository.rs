use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::StudentModel;
use crate::shared::AppError;

/// Trait for student storage operations
#[async_trait]
pub trait StudentRepository {
    /// Inserts a new student. Fails with `DuplicateStudent` when the
    /// student identifier or card UID is already taken.
    async fn insert_student(&self, student: &StudentModel) -> Result<(), AppError>;
    async fn find_by_student_id(&self, student_id_str: &str)
        -> Result<Option<StudentModel>, AppError>;
    async fn find_by_card_uid(&self, card_uid: &str) -> Result<Option<StudentModel>, AppError>;
}

/// In-memory implementation of StudentRepository for development and testing
///
/// Provides the same uniqueness guarantees as the Postgres schema without
/// requiring a database connection. Data is lost on restart.
pub struct InMemoryStudentRepository {
    students: Mutex<HashMap<Uuid, StudentModel>>,
}

impl Default for InMemoryStudentRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStudentRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            students: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the current number of registered students
    pub fn student_count(&self) -> usize {
        self.students.lock().unwrap().len()
    }
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    #[instrument(skip(self, student))]
    async fn insert_student(&self, student: &StudentModel) -> Result<(), AppError> {
        debug!(
            student_id = %student.student_id_str,
            card_uid = %student.card_uid,
            "Inserting student in memory"
        );

        let mut students = self.students.lock().unwrap();
        let taken = students.values().any(|existing| {
            existing.student_id_str == student.student_id_str
                || existing.card_uid == student.card_uid
        });
        if taken {
            warn!(student_id = %student.student_id_str, "Student identifier or card UID already taken");
            return Err(AppError::DuplicateStudent(student.student_id_str.clone()));
        }
        students.insert(student.id, student.clone());

        debug!(student_id = %student.student_id_str, "Student inserted successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_student_id(
        &self,
        student_id_str: &str,
    ) -> Result<Option<StudentModel>, AppError> {
        debug!(student_id = %student_id_str, "Fetching student from memory");

        let students = self.students.lock().unwrap();
        let student = students
            .values()
            .find(|s| s.student_id_str == student_id_str)
            .cloned();

        match &student {
            Some(s) => debug!(student_id = %student_id_str, name = %s.name, "Student found in memory"),
            None => debug!(student_id = %student_id_str, "Student not found in memory"),
        }

        Ok(student)
    }

    #[instrument(skip(self))]
    async fn find_by_card_uid(&self, card_uid: &str) -> Result<Option<StudentModel>, AppError> {
        debug!(card_uid = %card_uid, "Looking up card in memory");

        let students = self.students.lock().unwrap();
        let student = students.values().find(|s| s.card_uid == card_uid).cloned();

        match &student {
            Some(s) => debug!(card_uid = %card_uid, student_id = %s.student_id_str, "Card resolved in memory"),
            None => debug!(card_uid = %card_uid, "Card not registered"),
        }

        Ok(student)
    }
}

/// PostgreSQL implementation of the student repository
pub struct PostgresStudentRepository {
    pool: PgPool,
}

impl PostgresStudentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_student(row: sqlx::postgres::PgRow) -> StudentModel {
    StudentModel {
        id: row.get("id"),
        student_id_str: row.get("student_id_str"),
        name: row.get("name"),
        card_uid: row.get("card_uid"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl StudentRepository for PostgresStudentRepository {
    #[instrument(skip(self, student))]
    async fn insert_student(&self, student: &StudentModel) -> Result<(), AppError> {
        debug!(
            student_id = %student.student_id_str,
            card_uid = %student.card_uid,
            "Inserting student in database"
        );

        sqlx::query(
            "INSERT INTO students (id, student_id_str, name, card_uid, password_hash, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(student.id)
        .bind(&student.student_id_str)
        .bind(&student.name)
        .bind(&student.card_uid)
        .bind(&student.password_hash)
        .bind(student.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // Concurrent registrations race at the unique constraints;
            // surface the conflict rather than a generic failure
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.code().as_deref() == Some("23505") {
                    warn!(student_id = %student.student_id_str, "Unique constraint violated on insert");
                    return AppError::DuplicateStudent(student.student_id_str.clone());
                }
            }
            warn!(error = %e, "Failed to insert student in database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(student_id = %student.student_id_str, "Student inserted successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_student_id(
        &self,
        student_id_str: &str,
    ) -> Result<Option<StudentModel>, AppError> {
        debug!(student_id = %student_id_str, "Fetching student from database");

        let row = sqlx::query(
            "SELECT id, student_id_str, name, card_uid, password_hash, created_at \
             FROM students WHERE student_id_str = $1",
        )
        .bind(student_id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, student_id = %student_id_str, "Failed to fetch student from database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(row_to_student))
    }

    #[instrument(skip(self))]
    async fn find_by_card_uid(&self, card_uid: &str) -> Result<Option<StudentModel>, AppError> {
        debug!(card_uid = %card_uid, "Looking up card in database");

        let row = sqlx::query(
            "SELECT id, student_id_str, name, card_uid, password_hash, created_at \
             FROM students WHERE card_uid = $1",
        )
        .bind(card_uid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, card_uid = %card_uid, "Failed to look up card in database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(row_to_student))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Test helper functions for creating test data
    mod helpers {
        use super::*;

        pub fn create_test_student(student_id: &str, card_uid: &str) -> StudentModel {
            StudentModel::new(
                student_id.to_string(),
                format!("Student {}", student_id),
                card_uid.to_string(),
                "$argon2id$test-hash".to_string(),
            )
        }
    }

    use helpers::*;

    #[tokio::test]
    async fn test_insert_and_find_by_student_id() {
        let repo = InMemoryStudentRepository::new();
        let student = create_test_student("S1", "C1");

        repo.insert_student(&student).await.unwrap();

        let retrieved = repo.find_by_student_id("S1").await.unwrap();
        assert!(retrieved.is_some());
        let retrieved_student = retrieved.unwrap();
        assert_eq!(retrieved_student.id, student.id);
        assert_eq!(retrieved_student.card_uid, "C1");
    }

    #[tokio::test]
    async fn test_find_nonexistent_student() {
        let repo = InMemoryStudentRepository::new();

        let result = repo.find_by_student_id("missing").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_student_id_rejected() {
        let repo = InMemoryStudentRepository::new();
        let first = create_test_student("S1", "C1");
        let second = create_test_student("S1", "C2");

        repo.insert_student(&first).await.unwrap();

        let result = repo.insert_student(&second).await;
        assert!(matches!(result, Err(AppError::DuplicateStudent(_))));

        // First record is unchanged
        let retrieved = repo.find_by_student_id("S1").await.unwrap().unwrap();
        assert_eq!(retrieved.id, first.id);
        assert_eq!(retrieved.card_uid, "C1");
    }

    #[tokio::test]
    async fn test_duplicate_card_uid_rejected() {
        let repo = InMemoryStudentRepository::new();
        let first = create_test_student("S1", "C1");
        let second = create_test_student("S2", "C1");

        repo.insert_student(&first).await.unwrap();

        let result = repo.insert_student(&second).await;
        assert!(matches!(result, Err(AppError::DuplicateStudent(_))));
        assert_eq!(repo.student_count(), 1);
    }

    #[tokio::test]
    async fn test_find_by_card_uid() {
        let repo = InMemoryStudentRepository::new();
        let student = create_test_student("S1", "CARD-42");

        repo.insert_student(&student).await.unwrap();

        let found = repo.find_by_card_uid("CARD-42").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().student_id_str, "S1");

        let missing = repo.find_by_card_uid("CARD-99").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_distinct_registrations_independent() {
        let repo = InMemoryStudentRepository::new();

        for i in 0..3 {
            let student = create_test_student(&format!("S{}", i), &format!("C{}", i));
            repo.insert_student(&student).await.unwrap();
        }

        assert_eq!(repo.student_count(), 3);
        for i in 0..3 {
            let found = repo.find_by_student_id(&format!("S{}", i)).await.unwrap();
            assert!(found.is_some());
        }
    }
}
