use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the students table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct StudentModel {
    pub id: Uuid,
    pub student_id_str: String, // Human-facing identifier, unique
    pub name: String,
    pub card_uid: String, // RFID card identifier, unique
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl StudentModel {
    /// Creates a new student model with a generated internal ID.
    /// The password must already be hashed by the caller.
    pub fn new(student_id_str: String, name: String, card_uid: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id_str,
            name,
            card_uid,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_student_model() {
        let student = StudentModel::new(
            "S1".to_string(),
            "Alice".to_string(),
            "C1".to_string(),
            "$argon2id$fake".to_string(),
        );

        assert_eq!(student.student_id_str, "S1");
        assert_eq!(student.name, "Alice");
        assert_eq!(student.card_uid, "C1");
        assert!(!student.id.is_nil());
    }

    #[test]
    fn test_internal_ids_unique() {
        let a = StudentModel::new(
            "S1".to_string(),
            "Alice".to_string(),
            "C1".to_string(),
            "hash".to_string(),
        );
        let b = StudentModel::new(
            "S2".to_string(),
            "Bob".to_string(),
            "C2".to_string(),
            "hash".to_string(),
        );

        assert_ne!(a.id, b.id);
    }
}
