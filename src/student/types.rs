use serde::{Deserialize, Serialize};

use super::models::StudentModel;

/// Request payload for registering a new student
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub student_id_str: String,
    pub name: String,
    pub card_uid: String,
    pub password: String,
}

/// Response for successful registration
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
}

/// Public view of a student, without the password hash
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StudentResponse {
    pub student_id_str: String,
    pub name: String,
    pub card_uid: String,
}

impl From<&StudentModel> for StudentResponse {
    fn from(student: &StudentModel) -> Self {
        Self {
            student_id_str: student.student_id_str.clone(),
            name: student.name.clone(),
            card_uid: student.card_uid.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_response_excludes_password_hash() {
        let student = StudentModel::new(
            "S1".to_string(),
            "Alice".to_string(),
            "C1".to_string(),
            "$argon2id$secret-hash".to_string(),
        );

        let response = StudentResponse::from(&student);
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("S1"));
        assert!(json.contains("Alice"));
        assert!(json.contains("C1"));
        assert!(!json.contains("secret-hash"));
    }
}
