use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the attendance_records table.
/// Records are append-only: never mutated, never deleted.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AttendanceModel {
    pub id: Uuid,
    pub student_id: Uuid, // References students.id
    pub timestamp: DateTime<Utc>,
}

impl AttendanceModel {
    /// Creates a new record stamped with the current UTC time
    pub fn new(student_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id,
            timestamp: Utc::now(),
        }
    }
}
