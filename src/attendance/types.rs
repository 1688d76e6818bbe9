use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::AttendanceModel;

/// Query parameters for the RFID scan endpoint
#[derive(Debug, Deserialize)]
pub struct ScanQuery {
    pub card_uid: String,
}

/// Response for a successfully logged scan
#[derive(Debug, Serialize, Deserialize)]
pub struct ScanResponse {
    pub message: String,
}

/// Public view of one attendance record
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AttendanceResponse {
    pub timestamp: DateTime<Utc>,
}

impl From<&AttendanceModel> for AttendanceResponse {
    fn from(record: &AttendanceModel) -> Self {
        Self {
            timestamp: record.timestamp,
        }
    }
}
