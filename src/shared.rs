use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::attendance::repository::AttendanceRepository;
use crate::attendance::side_log::ScanSink;
use crate::auth::TokenConfig;
use crate::student::repository::StudentRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub student_repository: Arc<dyn StudentRepository + Send + Sync>,
    pub attendance_repository: Arc<dyn AttendanceRepository + Send + Sync>,
    pub token_config: TokenConfig,
    pub scan_sink: Arc<dyn ScanSink + Send + Sync>,
}

impl AppState {
    pub fn new(
        student_repository: Arc<dyn StudentRepository + Send + Sync>,
        attendance_repository: Arc<dyn AttendanceRepository + Send + Sync>,
        token_config: TokenConfig,
        scan_sink: Arc<dyn ScanSink + Send + Sync>,
    ) -> Self {
        Self {
            student_repository,
            attendance_repository,
            token_config,
            scan_sink,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Student already registered: {0}")]
    DuplicateStudent(String),

    #[error("Incorrect student ID or password")]
    AuthenticationFailed,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Unknown card: {0}")]
    UnknownCard(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::DuplicateStudent(msg) => (
                StatusCode::BAD_REQUEST,
                format!("Student already registered: {}", msg),
            ),
            // Unknown user and wrong password must report identically
            AppError::AuthenticationFailed => (
                StatusCode::UNAUTHORIZED,
                "Incorrect student ID or password".to_string(),
            ),
            AppError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::UnknownCard(card_uid) => (
                StatusCode::NOT_FOUND,
                format!("Student with card UID {} not found", card_uid),
            ),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
