use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::types::{LoginRequest, LoginResponse};
use crate::shared::{AppError, AppState};
use crate::student::StudentService;

/// HTTP handler for logging in with student credentials
///
/// POST /api/auth/login
/// Returns a bearer access token on success; 401 on bad credentials
#[instrument(name = "login", skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    info!(student_id = %request.student_id_str, "Login attempt");

    let service = StudentService::new(Arc::clone(&state.student_repository));
    let student = service
        .verify_credentials(&request.student_id_str, &request.password)
        .await?;

    let access_token = state.token_config.create_token(student.student_id_str)?;

    info!(student_id = %request.student_id_str, "Login successful");

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
