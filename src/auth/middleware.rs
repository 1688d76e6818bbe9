use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::shared::{AppError, AppState};
use crate::student::StudentService;

/// Bearer authentication middleware - validates the Authorization header
/// and resolves the token subject to a registered student.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), auth::bearer_auth))
/// Handlers can then extract Extension(student): Extension<StudentModel>.
#[instrument(skip(state, req, next))]
pub async fn bearer_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    debug!("Bearer authentication triggered for request {}", req.uri());

    // Extract token from Authorization Bearer header
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing Authorization header in request");
            AppError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Invalid Authorization header format (expected Bearer token)");
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })?;

    // Signature and expiry check first, then resolve the subject;
    // a token for a student that no longer resolves is also a 401
    let claims = state.token_config.validate_token(token)?;

    let service = StudentService::new(Arc::clone(&state.student_repository));
    let student = service.resolve_subject(&claims.sub).await?;

    debug!(
        student_id = %student.student_id_str,
        "Authentication successful, adding student to request"
    );

    // Add the resolved student to request extensions for handlers to use
    req.extensions_mut().insert(student);

    Ok(next.run(req).await)
}
