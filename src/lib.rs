// Library crate for the campus attendance backend
// This file exposes the public API for integration tests

pub mod attendance;
pub mod auth;
pub mod config;
pub mod shared;
pub mod student;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use shared::{AppError, AppState};

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

async fn root_status() -> Json<Value> {
    Json(json!({ "status": "Smart Campus Backend is running!" }))
}

/// Builds the full API router over the given application state.
/// The /me endpoints sit behind the bearer-auth middleware; everything
/// else (including the RFID device endpoint) is unauthenticated.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/students/me", get(student::read_students_me))
        .route("/api/attendance/me", get(attendance::read_own_attendance))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::bearer_auth,
        ));

    Router::new()
        .route("/", get(root_status))
        .route(
            "/api/students/register",
            post(student::register_student),
        )
        .route("/api/auth/login", post(auth::login))
        .route(
            "/api/attendance/rfid-log",
            post(attendance::log_attendance_from_rfid),
        )
        .merge(protected)
        .with_state(state)
}
