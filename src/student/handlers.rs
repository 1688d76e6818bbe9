use axum::{extract::State, Extension, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::StudentModel,
    service::StudentService,
    types::{RegisterRequest, RegisterResponse, StudentResponse},
};
use crate::shared::{AppError, AppState};

/// HTTP handler for registering a new student
///
/// POST /api/students/register
/// Returns a confirmation message; 400 when the student ID or card UID is taken
#[instrument(name = "register_student", skip(state, request))]
pub async fn register_student(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    info!(student_id = %request.student_id_str, "Registering new student");

    // Use injected repository from app state
    let service = StudentService::new(Arc::clone(&state.student_repository));
    let student = service.register(request).await?;

    info!(
        student_id = %student.student_id_str,
        "Student registered successfully"
    );

    Ok(Json(RegisterResponse {
        message: format!("Student {} registered successfully.", student.name),
    }))
}

/// HTTP handler returning the authenticated student's own record
///
/// GET /api/students/me
/// The bearer-auth middleware resolves the token to a StudentModel
/// and places it in the request extensions.
#[instrument(name = "read_students_me", skip(student))]
pub async fn read_students_me(
    Extension(student): Extension<StudentModel>,
) -> Json<StudentResponse> {
    Json(StudentResponse::from(&student))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    fn register_app() -> Router {
        let app_state = AppStateBuilder::new().build();
        Router::new()
            .route(
                "/api/students/register",
                axum::routing::post(register_student),
            )
            .with_state(app_state)
    }

    fn register_body(student_id: &str, card_uid: &str) -> String {
        format!(
            r#"{{"student_id_str": "{}", "name": "Alice", "card_uid": "{}", "password": "pw"}}"#,
            student_id, card_uid
        )
    }

    fn post_register(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/students/register")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_handler() {
        let app = register_app();

        let response = app.oneshot(post_register(register_body("S1", "C1"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let register_response: RegisterResponse = serde_json::from_slice(&body).unwrap();
        assert!(register_response.message.contains("Alice"));
    }

    #[tokio::test]
    async fn test_register_duplicate_returns_400() {
        let app = register_app();

        let first = app
            .clone()
            .oneshot(post_register(register_body("S1", "C1")))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .oneshot(post_register(register_body("S1", "C2")))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_register_handler_missing_field() {
        let app = register_app();

        let request = post_register(r#"{"student_id_str": "S1"}"#.to_string());
        let response = app.oneshot(request).await.unwrap();

        // Missing fields fail JSON deserialization
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
