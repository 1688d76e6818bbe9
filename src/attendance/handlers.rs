use axum::{
    extract::{Query, State},
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::AttendanceService,
    types::{AttendanceResponse, ScanQuery, ScanResponse},
};
use crate::shared::{AppError, AppState};
use crate::student::models::StudentModel;

/// HTTP handler for logging an RFID scan
///
/// POST /api/attendance/rfid-log?card_uid=...
/// Unauthenticated device endpoint; 404 when the card is not registered
#[instrument(name = "log_attendance_from_rfid", skip(state))]
pub async fn log_attendance_from_rfid(
    State(state): State<AppState>,
    Query(query): Query<ScanQuery>,
) -> Result<Json<ScanResponse>, AppError> {
    info!(card_uid = %query.card_uid, "RFID scan received");

    let service = AttendanceService::new(
        Arc::clone(&state.student_repository),
        Arc::clone(&state.attendance_repository),
        Arc::clone(&state.scan_sink),
    );
    let (student, record) = service.log_scan(&query.card_uid).await?;

    info!(
        student_id = %student.student_id_str,
        record_id = %record.id,
        "Attendance logged successfully"
    );

    Ok(Json(ScanResponse {
        message: format!("Attendance logged successfully for {}", student.name),
    }))
}

/// HTTP handler returning the authenticated student's attendance history
///
/// GET /api/attendance/me
/// Order follows natural storage order; nothing is contractually sorted
#[instrument(name = "read_own_attendance", skip(state, student))]
pub async fn read_own_attendance(
    State(state): State<AppState>,
    Extension(student): Extension<StudentModel>,
) -> Result<Json<Vec<AttendanceResponse>>, AppError> {
    info!(student_id = %student.student_id_str, "Listing own attendance");

    let service = AttendanceService::new(
        Arc::clone(&state.student_repository),
        Arc::clone(&state.attendance_repository),
        Arc::clone(&state.scan_sink),
    );
    let records = service.list_for(student.id).await?;

    Ok(Json(records.iter().map(AttendanceResponse::from).collect()))
}
