use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    models::AttendanceModel,
    repository::AttendanceRepository,
    side_log::{ScanEntry, ScanSink},
};
use crate::shared::AppError;
use crate::student::{models::StudentModel, repository::StudentRepository, StudentService};

/// Service for the attendance ledger
pub struct AttendanceService {
    student_repository: Arc<dyn StudentRepository + Send + Sync>,
    attendance_repository: Arc<dyn AttendanceRepository + Send + Sync>,
    scan_sink: Arc<dyn ScanSink + Send + Sync>,
}

impl AttendanceService {
    pub fn new(
        student_repository: Arc<dyn StudentRepository + Send + Sync>,
        attendance_repository: Arc<dyn AttendanceRepository + Send + Sync>,
        scan_sink: Arc<dyn ScanSink + Send + Sync>,
    ) -> Self {
        Self {
            student_repository,
            attendance_repository,
            scan_sink,
        }
    }

    /// Logs an RFID scan: resolves the card to a student, appends a
    /// UTC-stamped record, then attempts the best-effort side log.
    /// Repeated scans append repeated records; there is no
    /// de-duplication window.
    #[instrument(skip(self))]
    pub async fn log_scan(
        &self,
        card_uid: &str,
    ) -> Result<(StudentModel, AttendanceModel), AppError> {
        debug!(card_uid = %card_uid, "Logging RFID scan");

        // Card resolution goes through the credential store
        let student = StudentService::new(Arc::clone(&self.student_repository))
            .find_by_card(card_uid)
            .await?;

        let record = AttendanceModel::new(student.id);
        self.attendance_repository.insert_record(&record).await?;

        info!(
            student_id = %student.student_id_str,
            record_id = %record.id,
            "Attendance recorded"
        );

        // Best-effort side log: a failed write is logged and swallowed,
        // never surfaced to the caller
        let entry = ScanEntry {
            timestamp: record.timestamp,
            student_id_str: student.student_id_str.clone(),
            name: student.name.clone(),
            card_uid: student.card_uid.clone(),
        };
        if let Err(e) = self.scan_sink.record(&entry).await {
            warn!(error = %e, card_uid = %card_uid, "Side-log write failed");
        }

        Ok((student, record))
    }

    /// Returns all attendance records for a student, natural storage order
    #[instrument(skip(self))]
    pub async fn list_for(&self, student_id: Uuid) -> Result<Vec<AttendanceModel>, AppError> {
        debug!(student_id = %student_id, "Listing attendance records");

        let records = self
            .attendance_repository
            .list_for_student(student_id)
            .await?;

        info!(
            student_id = %student_id,
            record_count = records.len(),
            "Attendance records retrieved"
        );
        Ok(records)
    }
}
