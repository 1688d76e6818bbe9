use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::AttendanceModel;
use crate::shared::AppError;

/// Trait for attendance ledger storage. The ledger is append-only:
/// there are no update or delete operations.
#[async_trait]
pub trait AttendanceRepository {
    async fn insert_record(&self, record: &AttendanceModel) -> Result<(), AppError>;
    /// Returns all records for a student in natural storage order
    async fn list_for_student(&self, student_id: Uuid) -> Result<Vec<AttendanceModel>, AppError>;
}

/// In-memory implementation of AttendanceRepository for development and testing
pub struct InMemoryAttendanceRepository {
    records: Mutex<Vec<AttendanceModel>>,
}

impl Default for InMemoryAttendanceRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAttendanceRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Returns the total number of records in the ledger
    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryAttendanceRepository {
    #[instrument(skip(self, record))]
    async fn insert_record(&self, record: &AttendanceModel) -> Result<(), AppError> {
        debug!(record_id = %record.id, student_id = %record.student_id, "Appending attendance record in memory");

        let mut records = self.records.lock().unwrap();
        records.push(record.clone());

        debug!(record_id = %record.id, "Attendance record appended in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_for_student(&self, student_id: Uuid) -> Result<Vec<AttendanceModel>, AppError> {
        debug!(student_id = %student_id, "Listing attendance records from memory");

        let records = self.records.lock().unwrap();
        let matching: Vec<AttendanceModel> = records
            .iter()
            .filter(|r| r.student_id == student_id)
            .cloned()
            .collect();

        debug!(
            student_id = %student_id,
            record_count = matching.len(),
            "Attendance records listed from memory"
        );
        Ok(matching)
    }
}

/// PostgreSQL implementation of the attendance repository
pub struct PostgresAttendanceRepository {
    pool: PgPool,
}

impl PostgresAttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceRepository for PostgresAttendanceRepository {
    #[instrument(skip(self, record))]
    async fn insert_record(&self, record: &AttendanceModel) -> Result<(), AppError> {
        debug!(record_id = %record.id, student_id = %record.student_id, "Appending attendance record in database");

        // Scoped transaction: committed on success, rolled back on drop
        let mut tx = self.pool.begin().await.map_err(|e| {
            warn!(error = %e, "Failed to begin transaction");
            AppError::DatabaseError(e.to_string())
        })?;

        sqlx::query(
            "INSERT INTO attendance_records (id, student_id, timestamp) VALUES ($1, $2, $3)",
        )
        .bind(record.id)
        .bind(record.student_id)
        .bind(record.timestamp)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to insert attendance record");
            AppError::DatabaseError(e.to_string())
        })?;

        tx.commit().await.map_err(|e| {
            warn!(error = %e, "Failed to commit attendance record");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(record_id = %record.id, "Attendance record appended in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_for_student(&self, student_id: Uuid) -> Result<Vec<AttendanceModel>, AppError> {
        debug!(student_id = %student_id, "Listing attendance records from database");

        let rows = sqlx::query(
            "SELECT id, student_id, timestamp FROM attendance_records WHERE student_id = $1",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, student_id = %student_id, "Failed to list attendance records");
            AppError::DatabaseError(e.to_string())
        })?;

        let records = rows
            .into_iter()
            .map(|row| AttendanceModel {
                id: row.get("id"),
                student_id: row.get("student_id"),
                timestamp: row.get("timestamp"),
            })
            .collect();

        Ok(records)
    }
}
