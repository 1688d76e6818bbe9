// Public API - what other modules can use
pub use handlers::{log_attendance_from_rfid, read_own_attendance};
pub use service::AttendanceService;
pub use types::{AttendanceResponse, ScanQuery, ScanResponse};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod side_log;
pub mod types;
