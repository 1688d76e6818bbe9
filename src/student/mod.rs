// Public API - what other modules can use
pub use handlers::{read_students_me, register_student};
pub use service::StudentService;
pub use types::{RegisterRequest, RegisterResponse, StudentResponse};

// Internal modules
mod handlers;
pub mod models;
mod password;
pub mod repository;
pub mod service;
pub mod types;
