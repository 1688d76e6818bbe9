// Public API - what other modules can use
pub use handlers::login;
pub use middleware::bearer_auth;
pub use token::TokenConfig;
pub use types::{AccessClaims, LoginRequest, LoginResponse};

// Internal modules
mod handlers;
mod middleware;
mod token;
pub mod types;
