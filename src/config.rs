use std::path::PathBuf;

/// Server configuration read once at startup and passed into constructors.
/// Nothing else in the crate touches the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub scan_log_path: Option<PathBuf>,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Loads configuration from environment variables with development defaults
    pub fn from_env() -> Self {
        let token_ttl_minutes = std::env::var("TOKEN_TTL_MINUTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            database_url: std::env::var("DATABASE_URL").ok(),
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            token_ttl_minutes,
            scan_log_path: std::env::var("SCAN_LOG_PATH").ok().map(PathBuf::from),
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or_else(|_| {
                    vec![
                        "http://localhost".to_string(),
                        "http://localhost:5500".to_string(),
                        "http://127.0.0.1:5500".to_string(),
                    ]
                }),
        }
    }
}
