use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_attendance::attendance::repository::{
    AttendanceRepository, InMemoryAttendanceRepository, PostgresAttendanceRepository,
};
use campus_attendance::attendance::side_log::{CsvScanSink, NullSink, ScanSink};
use campus_attendance::auth::TokenConfig;
use campus_attendance::student::repository::{
    InMemoryStudentRepository, PostgresStudentRepository, StudentRepository,
};
use campus_attendance::{AppConfig, AppState};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus_attendance=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting campus attendance server");

    let config = AppConfig::from_env();

    // Select repositories: Postgres when DATABASE_URL is set, in-memory otherwise
    let (student_repository, attendance_repository): (
        Arc<dyn StudentRepository + Send + Sync>,
        Arc<dyn AttendanceRepository + Send + Sync>,
    ) = match &config.database_url {
        Some(database_url) => {
            // test_before_acquire checks pooled connections before reuse,
            // which long-lived cloud databases drop without notice
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .test_before_acquire(true)
                .connect(database_url)
                .await
                .expect("Failed to connect to database");
            info!("Connected to PostgreSQL");
            (
                Arc::new(PostgresStudentRepository::new(pool.clone())),
                Arc::new(PostgresAttendanceRepository::new(pool)),
            )
        }
        None => {
            info!("DATABASE_URL not set, using in-memory repositories");
            (
                Arc::new(InMemoryStudentRepository::new()),
                Arc::new(InMemoryAttendanceRepository::new()),
            )
        }
    };

    let scan_sink: Arc<dyn ScanSink + Send + Sync> = match &config.scan_log_path {
        Some(path) => {
            info!(path = %path.display(), "CSV scan log enabled");
            Arc::new(CsvScanSink::new(path.clone()))
        }
        None => Arc::new(NullSink),
    };

    let token_config = TokenConfig::new(config.jwt_secret.clone(), config.token_ttl_minutes);

    let app_state = AppState::new(
        student_repository,
        attendance_repository,
        token_config,
        scan_sink,
    );

    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = campus_attendance::router(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind address");
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app)
        .await
        .expect("Server error");
}
