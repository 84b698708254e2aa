//! Main entry point for the Wasfa prescription management server.
//!
//! Resolves configuration from the environment, opens the data directory and
//! database, and serves the REST API built by `wasfa-api-rest`.

use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wasfa_api_rest::{router, AppState};
use wasfa_core::{repositories, CoreConfig};
use wasfa_files::LocalFileStorage;

/// Starts the Wasfa server.
///
/// # Environment Variables
/// - `WASFA_ADDR`: server address (default: "0.0.0.0:3000")
/// - `WASFA_DATA_DIR`: data directory for flag files and settings documents
///   (default: "wasfa_data")
/// - `WASFA_DATABASE_PATH`: SQLite database file
///   (default: `<data dir>/wasfa.db`)
/// - `WASFA_REGISTRATION_NUMBER`: registration number activation attempts
///   are checked against
/// - `WASFA_SERIAL_NUMBER`: serial number activation attempts are checked
///   against
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If startup or runtime fails
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the data directory cannot be created or the database cannot be opened,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wasfa=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("WASFA_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let data_dir =
        PathBuf::from(std::env::var("WASFA_DATA_DIR").unwrap_or_else(|_| "wasfa_data".into()));
    let database_path = std::env::var("WASFA_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| data_dir.join("wasfa.db"));
    let registration = std::env::var("WASFA_REGISTRATION_NUMBER").unwrap_or_default();
    let serial = std::env::var("WASFA_SERIAL_NUMBER").unwrap_or_default();

    tracing::info!("++ Starting Wasfa on {}", addr);
    tracing::info!("++ Data directory: {}", data_dir.display());
    tracing::info!("++ Database: {}", database_path.display());

    let cfg = CoreConfig::new(data_dir, database_path, registration, serial);

    let storage = Arc::new(LocalFileStorage::new(cfg.data_dir())?);
    let pool = repositories::connect(cfg.database_path()).await?;
    repositories::init_schema(&pool).await?;

    let state = AppState::new(pool, storage, &cfg);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
