//! cablecheck-dv - Design Validation Microservice
//!
//! Accepts a cable-design description from one of three input channels
//! (stored record, structured payload, free text), normalizes it into a
//! canonical field set, submits it to the reasoning oracle for standards
//! validation, and returns a uniform validation report.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cablecheck_common::config::{RootFolderInitializer, RootFolderResolver};
use cablecheck_dv::services::{OracleApi, OracleClient};
use cablecheck_dv::AppState;

#[derive(Debug, Parser)]
#[command(name = "cablecheck-dv", about = "CableCheck design validation service")]
struct Args {
    /// Root folder for the database and local state
    #[arg(long)]
    root_folder: Option<String>,

    /// HTTP listen port (overrides ENV and TOML)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Resolve configuration before logging so the configured level applies
    let resolver = RootFolderResolver::new("cablecheck-dv");
    let toml_config = resolver.toml_config().clone();

    // Initialize tracing (RUST_LOG wins over the TOML logging level)
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&toml_config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting cablecheck-dv (Design Validation) microservice");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Resolve and prepare the root folder
    let root_folder = resolver.resolve(args.root_folder.as_deref());
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .map_err(|e| anyhow::anyhow!("Failed to initialize root folder: {}", e))?;

    // Open or create the database
    let db_path = initializer.database_path();
    info!("Database: {}", db_path.display());
    let db_pool = cablecheck_dv::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    // Resolve oracle configuration (Database → ENV → TOML for the key)
    let api_key = cablecheck_dv::config::resolve_oracle_api_key(&db_pool, &toml_config).await?;
    let endpoint = cablecheck_dv::config::resolve_oracle_endpoint(&toml_config);
    let model = cablecheck_dv::config::resolve_oracle_model(&toml_config);
    let policy = cablecheck_dv::config::resolve_validation_policy(&toml_config);
    info!(endpoint = %endpoint, model = %model, policy = policy.as_str(), "Oracle configured");

    // One long-lived oracle client shared across requests
    let oracle: Arc<dyn OracleApi> = Arc::new(OracleClient::new(endpoint, model, api_key)?);

    // Create application state and router
    let state = AppState::new(db_pool, oracle, policy);
    let app = cablecheck_dv::build_router(state);

    // Start server
    let port = cablecheck_dv::config::resolve_port(args.port, &toml_config);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("Listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
