//! CLI command implementations
//!
//! `init` prepares the database and seeds the first administrator.
//! `serve` opens the database and runs the HTTP API until shut down.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use crate::auth::TokenIssuer;
use crate::http_server::{AppState, HttpServer};
use crate::service::CmsService;
use crate::store::SqliteStore;

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init {
            config,
            admin_username,
            admin_password,
        } => init(&config, &admin_username, &admin_password),
        Command::Serve { config, port } => serve(&config, port),
    }
}

/// Opens the configured database and makes sure the identity relation exists.
fn open_store(config: &Config) -> CliResult<SqliteStore> {
    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let store = SqliteStore::open(&config.database_path)?;
    store.bootstrap()?;
    Ok(store)
}

/// Initialize the database and seed the first administrator.
///
/// Running it again on a database that already has users changes nothing.
pub fn init(config_path: &Path, admin_username: &str, admin_password: &str) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let service = CmsService::new(Arc::new(open_store(&config)?));

    match service.seed_admin(admin_username, admin_password) {
        Ok(Some(user)) => {
            info!(user = user.id, username = %user.username, "initialized");
            println!("Initialized {} with administrator '{}'", config.database_path.display(), user.username);
        }
        Ok(None) => {
            println!("{} already has users; nothing to do", config.database_path.display());
        }
        Err(e) => return Err(CliError::init_failed(e.to_string())),
    }
    Ok(())
}

/// Serve the content API.
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = Config::load(config_path)?;
    if let Some(port) = port {
        config.http.port = port;
    }

    let tokens = TokenIssuer::new(&config.jwt_config()?);

    let store = open_store(&config)?;
    let state = AppState::new(Arc::new(CmsService::new(Arc::new(store))), tokens);

    let server = HttpServer::new(config.http.clone(), state);
    info!(database = %config.database_path.display(), addr = %server.socket_addr(), "starting server");

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}
