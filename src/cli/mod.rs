//! CLI module for typedcms
//!
//! Provides command-line interface for:
//! - init: Create the database and seed the first administrator
//! - serve: Run the HTTP content API

mod args;
mod commands;
mod config;
mod errors;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use args::{Cli, Command};
pub use commands::{init, run_command, serve};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "typedcms=info,tower_http=info";

/// Installs the global tracing subscriber. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Parse arguments, set up logging, and run the chosen command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_tracing();
    run_command(cli.command)
}
