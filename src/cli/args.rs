//! CLI argument definitions using clap
//!
//! Commands:
//! - typedcms init --config <path> --admin-username <name> --admin-password <password>
//! - typedcms serve --config <path> [--port <port>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// typedcms - runtime-defined content types over SQLite
#[derive(Parser, Debug)]
#[command(name = "typedcms")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database and seed the first administrator
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./typedcms.json")]
        config: PathBuf,

        #[arg(long)]
        admin_username: String,

        #[arg(long)]
        admin_password: String,
    },

    /// Serve the content API
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./typedcms.json")]
        config: PathBuf,

        /// Overrides the configured port
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_port() {
        let cli = Cli::try_parse_from(["typedcms", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Command::Serve { config, port } => {
                assert_eq!(config, PathBuf::from("./typedcms.json"));
                assert_eq!(port, Some(8080));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_init_requires_admin_credentials() {
        assert!(Cli::try_parse_from(["typedcms", "init"]).is_err());
        assert!(Cli::try_parse_from([
            "typedcms",
            "init",
            "--admin-username",
            "root",
            "--admin-password",
            "hunter22"
        ])
        .is_ok());
    }
}
