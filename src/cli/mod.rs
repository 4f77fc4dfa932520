//! CLI module for the cost manager
//!
//! Provides subcommands:
//! - `serve`: run the HTTP API (default)
//! - `migrate`: apply the PostgreSQL schema and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Cost manager - expense tracking and monthly reports
#[derive(Parser)]
#[command(name = "cost-manager")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API (default mode)
    Serve,

    /// Apply database migrations and exit
    Migrate,
}

/// Load `.env` and layered configuration, then install the log subscriber
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_is_default() {
        let cli = Cli::try_parse_from(["cost-manager"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::try_parse_from(["cost-manager", "migrate"]).unwrap();
        assert_eq!(cli.command, Some(Command::Migrate));

        let cli = Cli::try_parse_from(["cost-manager", "serve"]).unwrap();
        assert_eq!(cli.command, Some(Command::Serve));

        assert!(Cli::try_parse_from(["cost-manager", "ui"]).is_err());
    }
}
