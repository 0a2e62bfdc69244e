//! Command-line and environment configuration.

use clap::{Parser, Subcommand};
use simplerepo_core::db::OpenOptions;
use simplerepo_core::{default_log_level, LogSettings, LoggingError};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "simplerepo", version, about = "Account CRUD demo over a generic repository")]
pub struct Cli {
    /// SQLite database file. An in-memory database is used when omitted.
    #[arg(long, env = "SIMPLEREPO_DB")]
    pub db: Option<PathBuf>,

    /// Suppress the database startup banner.
    #[arg(long, env = "SIMPLEREPO_QUIET")]
    pub quiet: bool,

    /// trace|debug|info|warn|error
    #[arg(long, env = "SIMPLEREPO_LOG_LEVEL", default_value_t = default_log_level().to_string())]
    pub log_level: String,

    /// Absolute directory for rotating log files. Logging is off when omitted.
    #[arg(long, env = "SIMPLEREPO_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Create one account per name with a fresh id, then list all accounts.
    Seed {
        #[arg(default_values_t = [String::from("Simon"), String::from("Lukas")])]
        names: Vec<String>,
    },
    /// List all accounts.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Create one account and let storage assign its id.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Delete every account with the given user name.
    Delete {
        #[arg(long)]
        name: String,
    },
}

/// Validated runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database: Option<PathBuf>,
    pub open: OpenOptions,
    pub logging: Option<LogSettings>,
    pub command: Command,
}

impl AppConfig {
    pub fn from_cli(cli: Cli) -> Result<Self, LoggingError> {
        let logging = cli
            .log_dir
            .as_ref()
            .map(|dir| LogSettings::new(&cli.log_level, dir).map(|s| s.echo_stderr(true)))
            .transpose()?;

        Ok(Self {
            database: cli.db,
            open: OpenOptions { quiet: cli.quiet },
            logging,
            command: cli.command.unwrap_or(Command::Seed {
                names: vec!["Simon".to_string(), "Lukas".to_string()],
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, Cli, Command};
    use clap::Parser;

    #[test]
    fn defaults_to_in_memory_seed() {
        let cli = Cli::try_parse_from(["simplerepo"]).unwrap();
        let config = AppConfig::from_cli(cli).unwrap();

        assert_eq!(config.database, None);
        assert!(!config.open.quiet);
        assert!(config.logging.is_none());
        assert_eq!(
            config.command,
            Command::Seed {
                names: vec!["Simon".to_string(), "Lukas".to_string()]
            }
        );
    }

    #[test]
    fn parses_add_command_and_flags() {
        let cli = Cli::try_parse_from([
            "simplerepo",
            "--db",
            "/tmp/accounts.db",
            "--quiet",
            "add",
            "--name",
            "Simon",
            "--email",
            "simon@x.com",
        ])
        .unwrap();
        let config = AppConfig::from_cli(cli).unwrap();

        assert_eq!(config.database.as_deref(), Some(std::path::Path::new("/tmp/accounts.db")));
        assert!(config.open.quiet);
        assert_eq!(
            config.command,
            Command::Add {
                name: "Simon".to_string(),
                email: "simon@x.com".to_string()
            }
        );
    }

    #[test]
    fn rejects_relative_log_dir() {
        let cli = Cli::try_parse_from(["simplerepo", "--log-dir", "logs", "list"]).unwrap();
        assert!(AppConfig::from_cli(cli).is_err());
    }
}
