//! Process configuration for the HTTP server.
//!
//! Every option can come from a flag or from its environment variable, so the
//! store location is never hardcoded.

use clap::Parser;
use household_core::db::{open_db, open_db_in_memory, DbResult};
use household_core::default_log_level;
use rusqlite::Connection;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "household_server",
    version,
    about = "REST API for household records and FPL percentages"
)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[arg(long, env = "HOUSEHOLD_BIND_ADDR", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// SQLite file backing the record store. In-memory when omitted.
    #[arg(long, env = "HOUSEHOLD_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// trace|debug|info|warn|error. Defaults by build mode.
    #[arg(long, env = "HOUSEHOLD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files. Logs to stderr when omitted.
    #[arg(long, env = "HOUSEHOLD_LOG_DIR")]
    pub log_dir: Option<String>,
}

impl ServerConfig {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }

    /// Opens the configured store connection with migrations applied.
    pub fn open_store(&self) -> DbResult<Connection> {
        match &self.db_path {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ServerConfig;
    use clap::Parser;

    #[test]
    fn flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "household_server",
            "--bind",
            "127.0.0.1:8080",
            "--log-level",
            "warn",
        ])
        .unwrap();

        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.log_level(), "warn");
    }

    #[test]
    fn rejects_malformed_bind_address() {
        assert!(ServerConfig::try_parse_from(["household_server", "--bind", "nowhere"]).is_err());
    }

    #[test]
    fn file_store_is_opened_at_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("households.db");
        let config = ServerConfig::try_parse_from([
            "household_server",
            "--db-path",
            path.to_str().unwrap(),
        ])
        .unwrap();

        config.open_store().unwrap();
        assert!(path.exists());
    }
}
