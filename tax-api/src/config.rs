use std::path::PathBuf;

use clap::Parser;

use crate::auth::AdminCredentials;

/// Thai personal income tax HTTP service.
///
/// Custom `Debug` redacts the admin password.
#[derive(Parser, Clone)]
#[command(name = "tax-api")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// SQLite database URL (e.g., sqlite:tax.db?mode=rwc to create if missing)
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:tax.db?mode=rwc")]
    pub database: String,

    /// Directory of seed SQL files applied at startup
    #[arg(short, long, env = "TAX_DB_SQLITE_SEEDS_DIR")]
    pub seeds: Option<PathBuf>,

    /// Username for the admin endpoints
    #[arg(long, env = "ADMIN_USERNAME", default_value = "adminTax")]
    pub admin_username: String,

    /// Password for the admin endpoints
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: String,

    /// Also append log output to this file
    #[arg(long, env = "TAX_API_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl std::fmt::Debug for Config {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("database", &self.database)
            .field("seeds", &self.seeds)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"[REDACTED]")
            .field("log_file", &self.log_file)
            .finish()
    }
}

impl Config {
    pub fn admin_credentials(&self) -> AdminCredentials {
        AdminCredentials::new(&self.admin_username, &self.admin_password)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_explicit_arguments() {
        let config = Config::try_parse_from([
            "tax-api",
            "--port",
            "9090",
            "--database",
            "sqlite::memory:",
            "--admin-username",
            "root",
            "--admin-password",
            "s3cret",
        ])
        .expect("valid arguments");

        assert_eq!(config.port, 9090);
        assert_eq!(config.database, "sqlite::memory:");
        assert!(config.admin_credentials().matches("root", "s3cret"));
    }

    #[test]
    fn debug_redacts_password() {
        let config = Config::try_parse_from([
            "tax-api",
            "--admin-password",
            "hunter2",
        ])
        .expect("valid arguments");

        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;

        Config::command().debug_assert();
    }
}
