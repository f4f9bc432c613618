//! Service configuration from flags and environment.

use std::path::PathBuf;

use clap::Parser;
use session::{ValidationMode, DEFAULT_ADMIN_SECRET};

/// Mekong field catalog server
#[derive(Parser, Debug, Clone)]
#[command(name = "field-web")]
#[command(about = "Field catalog web server with map and table views")]
pub struct Config {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080", env = "FIELD_WEB_LISTEN_ADDR")]
    pub listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Number of worker threads
    #[arg(long, env = "FIELD_WEB_WORKER_THREADS")]
    pub worker_threads: Option<usize>,

    /// Token that unlocks the admin area
    #[arg(long, default_value = DEFAULT_ADMIN_SECRET, env = "ADMIN_SECRET", hide_env_values = true)]
    pub admin_secret: String,

    /// Login validation: `strict` or `legacy`
    #[arg(long, default_value = "strict", env = "SESSION_VALIDATION")]
    pub session_validation: ValidationMode,

    /// PostgreSQL URL; the catalog is kept in memory when unset
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Directory holding the persisted session token
    #[arg(long, default_value = "./data", env = "FIELD_WEB_DATA_DIR")]
    pub data_dir: PathBuf,

    /// Maximum request body size for uploads, in MiB
    #[arg(long, default_value_t = 50, env = "FIELD_WEB_MAX_UPLOAD_MB")]
    pub max_upload_mb: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
            log_level: "info".to_string(),
            worker_threads: None,
            admin_secret: DEFAULT_ADMIN_SECRET.to_string(),
            session_validation: ValidationMode::Strict,
            database_url: None,
            data_dir: PathBuf::from("./data"),
            max_upload_mb: 50,
        }
    }
}

impl Config {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let config = Config::parse_from([
            "field-web",
            "--admin-secret",
            "s3cret",
            "--session-validation",
            "legacy",
            "--max-upload-mb",
            "2",
        ]);
        assert_eq!(config.admin_secret, "s3cret");
        assert_eq!(config.session_validation, ValidationMode::Legacy);
        assert_eq!(config.max_upload_bytes(), 2 * 1024 * 1024);
    }

    #[test]
    fn test_default_upload_limit() {
        assert_eq!(Config::default().max_upload_bytes(), 50 * 1024 * 1024);
    }
}
