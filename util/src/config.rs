//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from `.env` and environment variables.
//! The free functions at the bottom of this module are the read path used by the
//! other crates; the setters exist so tests can override single values.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_url: String,
    pub rna_data_url: String,
    pub rna_accept_invalid_certs: bool,
    pub rna_timeout_seconds: u64,
    pub host: String,
    pub port: u16,
    pub pull_interval_seconds: u64,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

fn flag_or(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        Err(_) => default,
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("ignoring unparsable {key}={raw:?}, using default");
            default
        }),
        Err(_) => default,
    }
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Every value has a default, so loading never fails. An empty
    /// `RNA_DATA_URL` is allowed and surfaces later as a fetch failure.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: var_or("APP_ENV", "development"),
            project_name: var_or("PROJECT_NAME", "rna-performance-metrics"),
            log_level: var_or("LOG_LEVEL", "api=info,services=info,db=info"),
            log_file: var_or("LOG_FILE", "api.log"),
            log_to_stdout: flag_or("LOG_TO_STDOUT", false),
            database_url: var_or("DATABASE_URL", "data/performance_metrics.db"),
            rna_data_url: var_or("RNA_DATA_URL", ""),
            rna_accept_invalid_certs: flag_or("RNA_ACCEPT_INVALID_CERTS", false),
            rna_timeout_seconds: parse_or("RNA_TIMEOUT_SECONDS", 30),
            host: var_or("HOST", "0.0.0.0"),
            port: parse_or("PORT", 5001),
            pull_interval_seconds: parse_or("PULL_INTERVAL_SECONDS", 0),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock
                .write()
                .expect("Failed to acquire AppConfig write lock");
            *guard = AppConfig::from_env();
        }
    }

    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_database_url(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_url = value.into());
    }

    pub fn set_rna_data_url(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.rna_data_url = value.into());
    }

    pub fn set_rna_accept_invalid_certs(value: bool) {
        AppConfig::set_field(|cfg| cfg.rna_accept_invalid_certs = value);
    }

    pub fn set_rna_timeout_seconds(value: u64) {
        AppConfig::set_field(|cfg| cfg.rna_timeout_seconds = value);
    }

    pub fn set_pull_interval_seconds(value: u64) {
        AppConfig::set_field(|cfg| cfg.pull_interval_seconds = value);
    }
}

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_url() -> String {
    AppConfig::global().database_url.clone()
}

fn is_dsn(raw: &str) -> bool {
    raw.starts_with("sqlite:") || raw.starts_with("postgres://") || raw.starts_with("mysql://")
}

/// The SQLite file behind a plain-path `DATABASE_URL`, or `None` for a DSN.
pub fn sqlite_file_path(raw: &str) -> Option<PathBuf> {
    if is_dsn(raw) {
        None
    } else {
        Some(PathBuf::from(raw))
    }
}

/// `DATABASE_URL` as a connection string. DSNs are returned as-is; anything else
/// is treated as a SQLite file path opened in read-write-create mode.
pub fn database_dsn() -> String {
    let raw = database_url();
    if is_dsn(&raw) {
        raw
    } else {
        format!("sqlite://{raw}?mode=rwc")
    }
}

pub fn rna_data_url() -> String {
    AppConfig::global().rna_data_url.clone()
}

/// When true the upstream client skips TLS certificate verification.
pub fn rna_accept_invalid_certs() -> bool {
    AppConfig::global().rna_accept_invalid_certs
}

pub fn rna_timeout_seconds() -> u64 {
    AppConfig::global().rna_timeout_seconds
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

/// Seconds between scheduled pulls; `0` disables the scheduler.
pub fn pull_interval_seconds() -> u64 {
    AppConfig::global().pull_interval_seconds
}
