//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing,
//! the environment-sourced database settings, and the library configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    CONNECT_TIMEOUT, DEFAULT_CHUNK_SIZE, DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH, DEFAULT_PG_PORT,
    DEFAULT_TABLE, ENV_PG_APP_NAME, ENV_PG_HOSTNAME, ENV_PG_NAME, ENV_PG_PASSWORD, ENV_PG_PORT,
    ENV_PG_USER,
};
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Which input column feeds the `ip_address` output column.
///
/// Existing downstream consumers of the loaded table expect `ip_address`
/// to carry the stripped `gender` value, so `Gender` is the default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IpAddressSource {
    /// Copy the stripped `gender` value (legacy output)
    #[default]
    Gender,
    /// Copy the stripped `ip_address` value
    IpAddress,
}

/// Connection parameters for the destination PostgreSQL database.
///
/// Resolved once at process start from `PG_*` environment variables and
/// handed to the loader; nothing else reads the environment.
#[derive(Clone)]
pub struct PgConfig {
    pub host: Option<String>,
    pub port: u16,
    pub database: Option<String>,
    pub application_name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub connect_timeout: Duration,
}

impl PgConfig {
    /// Reads `PG_HOSTNAME`, `PG_PORT`, `PG_NAME`, `PG_APP_NAME`, `PG_USER`
    /// and `PG_PASSWORD` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPort` if `PG_PORT` is set but is not a
    /// valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get(ENV_PG_PORT) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PG_PORT,
        };

        Ok(Self {
            host: get(ENV_PG_HOSTNAME),
            port,
            database: get(ENV_PG_NAME),
            application_name: get(ENV_PG_APP_NAME),
            user: get(ENV_PG_USER),
            password: get(ENV_PG_PASSWORD),
            connect_timeout: CONNECT_TIMEOUT,
        })
    }
}

impl Default for PgConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PG_PORT,
            database: None,
            application_name: None,
            user: None,
            password: None,
            connect_timeout: CONNECT_TIMEOUT,
        }
    }
}

// Hand-written so the password never reaches a log line.
impl std::fmt::Debug for PgConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("application_name", &self.application_name)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Command-line options for the `user_etl` binary.
#[derive(Debug, Parser)]
#[command(
    name = "user_etl",
    about = "Normalize a user-record CSV file and bulk-load it into PostgreSQL"
)]
pub struct Opt {
    /// Input CSV file (comma-delimited, one header line)
    #[arg(long, default_value = DEFAULT_INPUT_PATH)]
    pub input: PathBuf,

    /// Intermediate pipe-delimited file written before the load
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Destination table for the COPY command
    #[arg(long, default_value = DEFAULT_TABLE)]
    pub table: String,

    /// Bytes forwarded to the COPY stream per chunk
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Write the intermediate file but skip the database load
    #[arg(long)]
    pub no_load: bool,

    /// Truncate the destination table before loading
    #[arg(long, conflicts_with = "no_load")]
    pub truncate: bool,

    /// Populate ip_address from the ip_address column instead of gender
    #[arg(long)]
    pub fix_ip_address: bool,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use user_etl::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     input: PathBuf::from("users.csv"),
///     load: false,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Input CSV file
    pub input: PathBuf,

    /// Intermediate output file
    pub output: PathBuf,

    /// Destination table
    pub table: String,

    /// COPY chunk size in bytes
    pub chunk_size: usize,

    /// Whether to run the bulk load after writing the intermediate file
    pub load: bool,

    /// Whether to truncate the destination table before the COPY
    pub truncate: bool,

    /// Source column for `ip_address`
    pub ip_address_source: IpAddressSource,

    /// Destination connection parameters
    pub pg: PgConfig,
}

impl Config {
    /// Combines parsed CLI options with the environment-sourced database settings.
    ///
    /// Logging options are consumed by the binary before this is called.
    pub fn from_opt(opt: Opt, pg: PgConfig) -> Self {
        Self {
            input: opt.input,
            output: opt.output,
            table: opt.table,
            chunk_size: opt.chunk_size,
            load: !opt.no_load,
            truncate: opt.truncate,
            ip_address_source: if opt.fix_ip_address {
                IpAddressSource::IpAddress
            } else {
                IpAddressSource::Gender
            },
            pg,
        }
    }

    /// Checks values that clap cannot validate on its own.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` describing the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize);
        }
        if self.table.trim().is_empty() {
            return Err(ConfigError::EmptyTable);
        }
        if self.input == self.output {
            return Err(ConfigError::OutputOverwritesInput(self.input.clone()));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            table: DEFAULT_TABLE.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            load: true,
            truncate: false,
            ip_address_source: IpAddressSource::default(),
            pg: PgConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_pg_config_from_lookup() {
        let pg = PgConfig::from_lookup(lookup_from(&[
            ("PG_HOSTNAME", "db.internal"),
            ("PG_PORT", "6543"),
            ("PG_NAME", "users"),
            ("PG_APP_NAME", "user_etl"),
            ("PG_USER", "loader"),
            ("PG_PASSWORD", "secret"),
        ]))
        .unwrap();

        assert_eq!(pg.host.as_deref(), Some("db.internal"));
        assert_eq!(pg.port, 6543);
        assert_eq!(pg.database.as_deref(), Some("users"));
        assert_eq!(pg.application_name.as_deref(), Some("user_etl"));
        assert_eq!(pg.user.as_deref(), Some("loader"));
        assert_eq!(pg.password.as_deref(), Some("secret"));
        assert_eq!(pg.connect_timeout, Duration::from_secs(20));
    }

    #[test]
    fn test_pg_config_defaults_when_unset() {
        let pg = PgConfig::from_lookup(lookup_from(&[("PG_HOSTNAME", "  ")])).unwrap();
        assert!(pg.host.is_none());
        assert_eq!(pg.port, DEFAULT_PG_PORT);
    }

    #[test]
    fn test_pg_config_rejects_bad_port() {
        let err = PgConfig::from_lookup(lookup_from(&[("PG_PORT", "not-a-port")])).unwrap_err();
        assert!(err.to_string().contains("not-a-port"));
    }

    #[test]
    fn test_pg_config_debug_hides_password() {
        let pg = PgConfig {
            password: Some("hunter2".to_string()),
            ..Default::default()
        };
        let rendered = format!("{:?}", pg);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("********"));
    }

    #[test]
    fn test_config_from_opt() {
        let opt = Opt::parse_from([
            "user_etl",
            "--input",
            "in.csv",
            "--output",
            "out.csv",
            "--no-load",
            "--fix-ip-address",
            "--chunk-size",
            "4096",
        ]);
        let config = Config::from_opt(opt, PgConfig::default());

        assert_eq!(config.input, PathBuf::from("in.csv"));
        assert_eq!(config.output, PathBuf::from("out.csv"));
        assert!(!config.load);
        assert_eq!(config.chunk_size, 4096);
        assert_eq!(config.ip_address_source, IpAddressSource::IpAddress);
        assert_eq!(config.table, DEFAULT_TABLE);
    }

    #[test]
    fn test_log_options_stay_on_opt() {
        let opt = Opt::parse_from(["user_etl", "--log-level", "debug", "--log-format", "json"]);
        assert!(matches!(opt.log_level, LogLevel::Debug));
        assert!(matches!(opt.log_format, LogFormat::Json));

        let config = Config::from_opt(opt, PgConfig::default());
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_truncate_conflicts_with_no_load() {
        let result = Opt::try_parse_from(["user_etl", "--no-load", "--truncate"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.chunk_size, 100);
        assert!(config.load);
        assert!(!config.truncate);
        assert_eq!(config.ip_address_source, IpAddressSource::Gender);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate() {
        let zero_chunk = Config {
            chunk_size: 0,
            ..Default::default()
        };
        assert!(zero_chunk.validate().is_err());

        let same_path = Config {
            input: PathBuf::from("a.csv"),
            output: PathBuf::from("a.csv"),
            ..Default::default()
        };
        assert!(same_path.validate().is_err());
    }
}
