//! Configuration management for Periodica server
//!
//! Sources, lowest precedence first: `conf/application.yml` (optional),
//! `PERIODICA__*` environment variables, command line flags.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use config::{Config, Environment};
use sea_orm::ConnectOptions;

use crate::startup::{LogRotation, LoggingConfig};

use super::constants::{
    CONTENT_ROOT_PROPERTY, DB_AUTO_CREATE_TABLE_PROPERTY, DB_POOL_CONNECT_TIMEOUT,
    DB_POOL_IDLE_TIMEOUT, DB_POOL_MAX_CONNECTIONS, DB_POOL_MAX_LIFETIME, DB_POOL_MIN_CONNECTIONS,
    DB_POOL_SQLX_LOGGING, DEFAULT_CONFIG_FILE, DEFAULT_CONNECTION_PROPERTY,
    DEFAULT_SERVER_ADDRESS, DEFAULT_SERVER_PORT, ENV_PREFIX, LOGGING_CONSOLE_PROPERTY,
    LOGGING_DIR_PROPERTY, LOGGING_FILE_PROPERTY, LOGGING_LEVEL_PROPERTY,
    LOGGING_ROTATION_PROPERTY, SERVER_ADDRESS_PROPERTY, SERVER_CONTEXT_PATH_PROPERTY,
    SERVER_PORT_PROPERTY,
};

/// Command line arguments for the server
#[derive(Debug, Parser)]
#[command(name = "periodica-server", version, about)]
struct Cli {
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_FILE)]
    config_file: String,
    #[arg(long = "db-url", env = "DATABASE_URL")]
    database_url: Option<String>,
    #[arg(long = "content-root")]
    content_root: Option<String>,
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    pub fn new() -> Result<Self, config::ConfigError> {
        let args = Cli::parse();
        let mut config_builder = Config::builder()
            .add_source(config::File::with_name(&args.config_file).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );

        if let Some(v) = args.database_url {
            config_builder = config_builder.set_override(DEFAULT_CONNECTION_PROPERTY, v)?;
        }
        if let Some(v) = args.content_root {
            config_builder = config_builder.set_override(CONTENT_ROOT_PROPERTY, v)?;
        }
        if let Some(v) = args.port {
            config_builder = config_builder.set_override(SERVER_PORT_PROPERTY, i64::from(v))?;
        }

        Ok(Configuration {
            config: config_builder.build()?,
        })
    }

    pub fn from_config(config: Config) -> Self {
        Configuration { config }
    }

    // ========================================================================
    // Server Configuration
    // ========================================================================

    pub fn server_address(&self) -> String {
        self.config
            .get_string(SERVER_ADDRESS_PROPERTY)
            .unwrap_or(DEFAULT_SERVER_ADDRESS.to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int(SERVER_PORT_PROPERTY)
            .ok()
            .and_then(|v| u16::try_from(v).ok())
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    /// Route prefix, normalized to `""` or `/segment`
    pub fn server_context_path(&self) -> String {
        let path = self
            .config
            .get_string(SERVER_CONTEXT_PATH_PROPERTY)
            .unwrap_or_default();
        let trimmed = path.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }

    // ========================================================================
    // Storage Configuration
    // ========================================================================

    /// The relational connection string, `None` when absent or blank
    pub fn default_connection(&self) -> Option<String> {
        self.config
            .get_string(DEFAULT_CONNECTION_PROPERTY)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Directory holding the JSON document
    pub fn content_root(&self) -> PathBuf {
        self.config
            .get_string(CONTENT_ROOT_PROPERTY)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
    }

    pub fn auto_create_table(&self) -> bool {
        self.config
            .get_bool(DB_AUTO_CREATE_TABLE_PROPERTY)
            .unwrap_or(false)
    }

    /// Pool options for the configured connection, if any.
    ///
    /// Nothing is opened here; the pool connects on first use.
    pub fn database_connect_options(&self) -> Option<ConnectOptions> {
        let url = self.default_connection()?;

        let max_connections = self.config.get_int(DB_POOL_MAX_CONNECTIONS).unwrap_or(10) as u32;
        let min_connections = self.config.get_int(DB_POOL_MIN_CONNECTIONS).unwrap_or(1) as u32;
        let connect_timeout = self.config.get_int(DB_POOL_CONNECT_TIMEOUT).unwrap_or(30) as u64;
        let idle_timeout = self.config.get_int(DB_POOL_IDLE_TIMEOUT).unwrap_or(10) as u64;
        let max_lifetime = self.config.get_int(DB_POOL_MAX_LIFETIME).unwrap_or(1800) as u64;
        let sqlx_logging = self.config.get_bool(DB_POOL_SQLX_LOGGING).unwrap_or(false);

        let mut opt = ConnectOptions::new(url);
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(connect_timeout))
            .idle_timeout(Duration::from_secs(idle_timeout))
            .max_lifetime(Duration::from_secs(max_lifetime))
            .sqlx_logging(sqlx_logging)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        tracing::info!(
            max_connections = max_connections,
            min_connections = min_connections,
            connect_timeout = connect_timeout,
            idle_timeout = idle_timeout,
            max_lifetime = max_lifetime,
            sqlx_logging = sqlx_logging,
            "Database connection pool configured"
        );

        Some(opt)
    }

    // ========================================================================
    // Logging Configuration
    // ========================================================================

    pub fn logging_config(&self) -> LoggingConfig {
        let env = LoggingConfig::from_env();
        LoggingConfig::from_config(
            self.config
                .get_string(LOGGING_DIR_PROPERTY)
                .ok()
                .or_else(|| Some(env.log_dir.display().to_string())),
            self.config
                .get_bool(LOGGING_CONSOLE_PROPERTY)
                .unwrap_or(env.console_output),
            self.config
                .get_bool(LOGGING_FILE_PROPERTY)
                .unwrap_or(env.file_logging),
            self.config
                .get_string(LOGGING_LEVEL_PROPERTY)
                .unwrap_or_else(|_| env.console_level.to_string()),
            self.config
                .get_string(LOGGING_ROTATION_PROPERTY)
                .map(|v| LogRotation::from_name(&v))
                .unwrap_or(env.rotation),
        )
    }
}
