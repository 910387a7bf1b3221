//! Configuration keys and defaults

// Server
pub const SERVER_ADDRESS_PROPERTY: &str = "server.address";
pub const SERVER_PORT_PROPERTY: &str = "server.port";
pub const SERVER_CONTEXT_PATH_PROPERTY: &str = "server.context_path";
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 5000;

// Storage
/// The "DefaultConnection" descriptor; absent means JSON-only mode
pub const DEFAULT_CONNECTION_PROPERTY: &str = "connection_strings.default_connection";
pub const CONTENT_ROOT_PROPERTY: &str = "app.content_root";
pub const DB_AUTO_CREATE_TABLE_PROPERTY: &str = "db.auto_create_table";
pub const DB_POOL_MAX_CONNECTIONS: &str = "db.pool.max_connections";
pub const DB_POOL_MIN_CONNECTIONS: &str = "db.pool.min_connections";
pub const DB_POOL_CONNECT_TIMEOUT: &str = "db.pool.connect_timeout";
pub const DB_POOL_IDLE_TIMEOUT: &str = "db.pool.idle_timeout";
pub const DB_POOL_MAX_LIFETIME: &str = "db.pool.max_lifetime";
pub const DB_POOL_SQLX_LOGGING: &str = "db.pool.sqlx_logging";

// Logging
pub const LOGGING_DIR_PROPERTY: &str = "logging.dir";
pub const LOGGING_CONSOLE_PROPERTY: &str = "logging.console";
pub const LOGGING_FILE_PROPERTY: &str = "logging.file";
pub const LOGGING_LEVEL_PROPERTY: &str = "logging.level";
pub const LOGGING_ROTATION_PROPERTY: &str = "logging.rotation";

// Paging
pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;

pub const ENV_PREFIX: &str = "PERIODICA";
pub const DEFAULT_CONFIG_FILE: &str = "conf/application.yml";
