pub mod config;

pub use config::{get_version_info, AppConfig, LoggingConfig, ServerConfig, ENV_PREFIX, VERSION};
