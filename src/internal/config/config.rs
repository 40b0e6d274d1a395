use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ENV_PREFIX: &str = "SWAGGER_MCP";

/// Get version information. Build-script values fall back to "unknown"
/// when vergen did not emit them.
pub fn get_version_info() -> String {
    let build_timestamp = option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown");
    let rustc_semver = option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown");
    let cargo_target_triple = option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown");

    format!(
        "swagger-registry-mcp version {}\n\
         Built: {}\n\
         Rust: {}\n\
         Target: {}",
        VERSION, build_timestamp, rustc_semver, cargo_target_triple
    )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path the MCP event-stream transport is mounted at
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// How long close() waits for open streams after in-flight calls drain
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            path: default_path(),
            name: default_name(),
            version: default_version(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_path() -> String {
    "/mcp/sse".to_string()
}
fn default_name() -> String {
    "swagger-registry-mcp".to_string()
}
fn default_version() -> String {
    VERSION.to_string()
}
fn default_shutdown_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_true")]
    pub color: bool,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub append_to_file: bool,
    #[serde(default)]
    pub disable_console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            color: true,
            output_path: None,
            append_to_file: false,
            disable_console: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Spec sources (URLs or file paths); each doubles as its registry id
    #[serde(default)]
    pub sources: Vec<String>,
}

impl AppConfig {
    /// Load from the default config files and `SWAGGER_MCP_*` environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load with an explicit config file taking precedence over the default
    /// locations. Environment variables still win over every file.
    pub fn load_from(config_file: Option<&str>) -> Result<Self, ConfigError> {
        Self::load_with(config_file, environment())
    }

    fn load_with(config_file: Option<&str>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("/etc/swagger-registry-mcp/config").required(false));

        if let Some(path) = config_file {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder.add_source(env).build()?.try_deserialize()
    }

    /// Check invariants that would otherwise only fail at serve time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.iter().all(|s| s.trim().is_empty()) {
            return Err(ConfigError::Message(
                "at least one swagger source is required".to_string(),
            ));
        }
        if !self.server.path.starts_with('/') || self.server.path == "/" {
            return Err(ConfigError::Message(format!(
                "transport path must start with '/' and not be the root: {}",
                self.server.path
            )));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// `SWAGGER_MCP_*` variables; `__` nests keys and `SOURCES` is a comma list.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("sources")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.path, "/mcp/sse");
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.logging.level, "info");
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_validate_requires_sources() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_err());

        config.sources = vec!["  ".to_string()];
        assert!(config.validate().is_err());

        config.sources = vec!["./openapi.json".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_transport_path() {
        let mut config = AppConfig {
            sources: vec!["./openapi.json".to_string()],
            ..Default::default()
        };

        config.server.path = "mcp".to_string();
        assert!(config.validate().is_err());

        config.server.path = "/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        std::fs::write(
            &path,
            "server:\n  port: 9090\nsources:\n  - ./a.json\n  - https://example.com/b.json\n",
        )
        .unwrap();

        let config = AppConfig::load_from(path.to_str()).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.path, "/mcp/sse");
        assert_eq!(
            config.sources,
            vec!["./a.json".to_string(), "https://example.com/b.json".to_string()]
        );
    }

    fn env_vars(vars: &[(&str, &str)]) -> Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<config::Map<String, String>>();
        environment().source(Some(map))
    }

    #[test]
    fn test_environment_sources_and_nested_keys() {
        let env = env_vars(&[
            ("SWAGGER_MCP_SOURCES", "./a.json,https://x/b.json"),
            ("SWAGGER_MCP_SERVER__PORT", "9191"),
            ("SWAGGER_MCP_LOGGING__LEVEL", "debug"),
        ]);

        let config = AppConfig::load_with(None, env).unwrap();
        assert_eq!(
            config.sources,
            vec!["./a.json".to_string(), "https://x/b.json".to_string()]
        );
        assert_eq!(config.server.port, 9191);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_single_source() {
        let env = env_vars(&[("SWAGGER_MCP_SOURCES", "./only.json")]);
        let config = AppConfig::load_with(None, env).unwrap();
        assert_eq!(config.sources, vec!["./only.json".to_string()]);
    }

    #[test]
    fn test_environment_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        std::fs::write(&path, "server:\n  port: 9090\nsources:\n  - ./file.json\n").unwrap();

        let env = env_vars(&[("SWAGGER_MCP_SERVER__PORT", "7070")]);
        let config = AppConfig::load_with(path.to_str(), env).unwrap();
        assert_eq!(config.server.port, 7070);
        assert_eq!(config.sources, vec!["./file.json".to_string()]);
    }
}
