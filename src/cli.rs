use anyhow::Context;
use clap::{Arg, ArgAction, Command};

use crate::internal::config::AppConfig;

pub fn build_cli() -> Command {
    // Leak the version string to get a 'static lifetime
    let version: &'static str =
        Box::leak(crate::internal::config::get_version_info().into_boxed_str());

    Command::new("swagger-registry-mcp")
        .version(version)
        .about("Serve a registry of Swagger/OpenAPI documents over MCP")
        .arg(
            Arg::new("source")
                .long("source")
                .short('s')
                .action(ArgAction::Append)
                .help("Swagger/OpenAPI URL or file path to load (repeatable, overrides SWAGGER_MCP_SOURCES)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to config file (default: ./config.yaml, /etc/swagger-registry-mcp/config.yaml)"),
        )
        .arg(
            Arg::new("host")
                .long("host")
                .help("Listen host"),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .short('p')
                .value_parser(clap::value_parser!(u16))
                .help("Listen port"),
        )
        .arg(
            Arg::new("path")
                .long("path")
                .help("HTTP path of the MCP event-stream endpoint"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .help("Log level or filter directive (overridden by RUST_LOG)"),
        )
}

/// Load configuration and apply command line overrides on top.
pub fn parse_config(matches: &clap::ArgMatches) -> anyhow::Result<AppConfig> {
    let config_file = matches.get_one::<String>("config").map(|s| s.as_str());
    let mut config = AppConfig::load_from(config_file).context("Failed to load configuration")?;

    if let Some(sources) = matches.get_many::<String>("source") {
        config.sources = sources.cloned().collect();
    }
    if let Some(host) = matches.get_one::<String>("host") {
        config.server.host = host.clone();
    }
    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }
    if let Some(path) = matches.get_one::<String>("path") {
        config.server.path = path.clone();
    }
    if let Some(level) = matches.get_one::<String>("log-level") {
        config.logging.level = level.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}
