use tracing::{error, info};
use swagger_registry_mcp::cli::{build_cli, parse_config};
use swagger_registry_mcp::internal::server::create_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments first
    let matches = build_cli().get_matches();
    let config = match parse_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = swagger_registry_mcp::internal::logger::init_logger(&config.logging) {
        eprintln!("Failed to initialize logger: {}", e);
        std::process::exit(1);
    }

    info!("Starting Swagger registry MCP server");
    info!("Version: {}", swagger_registry_mcp::internal::config::VERSION);
    info!("Sources: {}", config.sources.join(", "));

    let mut server = match create_server(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to create server: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.start_with_graceful_shutdown().await {
        error!("Server error: {:#}", e);
        std::process::exit(1);
    }

    info!("Server shutdown complete");
    Ok(())
}
