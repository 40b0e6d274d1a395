pub mod config;
pub mod logger;
pub mod mcp;
pub mod registry;
pub mod server;
pub mod swagger;
