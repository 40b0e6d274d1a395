pub mod handler;
pub mod server;
pub mod tool;

// Re-export main types
pub use server::{create_server, shutdown_signal, Server, ServerState};
pub use tool::{SwaggerTools, ToolError};
