pub mod handler;

pub use handler::{SwaggerTools, ToolError};
