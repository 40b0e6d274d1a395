pub mod cli;
pub mod internal;

// Re-export commonly used types
pub use internal::config::AppConfig;
pub use internal::registry::{RegistryEntry, SpecRegistry};
pub use internal::server::{Server, ServerState, SwaggerTools, ToolError};
pub use internal::swagger::{LoadCause, LoadError, Spec, SpecLoader};
