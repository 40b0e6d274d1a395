// src/internal/swagger/mod.rs

pub mod loader;
pub mod spec;

pub use loader::{LoadCause, LoadError, SpecLoader};
pub use spec::{
    Info, MediaType, Operation, Parameter, ParameterLocation, PathItem, RequestBody, Response,
    SchemaVersion, Server, Spec,
};
