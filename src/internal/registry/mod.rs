pub mod registry;

pub use registry::{RegistryEntry, SpecRegistry};
