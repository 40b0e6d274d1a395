// src/internal/registry/registry.rs

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::internal::swagger::{LoadError, Spec, SpecLoader};

/// List-view projection of one registry entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RegistryEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Always empty, the loader does not populate it.
    pub url: String,
    pub version: String,
}

/// Read-only map from source string to its loaded spec.
///
/// Built once before serving and never mutated afterwards, so it is shared
/// between request handlers without locking. Iteration order is unspecified.
#[derive(Debug, Clone, Default)]
pub struct SpecRegistry {
    specs: HashMap<String, Arc<Spec>>,
}

impl SpecRegistry {
    /// Load every source in order. The first failure aborts the build and no
    /// partial registry is returned. Duplicate sources overwrite earlier ones.
    pub async fn build<S: AsRef<str>>(
        loader: &SpecLoader,
        sources: &[S],
    ) -> Result<Self, LoadError> {
        let mut specs = HashMap::with_capacity(sources.len());
        for source in sources {
            let source = source.as_ref();
            let spec = loader.load(source).await?;
            specs.insert(source.to_string(), Arc::new(spec));
        }

        info!("Registry built with {} specs", specs.len());
        Ok(Self { specs })
    }

    /// Build a registry from already loaded specs.
    pub fn from_specs<I, K>(specs: I) -> Self
    where
        I: IntoIterator<Item = (K, Spec)>,
        K: Into<String>,
    {
        Self {
            specs: specs
                .into_iter()
                .map(|(id, spec)| (id.into(), Arc::new(spec)))
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<Spec>> {
        self.specs.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.specs.contains_key(id)
    }

    /// Entries for every spec. Callers must not rely on the order.
    pub fn entries(&self) -> Vec<RegistryEntry> {
        self.specs
            .iter()
            .map(|(id, spec)| RegistryEntry {
                id: id.clone(),
                name: spec.info.title.clone(),
                description: spec.info.description.clone(),
                url: String::new(),
                version: spec.info.version.clone(),
            })
            .collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
