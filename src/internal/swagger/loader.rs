// src/internal/swagger/loader.rs

use reqwest::{Client, StatusCode};
use std::fs;
use tracing::{debug, info};

use super::spec::Spec;

/// Broad category of a load failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadCause {
    Network,
    Filesystem,
    Malformed,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to fetch swagger from {source_id}: {error}")]
    Network {
        source_id: String,
        #[source]
        error: reqwest::Error,
    },
    #[error("failed to fetch swagger from {source_id}: status {status}")]
    Status { source_id: String, status: StatusCode },
    #[error("failed to read swagger file {source_id}: {error}")]
    Filesystem {
        source_id: String,
        #[source]
        error: std::io::Error,
    },
    #[error("failed to parse swagger document {source_id}: {error}")]
    Malformed {
        source_id: String,
        #[source]
        error: serde_json::Error,
    },
}

impl LoadError {
    pub fn cause(&self) -> LoadCause {
        match self {
            LoadError::Network { .. } | LoadError::Status { .. } => LoadCause::Network,
            LoadError::Filesystem { .. } => LoadCause::Filesystem,
            LoadError::Malformed { .. } => LoadCause::Malformed,
        }
    }

    /// The source string that failed to load.
    pub fn source_id(&self) -> &str {
        match self {
            LoadError::Network { source_id, .. }
            | LoadError::Status { source_id, .. }
            | LoadError::Filesystem { source_id, .. }
            | LoadError::Malformed { source_id, .. } => source_id,
        }
    }
}

/// SpecLoader fetches documents from URLs or local paths and decodes them.
#[derive(Clone, Default)]
pub struct SpecLoader {
    client: Client,
}

impl SpecLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a single spec from `source`, an `http(s)://` URL or a file path.
    pub async fn load(&self, source: &str) -> Result<Spec, LoadError> {
        let data = if is_url(source) {
            self.fetch(source).await?
        } else {
            fs::read(source).map_err(|error| LoadError::Filesystem {
                source_id: source.to_string(),
                error,
            })?
        };

        let spec = decode(source, &data)?;
        let operations: usize = spec.paths.values().map(|p| p.operations().count()).sum();
        info!(
            "Loaded {} ({:?}, {} paths, {} operations)",
            source,
            spec.schema_version(),
            spec.paths.len(),
            operations
        );
        Ok(spec)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        let network = |error| LoadError::Network {
            source_id: url.to_string(),
            error,
        };

        debug!("Fetching swagger document from {}", url);
        let response = self.client.get(url).send().await.map_err(network)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(LoadError::Status {
                source_id: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(network)?;
        Ok(body.to_vec())
    }
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Decode the payload into the typed model, then again into an untyped tree.
/// JSON is tried first, YAML second.
fn decode(source: &str, data: &[u8]) -> Result<Spec, LoadError> {
    match serde_json::from_slice::<Spec>(data) {
        Ok(mut spec) => {
            spec.raw = serde_json::from_slice::<serde_json::Value>(data).ok();
            Ok(spec)
        }
        Err(json_err) => match serde_yaml::from_slice::<Spec>(data) {
            Ok(mut spec) => {
                debug!("{} is not JSON, decoded as YAML", source);
                spec.raw = serde_yaml::from_slice::<serde_json::Value>(data).ok();
                Ok(spec)
            }
            Err(_) => Err(LoadError::Malformed {
                source_id: source.to_string(),
                error: json_err,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("http://example.com/openapi.json"));
        assert!(is_url("https://example.com/openapi.json"));
        assert!(!is_url("ftp://example.com/openapi.json"));
        assert!(!is_url("./openapi.json"));
    }

    #[test]
    fn test_decode_keeps_raw_passthrough_fields() {
        let data = br#"{
            "openapi": "3.0.0",
            "info": {"title": "T", "version": "1"},
            "paths": {},
            "components": {"schemas": {"Pet": {"type": "object"}}}
        }"#;
        let spec = decode("mem", data).unwrap();
        let raw = spec.raw.expect("raw tree");
        assert_eq!(raw["components"]["schemas"]["Pet"]["type"], "object");
    }

    #[test]
    fn test_decode_yaml_fallback() {
        let data = b"swagger: '2.0'\ninfo:\n  title: Yaml API\n  version: '0.1'\npaths:\n  /a: {}\n";
        let spec = decode("mem.yaml", data).unwrap();
        assert_eq!(spec.info.title, "Yaml API");
        assert_eq!(spec.paths.len(), 1);
        assert!(spec.raw.is_some());
    }

    #[test]
    fn test_decode_malformed() {
        let err = decode("bad.json", b"{ not json").unwrap_err();
        assert_eq!(err.cause(), LoadCause::Malformed);
        assert_eq!(err.source_id(), "bad.json");
    }
}
