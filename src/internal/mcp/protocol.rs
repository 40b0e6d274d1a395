use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::internal::registry::RegistryEntry;
use crate::internal::swagger::{Info, PathItem, Server, Spec};

pub const LIST_SWAGGER: &str = "list_swagger";
pub const GET_SWAGGER: &str = "get_swagger";

/// Tool names served by this process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    ListSwagger,
    GetSwagger,
}

impl ToolName {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            LIST_SWAGGER => Some(ToolName::ListSwagger),
            GET_SWAGGER => Some(ToolName::GetSwagger),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::ListSwagger => LIST_SWAGGER,
            ToolName::GetSwagger => GET_SWAGGER,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListSwaggerInput {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListSwaggersOutput {
    /// List of available swagger specifications
    pub swaggers: Vec<RegistryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetSwaggerInput {
    /// Swagger specification ID to retrieve
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetSwaggerOutput {
    pub id: String,
    pub name: String,
    /// Swagger/OpenAPI specification
    pub spec: SpecView,
    pub summary: String,
}

/// The part of a spec returned by `get_swagger`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpecView {
    pub info: Info,
    pub paths: BTreeMap<String, PathItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<Server>>,
}

impl From<&Spec> for SpecView {
    fn from(spec: &Spec) -> Self {
        Self {
            info: spec.info.clone(),
            paths: spec.paths.clone(),
            servers: (!spec.servers.is_empty()).then(|| spec.servers.clone()),
        }
    }
}
