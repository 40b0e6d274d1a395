// src/internal/server/tool/handler.rs

use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, ErrorCode, Implementation, JsonObject,
        ListToolsResult, PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    ErrorData as McpError, RoleServer, ServerHandler,
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::task_tracker::TaskTrackerToken;
use tokio_util::task::TaskTracker;
use tracing::debug;

use crate::internal::mcp::protocol::{
    GetSwaggerInput, GetSwaggerOutput, ListSwaggerInput, ListSwaggersOutput, SpecView, ToolName,
};
use crate::internal::registry::SpecRegistry;

/// Per-call failures. Neither touches the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    #[error("swagger spec {id} not found")]
    NotFound { id: String },
    #[error("request cancelled")]
    Cancelled,
}

impl ToolError {
    fn kind(&self) -> &'static str {
        match self {
            ToolError::NotFound { .. } => "not_found",
            ToolError::Cancelled => "cancelled",
        }
    }

    /// Tool failures are reported in-band, flagged as errors.
    pub fn into_result(self) -> CallToolResult {
        let mut payload = serde_json::json!({
            "error": self.kind(),
            "message": self.to_string(),
        });
        if let ToolError::NotFound { id } = &self {
            payload["id"] = serde_json::Value::String(id.clone());
        }
        CallToolResult::structured_error(payload)
    }
}

/// SwaggerTools serves `list_swagger` and `get_swagger` against a registry.
#[derive(Clone)]
pub struct SwaggerTools {
    registry: Arc<SpecRegistry>,
    name: String,
    version: String,
    in_flight: TaskTracker,
}

impl SwaggerTools {
    pub fn new(registry: Arc<SpecRegistry>, name: &str, version: &str) -> Self {
        Self {
            registry,
            name: name.to_string(),
            version: version.to_string(),
            in_flight: TaskTracker::new(),
        }
    }

    pub fn registry(&self) -> &SpecRegistry {
        &self.registry
    }

    /// Tracks tool calls currently executing.
    pub fn in_flight(&self) -> &TaskTracker {
        &self.in_flight
    }

    /// Counts a tool call as in flight until the token is dropped.
    pub fn track_call(&self) -> TaskTrackerToken {
        self.in_flight.token()
    }

    pub fn list_swagger(&self, ct: &CancellationToken) -> Result<ListSwaggersOutput, ToolError> {
        if ct.is_cancelled() {
            return Err(ToolError::Cancelled);
        }

        Ok(ListSwaggersOutput {
            swaggers: self.registry.entries(),
        })
    }

    pub fn get_swagger(
        &self,
        input: GetSwaggerInput,
        ct: &CancellationToken,
    ) -> Result<GetSwaggerOutput, ToolError> {
        if ct.is_cancelled() {
            return Err(ToolError::Cancelled);
        }

        let spec = self
            .registry
            .get(&input.id)
            .ok_or_else(|| ToolError::NotFound {
                id: input.id.clone(),
            })?;

        Ok(GetSwaggerOutput {
            name: spec.info.title.clone(),
            spec: SpecView::from(spec.as_ref()),
            summary: spec.summary(),
            id: input.id,
        })
    }

    /// Route a tool call by name. Unknown tools and undecodable arguments are
    /// protocol errors; tool failures come back as error results.
    pub fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
        ct: &CancellationToken,
    ) -> Result<CallToolResult, McpError> {
        let tool = ToolName::parse(name).ok_or_else(|| {
            McpError::new(
                ErrorCode::METHOD_NOT_FOUND,
                format!("Tool '{}' not found", name),
                None,
            )
        })?;
        debug!("Dispatching tool {}", tool.as_str());

        let outcome = match tool {
            ToolName::ListSwagger => {
                let _: ListSwaggerInput = parse_arguments(arguments)?;
                self.list_swagger(ct).map(to_structured)
            }
            ToolName::GetSwagger => {
                let input: GetSwaggerInput = parse_arguments(arguments)?;
                self.get_swagger(input, ct).map(to_structured)
            }
        };

        match outcome {
            Ok(result) => result,
            Err(e) => Ok(e.into_result()),
        }
    }

    /// Tool metadata advertised by `tools/list`.
    pub fn tools() -> Vec<Tool> {
        let mut list = Tool::new(
            ToolName::ListSwagger.as_str(),
            "List all available Swagger/OpenAPI specifications in the registry",
            schema_object::<ListSwaggerInput>(),
        );
        list.output_schema = Some(schema_object::<ListSwaggersOutput>());

        let mut get = Tool::new(
            ToolName::GetSwagger.as_str(),
            "Get a Swagger/OpenAPI specification by its ID from the registry",
            schema_object::<GetSwaggerInput>(),
        );
        get.output_schema = Some(schema_object::<GetSwaggerOutput>());

        vec![list, get]
    }
}

impl ServerHandler for SwaggerTools {
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(Self::tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let _in_flight = self.track_call();
        self.dispatch(&request.name, request.arguments, &context.ct)
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name.clone(),
                version: self.version.clone(),
                ..Implementation::from_build_env()
            },
            instructions: Some(
                "Swagger registry - use list_swagger to enumerate specifications and get_swagger to fetch one by id".into(),
            ),
            ..Default::default()
        }
    }
}

fn parse_arguments<T: DeserializeOwned>(arguments: Option<JsonObject>) -> Result<T, McpError> {
    let value = serde_json::Value::Object(arguments.unwrap_or_default());
    serde_json::from_value(value)
        .map_err(|e| McpError::invalid_params(format!("Invalid arguments: {}", e), None))
}

fn to_structured<T: Serialize>(output: T) -> Result<CallToolResult, McpError> {
    let value = serde_json::to_value(output)
        .map_err(|e| McpError::internal_error(format!("Failed to encode result: {}", e), None))?;
    Ok(CallToolResult::structured(value))
}

fn schema_object<T: JsonSchema>() -> Arc<JsonObject> {
    match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(serde_json::Value::Object(map)) => Arc::new(map),
        _ => Arc::new(JsonObject::new()),
    }
}
