use axum::http::request::Parts;
use rmcp::{
    model::{ClientNotification, ClientRequest, ServerInfo, ServerResult},
    service::{NotificationContext, RequestContext},
    ErrorData as McpError, RoleServer, Service,
};
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

const SESSION_HEADER: &str = "mcp-session-id";

/// RequestLogger wraps an MCP service and logs every inbound request and
/// its outcome. Requests, results and errors pass through untouched.
#[derive(Clone)]
pub struct RequestLogger<S> {
    inner: S,
}

impl<S> RequestLogger<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: Service<RoleServer>> Service<RoleServer> for RequestLogger<S> {
    async fn handle_request(
        &self,
        request: ClientRequest,
        context: RequestContext<RoleServer>,
    ) -> Result<ServerResult, McpError> {
        let call_id = Uuid::new_v4();
        let session_id = session_id(&context);
        let (method, has_params) = describe(&request);

        info!(%call_id, %method, %session_id, has_params, "MCP method started");
        if let ClientRequest::CallToolRequest(call) = &request {
            debug!(
                %call_id,
                name = %call.params.name,
                args = ?call.params.arguments,
                "Calling tool"
            );
        }

        let start = Instant::now();
        let result = self.inner.handle_request(request, context).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(response) => {
                info!(%call_id, %method, %session_id, duration_ms, "MCP method completed");
                if let ServerResult::CallToolResult(tool_result) = response {
                    debug!(
                        %call_id,
                        is_error = tool_result.is_error.unwrap_or(false),
                        structured_content = ?tool_result.structured_content,
                        "Tool result"
                    );
                }
            }
            Err(e) => {
                warn!(%call_id, %method, %session_id, duration_ms, error = %e.message, "MCP method failed");
            }
        }

        result
    }

    async fn handle_notification(
        &self,
        notification: ClientNotification,
        context: NotificationContext<RoleServer>,
    ) -> Result<(), McpError> {
        self.inner.handle_notification(notification, context).await
    }

    fn get_info(&self) -> ServerInfo {
        self.inner.get_info()
    }
}

/// Session id from the HTTP request that carried this call, if any.
fn session_id(context: &RequestContext<RoleServer>) -> String {
    context
        .extensions
        .get::<Parts>()
        .and_then(|parts| parts.headers.get(SESSION_HEADER))
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string()
}

/// JSON-RPC method name and whether the request carried params.
fn describe(request: &ClientRequest) -> (String, bool) {
    let has_params = match request {
        ClientRequest::PingRequest(_) => false,
        ClientRequest::ListToolsRequest(r) => r.params.is_some(),
        ClientRequest::ListPromptsRequest(r) => r.params.is_some(),
        ClientRequest::ListResourcesRequest(r) => r.params.is_some(),
        ClientRequest::ListResourceTemplatesRequest(r) => r.params.is_some(),
        _ => true,
    };
    (request.method().to_string(), has_params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::{
        CallToolRequest, CallToolRequestParam, ListToolsRequest, PingRequest, RequestOptionalParam,
    };

    #[test]
    fn test_describe_tool_call() {
        let request = ClientRequest::CallToolRequest(CallToolRequest::new(CallToolRequestParam {
            name: "get_swagger".into(),
            arguments: serde_json::json!({ "id": "petstore" }).as_object().cloned(),
        }));
        assert_eq!(describe(&request), ("tools/call".to_string(), true));
    }

    #[test]
    fn test_describe_without_params() {
        let ping = ClientRequest::PingRequest(PingRequest::default());
        assert_eq!(describe(&ping), ("ping".to_string(), false));

        let list = ClientRequest::ListToolsRequest(ListToolsRequest::default());
        assert_eq!(describe(&list), ("tools/list".to_string(), false));

        let paged = ClientRequest::ListToolsRequest(RequestOptionalParam::with_param(
            Default::default(),
        ));
        assert_eq!(describe(&paged), ("tools/list".to_string(), true));
    }
}
