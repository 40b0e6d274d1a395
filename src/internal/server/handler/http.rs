// src/internal/server/handler/http.rs

use axum::{
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

use crate::internal::mcp::RequestLogger;
use crate::internal::server::tool::SwaggerTools;

/// Handler builds the HTTP surface: the MCP transport mounted at `mcp_path`
/// plus a health probe, behind access logging and CORS.
pub struct Handler {
    mcp_path: String,
}

impl Handler {
    pub fn new(mcp_path: &str) -> Self {
        Self {
            mcp_path: mcp_path.to_string(),
        }
    }

    /// Cancelling `sessions` ends every open MCP session and its event
    /// streams.
    pub fn create_http_router(&self, tools: SwaggerTools, sessions: CancellationToken) -> Router {
        let mcp_service = StreamableHttpService::new(
            move || Ok(RequestLogger::new(tools.clone())),
            Arc::new(LocalSessionManager::default()),
            StreamableHttpServerConfig {
                cancellation_token: sessions,
                ..Default::default()
            },
        );

        let router = Router::new()
            .nest_service(&self.mcp_path, mcp_service)
            .route("/health", get(|| async { "OK" }))
            .layer(
                ServiceBuilder::new()
                    .layer(middleware::from_fn(Self::log_requests))
                    .layer(CorsLayer::permissive()),
            );

        info!("HTTP handler created with MCP endpoint at {}", self.mcp_path);
        router
    }

    /// Middleware to log HTTP requests
    async fn log_requests(request: Request<Body>, next: Next) -> Response {
        let method = request.method().clone();
        let uri = request.uri().clone();
        let start = Instant::now();

        debug!("--> {} {}", method, uri);

        let response = next.run(request).await;

        debug!(
            "<-- {} {} {} {:?}",
            method,
            uri,
            response.status(),
            start.elapsed()
        );
        response
    }
}
