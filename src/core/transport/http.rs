//! HTTP transport implementation.
//!
//! HTTP server with JSON-RPC over POST requests.
//! This allows standard HTTP clients (curl, browsers, etc.) to communicate with the MCP server.
//! The endpoint is stateless: every request is answered on its own.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rmcp::ServerHandler;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, instrument, warn};

use super::{HttpConfig, TransportError, TransportResult};
use crate::core::McpServer;

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32603, msg)
    }
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    server: McpServer,
    rpc_path: Arc<str>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        self.config.address()
    }

    /// Build the axum router serving `server`.
    pub fn router(&self, server: McpServer) -> Router {
        let state = AppState {
            server,
            rpc_path: Arc::from(self.config.rpc_path.as_str()),
        };

        let app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route("/health", get(health_check))
            .route("/", get(root_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app.layer(cors)
        } else {
            app
        }
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!(
            "Ready - listening on {} (JSON-RPC over HTTP, CORS {})",
            addr, cors_status
        );
        info!("  → JSON-RPC: POST {}", self.config.rpc_path);
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Root handler - provides API info.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "transport": "HTTP",
        "endpoints": {
            "rpc": &*state.rpc_path,
            "health": "/health"
        },
        "protocol": "JSON-RPC 2.0",
        "tools": state.server.registry().tool_names(),
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Handle JSON-RPC requests.
#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    tracing::Span::current().record("method", &request.method);
    info!("Received JSON-RPC request: {}", request.method);

    let response = process_request(&state.server, request).await;

    (StatusCode::OK, Json(response))
}

/// Process a JSON-RPC request and return the response.
pub async fn process_request(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::invalid_request(request.id);
    }

    match request.method.as_str() {
        "initialize" => handle_initialize(server, request),
        "ping" => JsonRpcResponse::success(request.id, serde_json::json!({})),
        "tools/list" => handle_tools_list(server, request),
        "tools/call" => handle_tools_call(server, request).await,
        "resources/list" => handle_resources_list(server, request).await,
        "resources/read" => handle_resources_read(server, request).await,

        // Stateless endpoint: notifications are acknowledged and dropped.
        method if method.starts_with("notifications/") => {
            info!("Received notification: {}", method);
            JsonRpcResponse::success(request.id, serde_json::json!(null))
        }

        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(request.id)
        }
    }
}

fn handle_initialize(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing initialize request");

    match serde_json::to_value(server.get_info()) {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
    }
}

fn handle_tools_list(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing tools/list request");

    let result = serde_json::json!({
        "tools": server.list_tools()
    });

    JsonRpcResponse::success(request.id, result)
}

/// Tool failures come back as a successful response whose result has
/// `isError: true`, matching MCP semantics.
async fn handle_tools_call(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing tools/call request");

    let params = match request.params {
        Some(p) => p,
        None => return JsonRpcResponse::invalid_params(request.id.clone(), "Missing params"),
    };

    let name = match params.get("name").and_then(|v| v.as_str()) {
        Some(n) => n.to_string(),
        None => return JsonRpcResponse::invalid_params(request.id.clone(), "Missing tool name"),
    };

    let arguments = params
        .get("arguments")
        .cloned()
        .unwrap_or(serde_json::Value::Null);

    let result = match server.call_tool(&name, arguments).await {
        Ok(result) => result,
        Err(e) => return JsonRpcResponse::internal_error(request.id, e.message.to_string()),
    };

    match serde_json::to_value(&result) {
        Ok(value) => JsonRpcResponse::success(request.id, value),
        Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
    }
}

async fn handle_resources_list(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing resources/list request");

    let result = serde_json::json!({
        "resources": server.list_resources().await
    });

    JsonRpcResponse::success(request.id, result)
}

async fn handle_resources_read(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing resources/read request");

    let params = match request.params {
        Some(p) => p,
        None => return JsonRpcResponse::invalid_params(request.id.clone(), "Missing params"),
    };

    let uri = match params.get("uri").and_then(|v| v.as_str()) {
        Some(u) => u.to_string(),
        None => return JsonRpcResponse::invalid_params(request.id.clone(), "Missing resource URI"),
    };

    match server.read_resource(&uri).await {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) => JsonRpcResponse::invalid_params(request.id, e),
    }
}
