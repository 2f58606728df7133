//! HTTP transport implementation.
//!
//! A small REST surface over the tool executor, so standard HTTP clients
//! (curl, browsers, etc.) can call tools without speaking MCP:
//!
//! - `GET /health` - liveness
//! - `GET /` - server identity
//! - `GET /tools` - tool listing
//! - `POST /execute/{tool_name}` - run a tool with a JSON object body

use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::{ConnectInfo, Path, Request, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use http::{StatusCode, header};
use serde_json::{Value, json};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, instrument, warn};

use super::shutdown::shutdown_signal;
use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::domains::tools::{ErrorKind, ExecutionResult, Invocation, Origin, handlers::JsonObject};

/// Upper bound on an `/execute` request body.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the HTTP transport until a shutdown signal arrives.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();

        let mut app = router(server).layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - listening on {} (REST over HTTP, CORS {})", addr, cors_status);
        info!("  → Health:  GET /health");
        info!("  → Tools:   GET /tools");
        info!("  → Execute: POST /execute/{{tool_name}}");

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| TransportError::http(e.to_string()))?;

        info!("HTTP transport finished");
        Ok(())
    }
}

/// Build the REST router without network-level layers.
pub fn router(server: McpServer) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/tools", get(list_tools))
        .route("/execute/{tool_name}", post(execute_tool))
        .with_state(server)
}

/// Root handler - server identity and endpoints.
async fn root_handler(State(server): State<McpServer>) -> impl IntoResponse {
    Json(json!({
        "name": server.name(),
        "version": server.version(),
        "status": "running",
        "transport": "http",
        "endpoints": {
            "health": "/health",
            "tools": "/tools",
            "execute": "/execute/{tool_name}"
        }
    }))
}

/// Health check endpoint.
async fn health_check(State(server): State<McpServer>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "server": server.name(),
        "version": server.version()
    }))
}

/// Tool listing - name and description only.
async fn list_tools(State(server): State<McpServer>) -> impl IntoResponse {
    let tools: Vec<Value> = server
        .list_tools()
        .into_iter()
        .map(|t| json!({ "name": t.name, "description": t.description }))
        .collect();
    Json(json!({ "tools": tools }))
}

/// Run one tool.
#[instrument(skip(server, request))]
async fn execute_tool(
    State(server): State<McpServer>,
    Path(tool_name): Path<String>,
    request: Request,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.to_string());
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = match axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES).await {
        Ok(body) => body,
        Err(e) => {
            warn!("Failed to read request body: {}", e);
            Bytes::new()
        }
    };
    let arguments = parse_arguments(&body);

    let mut invocation = Invocation::new(tool_name, arguments, Origin::Http);
    if let Some(peer) = peer {
        invocation = invocation.with_caller("client_ip", peer);
    }
    if let Some(user_agent) = user_agent {
        invocation = invocation.with_caller("user_agent", user_agent);
    }

    match server.execute(invocation).await {
        ExecutionResult::Success(output) => {
            (StatusCode::OK, Json(json!({ "result": output.payload }))).into_response()
        }
        ExecutionResult::Failure(e) => {
            let status = match e.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::InvalidArgument | ErrorKind::InternalError => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            (status, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

/// Parse a request body into an argument object.
///
/// Anything other than a JSON object, including an empty body, means no
/// arguments. The tool's own contract then decides whether that is valid.
fn parse_arguments(body: &Bytes) -> JsonObject {
    if body.iter().all(u8::is_ascii_whitespace) {
        return JsonObject::new();
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!("Request body is not a JSON object, using no arguments");
            JsonObject::new()
        }
        Err(e) => {
            warn!("Request body is not valid JSON ({}), using no arguments", e);
            JsonObject::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::host::StaticHost;
    use crate::core::telemetry::RecordingSink;
    use axum::body::Body;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> (Router, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let host = StaticHost::new().with_var("GREETING", "hello");
        let server = McpServer::with_parts(Config::default(), Arc::new(host), sink.clone()).unwrap();
        (router(server), sink)
    }

    async fn send(app: Router, request: axum::http::Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post(uri: &str, body: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::USER_AGENT, "router-test")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_parse_arguments() {
        assert!(parse_arguments(&Bytes::new()).is_empty());
        assert!(parse_arguments(&Bytes::from_static(b"  \n")).is_empty());
        assert_eq!(
            parse_arguments(&Bytes::from_static(br#"{"a":1}"#))["a"],
            json!(1)
        );
        assert!(parse_arguments(&Bytes::from_static(b"[1,2]")).is_empty());
        assert!(parse_arguments(&Bytes::from_static(b"{not json")).is_empty());
    }

    #[tokio::test]
    async fn test_execute_echo() {
        let (app, sink) = app();
        let (status, body) = send(
            app,
            post("/execute/echo_env_vars", r#"{"var_name":"GREETING"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "result": "GREETING: hello" }));

        let events = sink.events();
        assert_eq!(events[0].get("transport"), Some(&json!("http")));
        assert_eq!(
            events[0].get("caller"),
            Some(&json!({ "user_agent": "router-test" }))
        );
    }

    #[tokio::test]
    async fn test_execute_empty_body() {
        let (app, _) = app();
        let (status, body) = send(app, post("/execute/get_system_info", "")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["platform"], "testos");
        assert_eq!(body["result"]["path"], "NOT SET");
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let (app, sink) = app();
        let (status, body) = send(app, post("/execute/unknown_tool", "{}")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Unknown tool: unknown_tool" }));
        assert_eq!(sink.kinds(), vec!["tool_called", "tool_error"]);
    }

    #[tokio::test]
    async fn test_execute_invalid_arguments() {
        let (app, _) = app();
        let (status, body) = send(app, post("/execute/echo_env_vars", "{}")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid arguments"));
    }

    #[tokio::test]
    async fn test_execute_non_object_body_means_no_arguments() {
        let (app, sink) = app();
        let (status, body) = send(app, post("/execute/echo_env_vars", "\"x\"")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid arguments"));
        assert_eq!(sink.kinds(), vec!["tool_called", "tool_error"]);
    }

    #[tokio::test]
    async fn test_execute_unknown_tool_with_invalid_json() {
        let (app, _) = app();
        let (status, body) = send(app, post("/execute/unknown_tool", "not json")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Unknown tool: unknown_tool" }));
    }

    #[tokio::test]
    async fn test_health_and_root() {
        let (app, _) = app();
        let get = |uri: &str| {
            axum::http::Request::builder()
                .uri(uri)
                .body(Body::empty())
                .unwrap()
        };

        let (status, body) = send(app.clone(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["server"], "sysinfo-mcp-server");
        assert!(body["timestamp"].is_string());

        let (status, body) = send(app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transport"], "http");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_list_tools() {
        let (app, _) = app();
        let request = axum::http::Request::builder()
            .uri("/tools")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["get_system_info", "echo_env_vars"]);
        assert_eq!(body["tools"][0]["description"], "Get basic system information");
    }
}
