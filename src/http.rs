//! HTTP transport
//!
//! Thin warp consumer of the protocol engine: one JSON-RPC message per
//! `POST /mcp` exchange, CORS preflight on `OPTIONS /mcp`, and a health
//! probe. Parse failures travel back as a -32700 response body, not as an
//! HTTP error; notifications get an empty 200.

use {
    crate::engine::McpEngine,
    crate::logging::RequestId,
    anyhow::{Context, Result},
    std::sync::Arc,
    tracing::{debug, info},
    warp::{http::StatusCode, Filter, Rejection, Reply},
};

const ALLOW_ORIGIN: &str = "*";
const ALLOW_METHODS: &str = "POST, GET, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, MCP-Protocol-Version";

pub struct HttpTransport {
    engine: Arc<McpEngine>,
}

impl HttpTransport {
    pub fn new(engine: Arc<McpEngine>) -> Self {
        Self { engine }
    }

    pub fn route(&self) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
        let post_route = warp::path!("mcp")
            .and(warp::post())
            .and(warp::body::bytes())
            .and(with_engine(self.engine.clone()))
            .and_then(handle_mcp_post);

        let options_route = warp::path!("mcp")
            .and(warp::options())
            .map(|| cors(warp::reply::with_status(String::new(), StatusCode::OK)));

        let health_route = warp::path!("health")
            .and(warp::get())
            .map(|| warp::reply::with_status("OK", StatusCode::OK));

        post_route.or(options_route).or(health_route)
    }
}

fn with_engine(
    engine: Arc<McpEngine>,
) -> impl Filter<Extract = (Arc<McpEngine>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || engine.clone())
}

fn cors(reply: impl Reply) -> impl Reply {
    let reply = warp::reply::with_header(reply, "Access-Control-Allow-Origin", ALLOW_ORIGIN);
    let reply = warp::reply::with_header(reply, "Access-Control-Allow-Methods", ALLOW_METHODS);
    warp::reply::with_header(reply, "Access-Control-Allow-Headers", ALLOW_HEADERS)
}

async fn handle_mcp_post(
    body: warp::hyper::body::Bytes,
    engine: Arc<McpEngine>,
) -> Result<impl Reply, Rejection> {
    let request_id = RequestId::new();
    let raw = String::from_utf8_lossy(&body);
    debug!(request_id = %request_id, size = raw.len(), "HTTP MCP request");

    // Notifications owe no body; an empty 200 closes the exchange
    let body = engine.handle_message(&raw).await.unwrap_or_default();
    debug!(request_id = %request_id, response_size = body.len(), "HTTP MCP response");

    let reply = warp::reply::with_status(body, StatusCode::OK);
    let reply = warp::reply::with_header(reply, "content-type", "application/json");
    Ok(cors(reply))
}

/// Bind and serve the transport until cancelled
pub async fn serve(engine: Arc<McpEngine>, port: u16) -> Result<()> {
    let routes = HttpTransport::new(engine).route();

    let addr = format!("127.0.0.1:{port}")
        .parse::<std::net::SocketAddr>()
        .context("Invalid address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Could not bind to {addr}"))?;

    info!(address = %addr, "MCP server listening on http://{addr}/mcp");

    use tokio_stream::wrappers::TcpListenerStream;
    warp::serve(routes)
        .run_incoming(TcpListenerStream::new(listener))
        .await;

    Ok(())
}
