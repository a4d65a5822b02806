//! Integration-style tests exercising the engine through its public
//! message surface.

mod methods_tests;

use {
    crate::config::McpServerConfig,
    crate::engine::McpEngine,
    serde_json::{json, Value},
};

/// Engine with a fixed identity so response assertions stay stable
pub(crate) fn test_engine() -> McpEngine {
    McpEngine::new(McpServerConfig {
        server_name: "test-server".to_string(),
        server_version: "0.0.1".to_string(),
    })
}

/// Send one request through the engine and parse the response body
pub(crate) async fn roundtrip(engine: &McpEngine, method: &str, params: Value, id: u64) -> Value {
    let raw = json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
        "id": id,
    })
    .to_string();

    let response = engine
        .handle_message(&raw)
        .await
        .expect("request should produce a response");
    serde_json::from_str(&response).expect("response should be valid JSON")
}
