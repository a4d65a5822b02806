//! Demo MCP server binary
//!
//! Runs the engine behind the HTTP transport with an echo tool and an echo
//! resource registered, the smallest useful exercise of every subsystem.

use {
    anyhow::Result,
    embermcp::{
        init_tracing, FnResource, FnTool, McpServer, McpServerConfig, ResourceConfig,
        SchemaBuilder, ToolConfig,
    },
    serde_json::{json, Value},
    std::sync::Arc,
    tracing::info,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let server = McpServer::new(McpServerConfig {
        server_name: "embermcp-demo".to_string(),
        server_version: env!("CARGO_PKG_VERSION").to_string(),
    });

    let echo_schema = SchemaBuilder::object()
        .string("message", Some("Text to echo back"), true)
        .build();

    server.register_tool(
        ToolConfig::new(
            "echo",
            Arc::new(FnTool::new(|arguments: Option<Value>| {
                let message = arguments
                    .as_ref()
                    .and_then(|args| args.get("message"))
                    .and_then(Value::as_str)
                    .unwrap_or("");
                Some(json!({
                    "content": [{ "type": "text", "text": format!("Echo: {message}") }]
                }))
            })),
        )
        .title("Echo")
        .description("Echo a message back to the caller")
        .input_schema(echo_schema),
    )?;

    server.register_resource(
        ResourceConfig::new(
            "echo://{message}",
            "echo",
            Arc::new(FnResource::new(|uri: &str| {
                let message = uri.strip_prefix("echo://").unwrap_or(uri);
                Some(format!("Echo resource: {message}"))
            })),
        )
        .title("Echo Resource")
        .description("Echoes the message segment of the URI"),
    )?;

    let stats = server.stats();
    info!(
        tools = stats.tools,
        resources = stats.resources,
        "Demo server configured"
    );

    server.start(3000).await
}
