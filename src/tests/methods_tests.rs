//! Built-in MCP method behavior: initialization, listing, tool calls with
//! schema enforcement, and resource reads with template matching.

use {
    super::{roundtrip, test_engine},
    crate::methods::PROTOCOL_VERSION,
    crate::registry::{FnResource, FnTool, ResourceConfig, ToolConfig},
    crate::schema::SchemaBuilder,
    serde_json::{json, Value},
    std::sync::atomic::{AtomicUsize, Ordering},
    std::sync::Arc,
};

#[tokio::test]
async fn test_initialize_advertises_fixed_capabilities() {
    let engine = test_engine();
    let body = roundtrip(&engine, "initialize", json!({"clientInfo": {"name": "t"}}), 1).await;

    let result = &body["result"];
    assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
    assert_eq!(result["serverInfo"]["name"], "test-server");
    assert_eq!(result["serverInfo"]["version"], "0.0.1");
    assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
    assert_eq!(result["capabilities"]["resources"]["subscribe"], false);
    assert_eq!(result["capabilities"]["resources"]["listChanged"], false);
}

#[tokio::test]
async fn test_tools_list_falls_back_to_builtin_when_empty() {
    let engine = test_engine();
    let body = roundtrip(&engine, "tools/list", json!({}), 1).await;

    let tools = body["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "get_system_info");
}

#[tokio::test]
async fn test_tools_list_reports_registered_tools_in_order() {
    let engine = test_engine();
    for name in ["alpha", "beta"] {
        engine
            .registry()
            .register_tool(ToolConfig::new(
                name,
                Arc::new(FnTool::new(|_: Option<Value>| Some(json!({})))),
            ))
            .unwrap();
    }

    let body = roundtrip(&engine, "tools/list", json!({}), 1).await;
    let tools = body["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 2);
    assert_eq!(tools[0]["name"], "alpha");
    assert_eq!(tools[1]["name"], "beta");
}

#[tokio::test]
async fn test_tools_call_invokes_registered_handler() {
    let engine = test_engine();
    engine
        .registry()
        .register_tool(ToolConfig::new(
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
        ))
        .unwrap();

    let params = json!({"name": "echo", "arguments": {"message": "hi"}});
    let body = roundtrip(&engine, "tools/call", params, 1).await;
    assert_eq!(body["result"]["content"][0]["text"], "Echo: hi");
}

#[tokio::test]
async fn test_tools_call_unknown_tool_is_application_level_error() {
    let engine = test_engine();
    let body = roundtrip(&engine, "tools/call", json!({"name": "nope"}), 1).await;

    // A success envelope carrying the error as payload, not a protocol error
    assert!(body.get("error").is_none());
    assert_eq!(body["result"]["error"], "Unknown tool");
}

#[tokio::test]
async fn test_tools_call_missing_name_is_invalid_params() {
    let engine = test_engine();
    let body = roundtrip(&engine, "tools/call", json!({"arguments": {}}), 1).await;
    assert_eq!(body["error"]["code"], -32602);

    let raw = r#"{"jsonrpc":"2.0","method":"tools/call","id":2}"#;
    let response = engine.handle_message(raw).await.unwrap();
    let body: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(body["error"]["code"], -32602);
}

#[tokio::test]
async fn test_tools_call_schema_violation_skips_handler() {
    let engine = test_engine();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let schema = SchemaBuilder::object()
        .string("message", Some("Text to echo"), true)
        .integer("level", Some("Verbosity"), Some(0), Some(10), false)
        .build();

    engine
        .registry()
        .register_tool(
            ToolConfig::new(
                "strict",
                Arc::new(FnTool::new(move |_: Option<Value>| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Some(json!({}))
                })),
            )
            .input_schema(schema),
        )
        .unwrap();

    // Missing required property
    let body = roundtrip(&engine, "tools/call", json!({"name": "strict", "arguments": {}}), 1).await;
    assert_eq!(body["error"]["code"], -32602);
    assert_eq!(body["error"]["data"]["kind"], "missing_required");

    // Wrong type
    let params = json!({"name": "strict", "arguments": {"message": 42}});
    let body = roundtrip(&engine, "tools/call", params, 2).await;
    assert_eq!(body["error"]["code"], -32602);
    assert_eq!(body["error"]["data"]["kind"], "type_mismatch");
    assert_eq!(body["error"]["data"]["path"], "root.message");

    // Out of range
    let params = json!({"name": "strict", "arguments": {"message": "hi", "level": 11}});
    let body = roundtrip(&engine, "tools/call", params, 3).await;
    assert_eq!(body["error"]["code"], -32602);
    assert_eq!(body["error"]["data"]["kind"], "out_of_range");

    assert_eq!(calls.load(Ordering::SeqCst), 0);

    // A conforming call finally reaches the handler
    let params = json!({"name": "strict", "arguments": {"message": "hi", "level": 3}});
    let body = roundtrip(&engine, "tools/call", params, 4).await;
    assert!(body.get("error").is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_tools_call_handler_failure_is_internal_error() {
    let engine = test_engine();
    engine
        .registry()
        .register_tool(ToolConfig::new(
            "broken",
            Arc::new(FnTool::new(|_: Option<Value>| None::<Value>)),
        ))
        .unwrap();

    let body = roundtrip(&engine, "tools/call", json!({"name": "broken"}), 1).await;
    assert_eq!(body["error"]["code"], -32603);
}

#[tokio::test]
async fn test_builtin_tool_works_only_on_empty_registry_miss() {
    let engine = test_engine();
    let body = roundtrip(&engine, "tools/call", json!({"name": "get_system_info"}), 1).await;

    let text = body["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("test-server"));

    // A registered tool with the same name shadows the built-in
    engine
        .registry()
        .register_tool(ToolConfig::new(
            "get_system_info",
            Arc::new(FnTool::new(|_: Option<Value>| Some(json!({"custom": true})))),
        ))
        .unwrap();

    let body = roundtrip(&engine, "tools/call", json!({"name": "get_system_info"}), 2).await;
    assert_eq!(body["result"]["custom"], true);
}

#[tokio::test]
async fn test_resources_list_falls_back_to_builtin_when_empty() {
    let engine = test_engine();
    let body = roundtrip(&engine, "resources/list", json!({}), 1).await;

    let resources = body["result"]["resources"].as_array().unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0]["uri"], "system://status");
    assert_eq!(resources[0]["name"], "system_status");
    assert_eq!(resources[0]["mimeType"], "text/plain");
}

#[tokio::test]
async fn test_resources_read_matches_template() {
    let engine = test_engine();
    engine
        .registry()
        .register_resource(ResourceConfig::new(
            "echo://{message}",
            "echo",
            Arc::new(FnResource::new(|uri: &str| {
                Some(format!("got {uri}"))
            })),
        ))
        .unwrap();

    let body = roundtrip(&engine, "resources/read", json!({"uri": "echo://hello"}), 1).await;
    let contents = &body["result"]["contents"][0];
    assert_eq!(contents["uri"], "echo://hello");
    assert_eq!(contents["mimeType"], "text/plain");
    assert_eq!(contents["text"], "got echo://hello");
}

#[tokio::test]
async fn test_resources_read_declining_handler_falls_through() {
    let engine = test_engine();
    engine
        .registry()
        .register_resource(ResourceConfig::new(
            "data://{key}",
            "picky",
            Arc::new(FnResource::new(|_: &str| None)),
        ))
        .unwrap();
    engine
        .registry()
        .register_resource(ResourceConfig::new(
            "data://{key}",
            "catchall",
            Arc::new(FnResource::new(|_: &str| Some("served".to_string()))),
        ))
        .unwrap();

    let body = roundtrip(&engine, "resources/read", json!({"uri": "data://x"}), 1).await;
    assert_eq!(body["result"]["contents"][0]["text"], "served");
}

#[tokio::test]
async fn test_resources_read_unknown_uri_is_application_level_error() {
    let engine = test_engine();
    engine
        .registry()
        .register_resource(ResourceConfig::new(
            "data://{key}",
            "data",
            Arc::new(FnResource::new(|_: &str| Some("x".to_string()))),
        ))
        .unwrap();

    let body = roundtrip(&engine, "resources/read", json!({"uri": "other://thing/extra"}), 1).await;
    assert!(body.get("error").is_none());
    assert_eq!(body["result"]["error"], "Resource not found");
}

#[tokio::test]
async fn test_resources_read_builtin_status() {
    let engine = test_engine();
    let body = roundtrip(&engine, "resources/read", json!({"uri": "system://status"}), 1).await;

    let text = body["result"]["contents"][0]["text"].as_str().unwrap();
    assert!(text.contains("System Status Report"));
    assert!(text.contains("test-server"));
}

#[tokio::test]
async fn test_resources_read_missing_uri_is_invalid_params() {
    let engine = test_engine();
    let body = roundtrip(&engine, "resources/read", json!({}), 1).await;
    assert_eq!(body["error"]["code"], -32602);
}
