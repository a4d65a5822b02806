//! Built-in MCP methods
//!
//! The static method table and the handlers behind it: capability
//! negotiation, ping, tool listing/invocation and resource
//! listing/reading. Tool and resource failures that belong to the
//! application (unknown tool, unmatched resource) are reported as data
//! inside a success payload per MCP content-reporting conventions; only
//! envelope and dispatcher failures become JSON-RPC protocol errors.

use {
    crate::dispatch::{MethodEntry, MethodFuture},
    crate::engine::McpEngine,
    crate::error::{McpError, McpResult},
    crate::registry::{ResourceInfo, ToolInfo},
    crate::schema,
    crate::uri_template,
    serde_json::{json, Value},
    tracing::{debug, info, warn},
};

/// MCP protocol revision this server speaks
pub const PROTOCOL_VERSION: &str = "2025-06-18";

/// Fallback tool substituted when no tools are registered
pub const BUILTIN_TOOL_NAME: &str = "get_system_info";

/// Fallback resource substituted when no resources are registered
pub const BUILTIN_RESOURCE_URI: &str = "system://status";
pub const BUILTIN_RESOURCE_NAME: &str = "system_status";

pub(crate) static MCP_METHODS: &[MethodEntry] = &[
    MethodEntry { name: "initialize", handler: initialize },
    MethodEntry { name: "initialized", handler: initialized },
    MethodEntry { name: "ping", handler: ping },
    MethodEntry { name: "tools/list", handler: tools_list },
    MethodEntry { name: "tools/call", handler: tools_call },
    MethodEntry { name: "resources/list", handler: resources_list },
    MethodEntry { name: "resources/read", handler: resources_read },
];

fn initialize<'a>(
    engine: &'a McpEngine,
    params: Option<&'a Value>,
    _id: Option<&'a Value>,
) -> MethodFuture<'a> {
    Box::pin(engine.handle_initialize(params))
}

fn initialized<'a>(
    engine: &'a McpEngine,
    _params: Option<&'a Value>,
    _id: Option<&'a Value>,
) -> MethodFuture<'a> {
    Box::pin(engine.handle_initialized())
}

fn ping<'a>(
    engine: &'a McpEngine,
    _params: Option<&'a Value>,
    _id: Option<&'a Value>,
) -> MethodFuture<'a> {
    Box::pin(engine.handle_ping())
}

fn tools_list<'a>(
    engine: &'a McpEngine,
    _params: Option<&'a Value>,
    _id: Option<&'a Value>,
) -> MethodFuture<'a> {
    Box::pin(engine.handle_tools_list())
}

fn tools_call<'a>(
    engine: &'a McpEngine,
    params: Option<&'a Value>,
    _id: Option<&'a Value>,
) -> MethodFuture<'a> {
    Box::pin(engine.handle_tools_call(params))
}

fn resources_list<'a>(
    engine: &'a McpEngine,
    _params: Option<&'a Value>,
    _id: Option<&'a Value>,
) -> MethodFuture<'a> {
    Box::pin(engine.handle_resources_list())
}

fn resources_read<'a>(
    engine: &'a McpEngine,
    params: Option<&'a Value>,
    _id: Option<&'a Value>,
) -> MethodFuture<'a> {
    Box::pin(engine.handle_resources_read(params))
}

impl McpEngine {
    /// Handle MCP initialization. Client params are accepted but unused;
    /// the response advertises this server's fixed capability set.
    async fn handle_initialize(&self, _params: Option<&Value>) -> McpResult<Value> {
        info!(server = %self.config().server_name, "Initialize request");

        Ok(json!({
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "subscribe": false, "listChanged": false },
            },
            "serverInfo": {
                "name": self.config().server_name,
                "version": self.config().server_version,
            },
            "protocolVersion": PROTOCOL_VERSION,
        }))
    }

    /// The `initialized` notification. The return value is discarded by the
    /// dispatcher because notifications never produce output.
    async fn handle_initialized(&self) -> McpResult<Value> {
        info!("Client sent initialized notification");
        Ok(json!({}))
    }

    async fn handle_ping(&self) -> McpResult<Value> {
        debug!("Ping request");
        Ok(json!({ "status": "pong" }))
    }

    /// List registered tools in registration order. An empty registry is
    /// never reported as an empty list: the built-in system-info tool is
    /// substituted instead.
    async fn handle_tools_list(&self) -> McpResult<Value> {
        let mut tools = self.registry().list_tools();
        if tools.is_empty() {
            tools.push(builtin_tool_info());
        }

        info!(count = tools.len(), "Listing tools");
        let tools = serde_json::to_value(tools)
            .map_err(|err| McpError::Internal(err.to_string()))?;
        Ok(json!({ "tools": tools }))
    }

    /// Invoke a tool by exact name.
    ///
    /// Arguments are checked against the tool's registered input schema
    /// before the handler runs; a violation is an Invalid Params protocol
    /// error and the handler is never called. An unknown name (after the
    /// single built-in fallback) is an application-level outcome reported
    /// inside a success payload, not a protocol error.
    async fn handle_tools_call(&self, params: Option<&Value>) -> McpResult<Value> {
        let params = params
            .ok_or_else(|| McpError::InvalidParams("missing params for tools/call".to_string()))?;
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| McpError::InvalidParams("missing required 'name' field".to_string()))?;
        let arguments = params.get("arguments");

        if let Some(tool) = self.registry().find_tool(name) {
            schema::validate_tool_arguments(arguments, tool.input_schema.as_ref())
                .map_err(McpError::SchemaViolation)?;

            info!(tool = %name, "Tool call");
            return match tool.handler.call(arguments.cloned()).await {
                Some(result) => Ok(result),
                None => Err(McpError::Internal(format!("tool '{name}' handler failed"))),
            };
        }

        if name == BUILTIN_TOOL_NAME {
            return Ok(self.builtin_system_info());
        }

        warn!(tool = %name, "Unknown tool requested");
        Ok(json!({ "error": "Unknown tool" }))
    }

    /// List registered resources, substituting the built-in system-status
    /// entry when none are registered.
    async fn handle_resources_list(&self) -> McpResult<Value> {
        let mut resources = self.registry().list_resources();
        if resources.is_empty() {
            resources.push(builtin_resource_info());
        }

        info!(count = resources.len(), "Listing resources");
        let resources = serde_json::to_value(resources)
            .map_err(|err| McpError::Internal(err.to_string()))?;
        Ok(json!({ "resources": resources }))
    }

    /// Read a resource by URI.
    ///
    /// Registered resources are tried in registration order against their
    /// URI templates; the first match whose handler produces content wins.
    /// A matching handler that declines (returns `None`) falls through to
    /// later candidates. The built-in fallback matches by exact literal
    /// URI only.
    async fn handle_resources_read(&self, params: Option<&Value>) -> McpResult<Value> {
        let params = params.ok_or_else(|| {
            McpError::InvalidParams("missing params for resources/read".to_string())
        })?;
        let uri = params
            .get("uri")
            .and_then(Value::as_str)
            .ok_or_else(|| McpError::InvalidParams("missing required 'uri' field".to_string()))?;

        for resource in self.registry().resources_snapshot() {
            if uri_template::match_template(&resource.uri_template, uri).is_some() {
                debug!(resource = %resource.name, uri = %uri, "Resource template matched");
                if let Some(text) = resource.handler.read(uri).await {
                    info!(resource = %resource.name, uri = %uri, "Resource read");
                    return Ok(json!({
                        "contents": [{
                            "uri": uri,
                            "mimeType": resource.mime_type,
                            "text": text,
                        }]
                    }));
                }
            }
        }

        if uri == BUILTIN_RESOURCE_URI {
            return Ok(json!({
                "contents": [{
                    "uri": uri,
                    "mimeType": "text/plain",
                    "text": self.builtin_system_status(),
                }]
            }));
        }

        warn!(uri = %uri, "Resource not found");
        Ok(json!({ "error": "Resource not found" }))
    }

    /// Result payload of the built-in system-info tool
    fn builtin_system_info(&self) -> Value {
        let text = format!(
            "System Information:\n\
             - Server: {} {}\n\
             - Uptime: {} ms\n\
             - Registered tools: {}\n\
             - Registered resources: {}\n",
            self.config().server_name,
            self.config().server_version,
            self.uptime_ms(),
            self.registry().tool_count(),
            self.registry().resource_count(),
        );

        json!({
            "content": [{ "type": "text", "text": text }]
        })
    }

    /// Text content of the built-in system-status resource
    fn builtin_system_status(&self) -> String {
        format!(
            "System Status Report\n\
             ====================\n\
             Server: {} {}\n\
             Protocol: {}\n\
             Uptime: {} ms\n\
             Registered Tools: {}\n\
             Registered Resources: {}\n",
            self.config().server_name,
            self.config().server_version,
            PROTOCOL_VERSION,
            self.uptime_ms(),
            self.registry().tool_count(),
            self.registry().resource_count(),
        )
    }
}

fn builtin_tool_info() -> ToolInfo {
    ToolInfo {
        name: BUILTIN_TOOL_NAME.to_string(),
        title: Some("System Information".to_string()),
        description: Some("Get server system information".to_string()),
        input_schema: Some(json!({
            "type": "object",
            "properties": {},
        })),
    }
}

fn builtin_resource_info() -> ResourceInfo {
    ResourceInfo {
        uri: BUILTIN_RESOURCE_URI.to_string(),
        name: BUILTIN_RESOURCE_NAME.to_string(),
        title: Some("System Status".to_string()),
        description: Some("Current server status".to_string()),
        mime_type: "text/plain".to_string(),
    }
}
