//! MCP server public API
//!
//! High-level handle that owns the protocol engine: register tools and
//! resources, process messages directly when embedding, or serve the HTTP
//! transport.

use {
    crate::config::McpServerConfig,
    crate::engine::McpEngine,
    crate::error::McpResult,
    crate::http,
    crate::registry::{ResourceConfig, ResourceInfo, ToolConfig, ToolInfo},
    anyhow::Result,
    std::sync::Arc,
    tracing::info,
};

/// Registry size snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerStats {
    pub tools: usize,
    pub resources: usize,
}

pub struct McpServer {
    engine: Arc<McpEngine>,
}

impl McpServer {
    /// Create a server with the given identity
    pub fn new(config: McpServerConfig) -> Self {
        info!(server = %config.server_name, version = %config.server_version, "Initializing MCP server");
        Self {
            engine: Arc::new(McpEngine::new(config)),
        }
    }

    /// Register a tool. Tools should be registered before the transport
    /// starts, but registration while serving is safe.
    pub fn register_tool(&self, config: ToolConfig) -> McpResult<()> {
        self.engine.registry().register_tool(config)
    }

    /// Register a resource
    pub fn register_resource(&self, config: ResourceConfig) -> McpResult<()> {
        self.engine.registry().register_resource(config)
    }

    /// Remove a tool by name. Safe while requests are in flight: a dispatch
    /// that already resolved the tool finishes with its own handler clone.
    pub fn unregister_tool(&self, name: &str) -> McpResult<()> {
        self.engine.registry().unregister_tool(name)
    }

    /// Remove a resource by name
    pub fn unregister_resource(&self, name: &str) -> McpResult<()> {
        self.engine.registry().unregister_resource(name)
    }

    /// Registered tool projections, in registration order
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.engine.registry().list_tools()
    }

    /// Registered resource projections, in registration order
    pub fn list_resources(&self) -> Vec<ResourceInfo> {
        self.engine.registry().list_resources()
    }

    pub fn stats(&self) -> ServerStats {
        ServerStats {
            tools: self.engine.registry().tool_count(),
            resources: self.engine.registry().resource_count(),
        }
    }

    /// Process one raw JSON-RPC payload without any transport, for
    /// embedders that bring their own. Requests yield a response string,
    /// notifications yield `None`.
    pub async fn handle_message(&self, raw: &str) -> Option<String> {
        self.engine.handle_message(raw).await
    }

    /// Shared engine handle for transport wiring
    pub fn engine(&self) -> Arc<McpEngine> {
        self.engine.clone()
    }

    /// Serve the HTTP transport on the given port until the task is
    /// cancelled or the listener fails.
    pub async fn start(&self, port: u16) -> Result<()> {
        info!(port = port, "Starting MCP server");
        http::serve(self.engine.clone(), port).await
    }
}

impl Default for McpServer {
    fn default() -> Self {
        Self::new(McpServerConfig::default())
    }
}
