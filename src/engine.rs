//! MCP protocol engine
//!
//! The core that transports talk to: a complete message payload string goes
//! in, and either a response string (for requests) or nothing (for
//! notifications) comes out. The engine owns the registry and the server
//! identity; parsing, dispatch and validation are reentrant, so one engine
//! is shared across transport tasks behind an `Arc`.

use {
    crate::config::McpServerConfig,
    crate::dispatch::{self, MethodEntry},
    crate::methods,
    crate::protocol::{self, JsonRpcMessage},
    crate::registry::Registry,
    std::time::Instant,
    tracing::{debug, error},
};

pub struct McpEngine {
    config: McpServerConfig,
    registry: Registry,
    methods: &'static [MethodEntry],
    started_at: Instant,
}

impl McpEngine {
    pub fn new(config: McpServerConfig) -> Self {
        Self {
            config,
            registry: Registry::new(),
            methods: methods::MCP_METHODS,
            started_at: Instant::now(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) fn config(&self) -> &McpServerConfig {
        &self.config
    }

    pub(crate) fn methods(&self) -> &'static [MethodEntry] {
        self.methods
    }

    /// Milliseconds since this engine was created
    pub(crate) fn uptime_ms(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }

    /// Process one raw JSON-RPC payload end to end.
    ///
    /// A parse failure (malformed JSON, bad `jsonrpc` version, ambiguous
    /// shape) is recovered here and converted into a Parse Error (-32700)
    /// response, since a reply may be owed and the message id is
    /// unrecoverable. Notifications always return `None`.
    pub async fn handle_message(&self, raw: &str) -> Option<String> {
        debug!(size = raw.len(), "Received MCP payload");

        match JsonRpcMessage::parse(raw) {
            Ok(message) => dispatch::dispatch(self, message).await,
            Err(err) => {
                error!(error = %err, "Failed to parse JSON-RPC message");
                Some(protocol::error_response(None, -32700, "Parse error", None))
            }
        }
    }
}

impl Default for McpEngine {
    fn default() -> Self {
        Self::new(McpServerConfig::default())
    }
}
