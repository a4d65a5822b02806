//! Server identity configuration
//!
//! The identity reported by `initialize`'s `serverInfo`. Transport knobs
//! (port, bind address) belong to the transport layer, not here.

#[derive(Debug, Clone)]
pub struct McpServerConfig {
    /// Server name reported in capabilities negotiation
    pub server_name: String,
    /// Server version reported in capabilities negotiation
    pub server_version: String,
}

impl Default for McpServerConfig {
    fn default() -> Self {
        Self {
            server_name: "embermcp-server".to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl McpServerConfig {
    pub fn new(server_name: impl Into<String>, server_version: impl Into<String>) -> Self {
        Self {
            server_name: server_name.into(),
            server_version: server_version.into(),
        }
    }
}
