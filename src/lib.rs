//! embermcp, an embeddable MCP (Model Context Protocol) server engine
//!
//! JSON-RPC 2.0 message codec, method dispatch with a dynamic tool/resource
//! registry, restricted structural schema validation for tool arguments,
//! and URI template matching for resource addressing, with a thin HTTP
//! transport on top.

pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod logging;
pub mod protocol;
pub mod registry;
pub mod schema;
pub mod server;
pub mod uri_template;

mod dispatch;
mod methods;

// Test modules
#[cfg(test)]
mod tests;

// Re-export key types
pub use config::McpServerConfig;
pub use engine::McpEngine;
pub use error::{McpError, McpResult};
pub use logging::init_tracing;
pub use methods::PROTOCOL_VERSION;
pub use protocol::JsonRpcMessage;
pub use registry::{
    FnResource, FnTool, Registry, ResourceConfig, ResourceHandler, ResourceInfo, ToolConfig,
    ToolHandler, ToolInfo,
};
pub use schema::{SchemaBuilder, ValidationError, ValidationErrorKind};
pub use server::{McpServer, ServerStats};
