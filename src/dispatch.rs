//! Method dispatch
//!
//! Routes parsed JSON-RPC messages to the built-in MCP method handlers and
//! translates each handler outcome into a wire string. Handlers return
//! `McpResult<Value>`: `Ok` wraps into a success response, `Err` into a
//! structured JSON-RPC error via [`McpError::error_code`]. This explicit
//! union is the only channel by which a handler signals a protocol-level
//! error instead of an application-level result.

use {
    crate::engine::McpEngine,
    crate::error::{McpError, McpResult},
    crate::protocol::{self, JsonRpcMessage},
    futures_util::future::BoxFuture,
    serde_json::Value,
    tracing::{debug, warn},
};

pub(crate) type MethodFuture<'a> = BoxFuture<'a, McpResult<Value>>;

/// Built-in method handler: `(engine, params, id)` to an async outcome
pub(crate) type MethodFn =
    for<'a> fn(&'a McpEngine, Option<&'a Value>, Option<&'a Value>) -> MethodFuture<'a>;

/// One row of the static method table
pub(crate) struct MethodEntry {
    pub name: &'static str,
    pub handler: MethodFn,
}

/// Linear scan for exact string equality; first match wins. The table is
/// duplicate-free by construction.
pub(crate) fn find_method<'t>(table: &'t [MethodEntry], name: &str) -> Option<&'t MethodEntry> {
    table.iter().find(|entry| entry.name == name)
}

/// Dispatch a parsed message.
///
/// Returns the wire string owed to the peer, or `None` when the exchange
/// produces no output: notifications never do, whatever their handler
/// returns. Response and Error inputs are not dispatchable and are rejected
/// as Invalid Request.
pub(crate) async fn dispatch(engine: &McpEngine, message: JsonRpcMessage) -> Option<String> {
    match message {
        JsonRpcMessage::Request { method, params, id } => {
            let Some(entry) = find_method(engine.methods(), &method) else {
                warn!(method = %method, "Unknown MCP method requested");
                return Some(McpError::UnknownMethod(method).to_json_rpc_error(Some(&id)));
            };

            debug!(method = %method, id = ?id, "Dispatching request");
            let outcome = (entry.handler)(engine, params.as_ref(), Some(&id)).await;
            Some(match outcome {
                Ok(result) => protocol::response(Some(&id), Some(&result)),
                Err(err) => {
                    warn!(method = %method, error = %err, "Method handler reported an error");
                    err.to_json_rpc_error(Some(&id))
                }
            })
        }
        JsonRpcMessage::Notification { method, params } => {
            match find_method(engine.methods(), &method) {
                Some(entry) => {
                    debug!(method = %method, "Dispatching notification");
                    // Outcome discarded: notifications never produce output
                    let _ = (entry.handler)(engine, params.as_ref(), None).await;
                }
                None => warn!(method = %method, "Unknown notification method ignored"),
            }
            None
        }
        other @ (JsonRpcMessage::Response { .. } | JsonRpcMessage::Error { .. }) => {
            let id = other.id().cloned();
            Some(
                McpError::InvalidRequest(
                    "only requests and notifications are accepted".to_string(),
                )
                .to_json_rpc_error(id.as_ref()),
            )
        }
    }
}
