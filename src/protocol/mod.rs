//! JSON-RPC 2.0 message processing
//!
//! This module contains the message codec: parsing inbound payloads into
//! typed messages and building outbound request/response/error strings.

pub mod message;

pub use message::{
    error_response, notification, request, response, JsonRpcMessage, JSONRPC_VERSION,
};
