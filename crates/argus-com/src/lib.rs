//! Websocket transport for the per-frame streaming exchange.
//!
//! One endpoint, binary messages both ways: inbound compressed frame bytes,
//! outbound annotated frame bytes (or a textual notice). `WsListener` also
//! answers plain HTTP liveness probes on the same port.

pub mod client;
pub mod connection;
pub mod error;
pub mod listener;

pub use client::WsClient;
pub use connection::{FrameMessage, WsConnection, MAX_MESSAGE_SIZE};
pub use error::ComError;
pub use listener::WsListener;
