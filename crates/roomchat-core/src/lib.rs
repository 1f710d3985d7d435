//! Core types for roomchat.
//!
//! This crate holds the I/O-free parts of the chat widget: configuration,
//! the wire protocol, content classification and the bounded history.
//! Connections and attachments live in `roomchat-client`.

mod classify;
mod color;
mod config;
mod history;
mod message;

pub use classify::{ContentKind, classify};
pub use color::{Color, ColorParseError};
pub use config::{Config, ConfigError};
pub use history::{HistoryBuffer, MessageRecord, Rendered};
pub use message::{
    Action, IncomingPayload, OutgoingAction, ProtocolError, decode_incoming, encode_outgoing,
};

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No live connection.
    #[default]
    Closed,
    /// Connection requested, transport not yet open.
    Connecting,
    /// Normal operation.
    Open,
}
