//! Protocol messages.
//!
//! Outgoing: `{"text": .., "image": .., "action": "send"}`.
//! Incoming: `{"data": .., "color": ..}`.

use crate::Color;
use serde::{Deserialize, Serialize};

/// The only action a client performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Send,
}

/// Message sent from client to server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingAction {
    /// Chat text, or the file name for an image send.
    pub text: String,
    /// Empty for plain text, otherwise a data URL.
    pub image: String,
    pub action: Action,
}

impl OutgoingAction {
    /// Serialize to the wire representation.
    pub fn to_wire(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Message delivered from server to client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingPayload {
    /// Chat text or a hosted image URL.
    pub data: String,
    /// Sender color.
    pub color: Color,
}

/// Build the action for a send. `image_data_url` is empty for text.
pub fn encode_outgoing(text: &str, image_data_url: &str) -> OutgoingAction {
    OutgoingAction {
        text: text.to_string(),
        image: image_data_url.to_string(),
        action: Action::Send,
    }
}

/// Decode a raw wire message.
pub fn decode_incoming(raw: &str) -> Result<IncomingPayload, ProtocolError> {
    Ok(serde_json::from_str(raw)?)
}

/// Error decoding a wire message.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}
