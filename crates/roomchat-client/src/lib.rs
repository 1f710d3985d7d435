//! Client side of roomchat.
//!
//! [`ChatController`] drives a single chat room: it owns the connection
//! (through a [`Connector`]), the bounded history and any pending image
//! attachment, and talks to the hosting UI through [`ChatView`].
//!
//! ```no_run
//! # async fn demo(view: impl roomchat_client::ChatView) -> Result<(), Box<dyn std::error::Error>> {
//! use roomchat_client::{ChatController, Intent, WsConnector};
//! use roomchat_core::Config;
//!
//! let config = Config::new("wss://chat.example.com", 50, "assets.example.com")?;
//! let (intents_tx, intents_rx) = tokio::sync::mpsc::channel(16);
//! let controller = ChatController::new(config, WsConnector, view);
//! intents_tx.send(Intent::SubmitText).await?;
//! controller.run(intents_rx).await;
//! # Ok(())
//! # }
//! ```

pub mod attachment;
mod connection;
mod controller;
mod ws;

pub use attachment::{Attachment, ReadError};
pub use connection::{
    ConnectionEvent, ConnectionManager, Connector, EventSink, Link, LinkId, SendError,
    TransportError,
};
pub use controller::{ChatController, ChatView, Control, Intent};
pub use ws::{WsConnector, WsLink};
