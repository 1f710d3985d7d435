//! Connection management.
//!
//! The manager owns at most one live link. Transports report lifecycle
//! events through an [`EventSink`]; the manager applies them to its state
//! machine and hands the current link's events to the caller.

use roomchat_core::{ConnectionState, OutgoingAction};
use tokio::sync::mpsc;

/// Lifecycle events produced by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Opened,
    /// A text frame was received.
    Message(String),
    /// The transport failed. `Closed` follows.
    Error(String),
    Closed,
}

/// Identifies one opened link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId(u64);

#[derive(Debug)]
struct TaggedEvent {
    link: LinkId,
    event: ConnectionEvent,
}

/// Where a transport delivers the events of one link.
#[derive(Debug, Clone)]
pub struct EventSink {
    link: LinkId,
    tx: mpsc::UnboundedSender<TaggedEvent>,
}

impl EventSink {
    pub fn link(&self) -> LinkId {
        self.link
    }

    pub fn opened(&self) {
        self.emit(ConnectionEvent::Opened);
    }

    pub fn message(&self, raw: impl Into<String>) {
        self.emit(ConnectionEvent::Message(raw.into()));
    }

    pub fn error(&self, reason: impl Into<String>) {
        self.emit(ConnectionEvent::Error(reason.into()));
    }

    pub fn closed(&self) {
        self.emit(ConnectionEvent::Closed);
    }

    fn emit(&self, event: ConnectionEvent) {
        // The manager is gone; nobody is listening anymore.
        let _ = self.tx.send(TaggedEvent {
            link: self.link,
            event,
        });
    }
}

/// Opens links to a server.
pub trait Connector {
    type Link: Link;

    /// Start connecting to `url`. The outcome is reported through `events`.
    fn open(&mut self, url: &str, events: EventSink) -> Self::Link;
}

/// An opened (or opening) link.
pub trait Link {
    /// Hand `text` to the transport for transmission.
    fn send(&mut self, text: String) -> Result<(), TransportError>;
}

/// Transport-level failure.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("transport is closed")]
    Closed,
    #[error("{0}")]
    Other(String),
}

/// Error sending an action.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("not connected")]
    NotConnected,
    #[error("failed to encode action: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

struct Handle<L> {
    id: LinkId,
    link: L,
    state: ConnectionState,
}

/// Owns the single live connection.
pub struct ConnectionManager<C: Connector> {
    connector: C,
    handle: Option<Handle<C::Link>>,
    next_id: u64,
    events_tx: mpsc::UnboundedSender<TaggedEvent>,
    events_rx: mpsc::UnboundedReceiver<TaggedEvent>,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            connector,
            handle: None,
            next_id: 0,
            events_tx,
            events_rx,
        }
    }

    /// Open a connection unless one already exists.
    pub fn connect(&mut self, url: &str) {
        if self.handle.is_some() {
            tracing::debug!("connect ignored, connection already exists");
            return;
        }

        let id = LinkId(self.next_id);
        self.next_id += 1;
        let sink = EventSink {
            link: id,
            tx: self.events_tx.clone(),
        };
        let link = self.connector.open(url, sink);
        self.handle = Some(Handle {
            id,
            link,
            state: ConnectionState::Connecting,
        });
        tracing::debug!("connecting to {}", url);
    }

    /// Encode and transmit an action over the open connection.
    pub fn send(&mut self, action: &OutgoingAction) -> Result<(), SendError> {
        let handle = match self.handle.as_mut() {
            Some(handle) if handle.state == ConnectionState::Open => handle,
            _ => return Err(SendError::NotConnected),
        };
        let text = action.to_wire()?;
        handle.link.send(text)?;
        Ok(())
    }

    pub fn state(&self) -> ConnectionState {
        self.handle
            .as_ref()
            .map_or(ConnectionState::Closed, |handle| handle.state)
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Wait for the next event of the live link.
    ///
    /// Events from links that are no longer live are dropped.
    pub async fn next_event(&mut self) -> ConnectionEvent {
        loop {
            let Some(tagged) = self.events_rx.recv().await else {
                // We hold a sender, so the channel never closes.
                return std::future::pending().await;
            };
            if let Some(event) = self.observe(tagged) {
                return event;
            }
        }
    }

    fn observe(&mut self, tagged: TaggedEvent) -> Option<ConnectionEvent> {
        let handle = match self.handle.as_mut() {
            Some(handle) if handle.id == tagged.link => handle,
            _ => {
                tracing::debug!("dropping event from stale link {:?}", tagged.link);
                return None;
            }
        };

        match &tagged.event {
            ConnectionEvent::Opened => handle.state = ConnectionState::Open,
            ConnectionEvent::Message(_) => {}
            ConnectionEvent::Error(_) | ConnectionEvent::Closed => self.handle = None,
        }
        Some(tagged.event)
    }
}
