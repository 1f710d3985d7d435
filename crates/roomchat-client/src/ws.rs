//! WebSocket transport.

use crate::connection::{Connector, EventSink, Link, TransportError};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

/// Opens WebSocket links with `tokio-tungstenite`.
///
/// Each link runs on its own task; must be used inside a tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

/// A WebSocket link. Dropping it tears the connection down.
#[derive(Debug)]
pub struct WsLink {
    outgoing: mpsc::UnboundedSender<String>,
    task: JoinHandle<()>,
}

impl Connector for WsConnector {
    type Link = WsLink;

    fn open(&mut self, url: &str, events: EventSink) -> WsLink {
        let (outgoing, outgoing_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(drive(url.to_string(), outgoing_rx, events));
        WsLink { outgoing, task }
    }
}

impl Link for WsLink {
    fn send(&mut self, text: String) -> Result<(), TransportError> {
        self.outgoing.send(text).map_err(|_| TransportError::Closed)
    }
}

impl Drop for WsLink {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn drive(url: String, mut outgoing: mpsc::UnboundedReceiver<String>, events: EventSink) {
    let ws = match tokio_tungstenite::connect_async(url.as_str()).await {
        Ok((ws, _)) => ws,
        Err(e) => {
            tracing::warn!("Failed to connect to {}: {}", url, e);
            events.error(e.to_string());
            events.closed();
            return;
        }
    };
    events.opened();

    let (mut sink, mut stream) = ws.split();

    loop {
        tokio::select! {
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => events.message(text.to_string()),
                    Some(Ok(Message::Close(_))) | None => break,
                    // Binary frames are not part of the protocol; pings are answered by tungstenite.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!("WebSocket error: {}", e);
                        events.error(e.to_string());
                        break;
                    }
                }
            }

            Some(text) = outgoing.recv() => {
                if let Err(e) = sink.send(Message::Text(text.into())).await {
                    tracing::debug!("WebSocket send failed: {}", e);
                    events.error(e.to_string());
                    break;
                }
            }
        }
    }

    events.closed();
}
