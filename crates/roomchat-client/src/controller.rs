//! Chat orchestration.
//!
//! The controller turns UI intents into protocol sends and connection
//! events into history updates and render calls. Everything runs on one
//! event loop; the only suspension points are connection events and
//! attachment completions.

use crate::attachment::{self, Attachment, ReadError};
use crate::connection::{ConnectionEvent, ConnectionManager, Connector, SendError};
use roomchat_core::{
    Config, ConnectionState, HistoryBuffer, IncomingPayload, MessageRecord, decode_incoming,
    encode_outgoing,
};
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Controls the view can disable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// The dialog button that confirms an image upload.
    UploadButton,
}

/// Capabilities the hosting UI provides.
pub trait ChatView {
    /// Draw a record at the bottom of the message list.
    fn append_message(&mut self, record: &MessageRecord);
    /// Remove the `count` oldest drawn records.
    fn remove_oldest(&mut self, count: usize);
    fn scroll_to_bottom(&mut self);
    fn show_dialog(&mut self);
    fn hide_dialog(&mut self);
    /// Current content of the text input.
    fn input_text(&self) -> String;
    fn clear_input(&mut self);
    /// File currently chosen in the image picker.
    fn selected_file(&self) -> Option<PathBuf>;
    fn set_preview(&mut self, data_url: &str);
    fn disable_control(&mut self, control: Control);
}

/// User actions coming from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Connect to the configured endpoint. A no-op while a connection exists.
    Connect,
    /// Send the text input (send button or Enter).
    SubmitText,
    OpenDialog,
    CloseDialog,
    /// A file was picked in the image dialog.
    SelectFile,
    /// Upload the pending image.
    ConfirmImage,
}

#[derive(Debug)]
struct EncodedAttachment {
    selection: u64,
    result: Result<Attachment, ReadError>,
}

enum Input {
    Connection(ConnectionEvent),
    Attachment(EncodedAttachment),
}

/// Composes connection, codec, classifier and history for one chat room.
pub struct ChatController<C: Connector, V: ChatView> {
    config: Config,
    connection: ConnectionManager<C>,
    history: HistoryBuffer,
    view: V,
    pending: Option<Attachment>,
    selection: u64,
    attachments_tx: mpsc::UnboundedSender<EncodedAttachment>,
    attachments_rx: mpsc::UnboundedReceiver<EncodedAttachment>,
}

impl<C: Connector, V: ChatView> ChatController<C, V> {
    pub fn new(config: Config, connector: C, view: V) -> Self {
        let (attachments_tx, attachments_rx) = mpsc::unbounded_channel();
        Self {
            history: HistoryBuffer::new(config.history_cap()),
            config,
            connection: ConnectionManager::new(connector),
            view,
            pending: None,
            selection: 0,
            attachments_tx,
            attachments_rx,
        }
    }

    /// Connect to the configured endpoint.
    pub fn start(&mut self) {
        self.connection.connect(self.config.endpoint_url());
    }

    /// Show log entries the server rendered before the connection existed.
    pub fn preload(&mut self, entries: impl IntoIterator<Item = IncomingPayload>) {
        for payload in entries {
            let record = MessageRecord::incoming(payload, self.config.asset_prefix());
            self.push(record);
        }
    }

    /// Drive the chat until the UI stops sending intents.
    pub async fn run(mut self, mut intents: mpsc::Receiver<Intent>) -> Self {
        self.start();
        loop {
            tokio::select! {
                intent = intents.recv() => match intent {
                    Some(intent) => self.handle_intent(intent),
                    None => break,
                },
                input = next_input(&mut self.connection, &mut self.attachments_rx) => {
                    self.dispatch(input);
                }
            }
        }
        self
    }

    /// Process one connection event or attachment completion.
    pub async fn pump(&mut self) {
        let input = next_input(&mut self.connection, &mut self.attachments_rx).await;
        self.dispatch(input);
    }

    pub fn handle_intent(&mut self, intent: Intent) {
        match intent {
            Intent::Connect => self.start(),
            Intent::SubmitText => self.submit_text(),
            Intent::OpenDialog => self.view.show_dialog(),
            Intent::CloseDialog => self.view.hide_dialog(),
            Intent::SelectFile => self.select_file(),
            Intent::ConfirmImage => self.confirm_image(),
        }
    }

    /// Send the typed text and echo it locally.
    pub fn submit_text(&mut self) {
        let text = self.view.input_text();
        if text.is_empty() {
            return;
        }

        let action = encode_outgoing(&text, "");
        match self.connection.send(&action) {
            Ok(()) => {
                let record = MessageRecord::own(text, self.config.asset_prefix());
                self.push(record);
                self.view.clear_input();
            }
            Err(SendError::NotConnected) => tracing::debug!("not connected, message dropped"),
            Err(e) => tracing::warn!("Failed to send message: {}", e),
        }
    }

    /// Start encoding the selected file. Supersedes any earlier selection.
    ///
    /// # Panics
    ///
    /// Spawns the read on the current tokio runtime; panics outside one.
    pub fn select_file(&mut self) {
        let Some(path) = self.view.selected_file() else {
            return;
        };

        self.selection += 1;
        self.pending = None;
        let selection = self.selection;
        let tx = self.attachments_tx.clone();
        tokio::spawn(async move {
            let result = attachment::encode(&path).await;
            let _ = tx.send(EncodedAttachment { selection, result });
        });
    }

    /// Upload the pending image, or close the dialog if there is none.
    pub fn confirm_image(&mut self) {
        let Some(attachment) = self.pending.as_ref() else {
            self.view.hide_dialog();
            return;
        };

        self.view.disable_control(Control::UploadButton);
        let action = encode_outgoing(&attachment.file_name, &attachment.data_url);
        match self.connection.send(&action) {
            Ok(()) => {
                // The server broadcasts the hosted image back to us.
                self.pending = None;
                self.view.clear_input();
                self.view.hide_dialog();
            }
            Err(SendError::NotConnected) => tracing::debug!("not connected, image dropped"),
            Err(e) => tracing::warn!("Failed to send image: {}", e),
        }
    }

    fn dispatch(&mut self, input: Input) {
        match input {
            Input::Connection(event) => self.on_connection_event(event),
            Input::Attachment(encoded) => self.on_attachment(encoded),
        }
    }

    fn on_connection_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Opened => tracing::info!("Joined {}", self.config.endpoint_url()),
            ConnectionEvent::Message(raw) => match decode_incoming(&raw) {
                Ok(payload) => {
                    let record = MessageRecord::incoming(payload, self.config.asset_prefix());
                    self.push(record);
                }
                Err(e) => tracing::warn!("Dropping inbound message: {}", e),
            },
            ConnectionEvent::Error(reason) => {
                tracing::warn!("Connection error: {}", reason);
                self.push(MessageRecord::connection_error());
            }
            ConnectionEvent::Closed => tracing::info!("Connection closed"),
        }
    }

    fn on_attachment(&mut self, encoded: EncodedAttachment) {
        if encoded.selection != self.selection {
            tracing::debug!("ignoring superseded attachment {}", encoded.selection);
            return;
        }
        match encoded.result {
            Ok(attachment) => {
                self.view.set_preview(&attachment.data_url);
                self.pending = Some(attachment);
            }
            Err(e) => tracing::warn!("{}", e),
        }
    }

    fn push(&mut self, record: MessageRecord) {
        let evicted = self.history.append(record);
        if evicted > 0 {
            self.view.remove_oldest(evicted);
        }
        if let Some(latest) = self.history.latest() {
            self.view.append_message(latest);
        }
        self.view.scroll_to_bottom();
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn pending_attachment(&self) -> Option<&Attachment> {
        self.pending.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }
}

async fn next_input<C: Connector>(
    connection: &mut ConnectionManager<C>,
    attachments: &mut mpsc::UnboundedReceiver<EncodedAttachment>,
) -> Input {
    tokio::select! {
        event = connection.next_event() => Input::Connection(event),
        Some(encoded) = attachments.recv() => Input::Attachment(encoded),
    }
}
