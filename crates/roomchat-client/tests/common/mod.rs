//! Test doubles: an in-memory transport and a recording view.

#![allow(dead_code)]

use roomchat_client::{ChatView, Connector, Control, EventSink, Link, TransportError};
use roomchat_core::MessageRecord;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Wire {
    urls: Vec<String>,
    sinks: Vec<EventSink>,
    sent: Vec<String>,
    fail_sends: bool,
}

/// Connector whose links record what was sent.
#[derive(Clone, Default)]
pub struct FakeConnector(Arc<Mutex<Wire>>);

pub struct FakeLink(Arc<Mutex<Wire>>);

impl Connector for FakeConnector {
    type Link = FakeLink;

    fn open(&mut self, url: &str, events: EventSink) -> FakeLink {
        let mut wire = self.0.lock().unwrap();
        wire.urls.push(url.to_string());
        wire.sinks.push(events);
        FakeLink(self.0.clone())
    }
}

impl Link for FakeLink {
    fn send(&mut self, text: String) -> Result<(), TransportError> {
        let mut wire = self.0.lock().unwrap();
        if wire.fail_sends {
            return Err(TransportError::Other("link refused frame".to_string()));
        }
        wire.sent.push(text);
        Ok(())
    }
}

impl FakeConnector {
    /// Event sink of the most recently opened link.
    pub fn sink(&self) -> EventSink {
        self.0.lock().unwrap().sinks.last().cloned().unwrap()
    }

    /// Make every link reject outgoing frames.
    pub fn fail_sends(&self, fail: bool) {
        self.0.lock().unwrap().fail_sends = fail;
    }

    pub fn urls(&self) -> Vec<String> {
        self.0.lock().unwrap().urls.clone()
    }

    /// Sent frames, parsed as JSON.
    pub fn sent(&self) -> Vec<serde_json::Value> {
        self.0
            .lock()
            .unwrap()
            .sent
            .iter()
            .map(|text| serde_json::from_str(text).unwrap())
            .collect()
    }
}

/// View that records every call.
#[derive(Default)]
pub struct RecordingView {
    pub messages: Vec<MessageRecord>,
    pub input: String,
    pub file: Option<PathBuf>,
    pub preview: Option<String>,
    pub dialog_open: bool,
    pub disabled: Vec<Control>,
    pub scrolls: usize,
}

impl ChatView for RecordingView {
    fn append_message(&mut self, record: &MessageRecord) {
        self.messages.push(record.clone());
    }

    fn remove_oldest(&mut self, count: usize) {
        self.messages.drain(..count.min(self.messages.len()));
    }

    fn scroll_to_bottom(&mut self) {
        self.scrolls += 1;
    }

    fn show_dialog(&mut self) {
        self.dialog_open = true;
    }

    fn hide_dialog(&mut self) {
        self.dialog_open = false;
    }

    fn input_text(&self) -> String {
        self.input.clone()
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }

    fn selected_file(&self) -> Option<PathBuf> {
        self.file.clone()
    }

    fn set_preview(&mut self, data_url: &str) {
        self.preview = Some(data_url.to_string());
    }

    fn disable_control(&mut self, control: Control) {
        self.disabled.push(control);
    }
}

pub fn payload(data: &str, color: &str) -> String {
    serde_json::json!({ "data": data, "color": color }).to_string()
}
