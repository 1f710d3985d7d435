//! Stdout rendering of the chat window.

use roomchat_client::{ChatView, Control};
use roomchat_core::{MessageRecord, Rendered};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct InputState {
    text: String,
    file: Option<PathBuf>,
}

/// What the user typed, shared between the stdin reader and the view.
#[derive(Debug, Clone, Default)]
pub struct UiInput(Arc<Mutex<InputState>>);

impl UiInput {
    pub fn set_text(&self, text: &str) {
        if let Ok(mut state) = self.0.lock() {
            state.text = text.to_string();
        }
    }

    pub fn set_file(&self, path: PathBuf) {
        if let Ok(mut state) = self.0.lock() {
            state.file = Some(path);
        }
    }

    pub fn text(&self) -> String {
        self.0.lock().map(|s| s.text.clone()).unwrap_or_default()
    }

    fn clear_text(&self) {
        if let Ok(mut state) = self.0.lock() {
            state.text.clear();
        }
    }

    pub fn file(&self) -> Option<PathBuf> {
        self.0.lock().ok().and_then(|s| s.file.clone())
    }
}

/// One output line for a record. Remote content never reaches the
/// terminal with its control characters intact.
fn format_record(record: &MessageRecord) -> String {
    let (r, g, b) = record.color.rgb();
    let who = if record.is_own { "you" } else { "  " };
    let body = match record.render() {
        Rendered::Text(text) => printable(text),
        Rendered::Image { src } => format!("[image] {}", printable(src)),
    };
    format!("\x1b[38;2;{r};{g};{b}m●\x1b[0m {who} {body}")
}

/// Escape control characters (ESC, BEL, CR, ...) so they print as text.
fn printable(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_control() {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    out
}

/// Prints each record as a colored marker followed by its content.
pub struct TerminalView {
    input: UiInput,
    upload_disabled: bool,
}

impl TerminalView {
    pub fn new(input: UiInput) -> Self {
        Self {
            input,
            upload_disabled: false,
        }
    }

    fn say(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{line}");
        let _ = out.flush();
    }
}

impl ChatView for TerminalView {
    fn append_message(&mut self, record: &MessageRecord) {
        self.say(&format_record(record));
    }

    // Printed lines cannot be taken back; the terminal scrollback is the window.
    fn remove_oldest(&mut self, _count: usize) {}

    fn scroll_to_bottom(&mut self) {}

    fn show_dialog(&mut self) {
        if self.upload_disabled {
            self.say("-- image dialog: an upload was already sent");
        } else {
            self.say("-- image dialog: /file <path>, then /upload or /cancel");
        }
    }

    fn hide_dialog(&mut self) {
        self.say("-- image dialog closed");
    }

    fn input_text(&self) -> String {
        self.input.text()
    }

    fn clear_input(&mut self) {
        self.input.clear_text();
    }

    fn selected_file(&self) -> Option<PathBuf> {
        self.input.file()
    }

    fn set_preview(&mut self, data_url: &str) {
        let head: String = data_url.chars().take(48).collect();
        self.say(&format!("-- preview ready: {head}..."));
    }

    fn disable_control(&mut self, control: Control) {
        match control {
            Control::UploadButton => self.upload_disabled = true,
        }
    }
}
