//! Terminal front-end for roomchat.
//!
//! Plays the part of the hosting page: loads configuration, draws the
//! message list on stdout and turns typed lines into UI intents.
//!
//!   WEBSOCKET_URL=wss://chat.example.com/prod LIMIT_MESSAGE_COUNT=50 \
//!   BUCKET_NAME=my-bucket cargo run -p roomchat-example-terminal
//!
//! Lines are sent as chat messages. Commands:
//!   /connect        reconnect after the connection dropped
//!   /image          open the image dialog
//!   /file <path>    pick a file in the dialog
//!   /upload         upload the picked image
//!   /cancel         close the dialog

mod view;

use anyhow::Context;
use clap::Parser;
use roomchat_client::{ChatController, Intent, WsConnector};
use roomchat_core::Config;
use std::path::PathBuf;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use view::{TerminalView, UiInput};

#[derive(Parser, Debug)]
#[command(name = "roomchat", about = "Single-room chat client")]
struct Args {
    /// TOML file with endpoint_url, history_cap and asset_prefix.
    /// Takes precedence over the other options.
    #[arg(long)]
    config: Option<PathBuf>,

    /// WebSocket endpoint of the chat server.
    #[arg(long, env = "WEBSOCKET_URL")]
    url: Option<String>,

    /// Maximum number of messages kept on screen.
    #[arg(long, env = "LIMIT_MESSAGE_COUNT", default_value_t = 50)]
    max: usize,

    /// Host prefix of uploaded images.
    #[arg(long, env = "BUCKET_NAME", default_value = "")]
    bucket: String,
}

impl Args {
    fn load_config(&self) -> anyhow::Result<Config> {
        if let Some(path) = &self.config {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            return Ok(Config::from_toml_str(&text)?);
        }
        let url = self
            .url
            .clone()
            .context("no endpoint: pass --url, set WEBSOCKET_URL or use --config")?;
        Ok(Config::new(url, self.max, self.bucket.clone())?)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("roomchat=info".parse()?))
        .init();

    let args = Args::parse();
    let config = args.load_config()?;
    tracing::info!("Connecting to {}", config.endpoint_url());

    let ui = UiInput::default();
    let view = TerminalView::new(ui.clone());
    let (intents_tx, intents_rx) = mpsc::channel(16);

    let reader = tokio::spawn(read_lines(
        BufReader::new(tokio::io::stdin()),
        ui,
        intents_tx,
    ));

    let controller = ChatController::new(config, WsConnector, view);
    controller.run(intents_rx).await;

    match reader.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!("Failed to read input: {}", e),
        Err(e) => tracing::warn!("Input reader stopped: {}", e),
    }
    Ok(())
}

/// Translate input lines into intents. Ends the session on EOF.
///
/// Lines are decoded lossily so a stray invalid byte does not end the
/// session.
async fn read_lines<R>(
    mut reader: R,
    ui: UiInput,
    intents: mpsc::Sender<Intent>,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        let intent = intent_for_line(&ui, line.trim_end_matches(['\r', '\n']));
        if intents.send(intent).await.is_err() {
            return Ok(());
        }
    }
}

fn intent_for_line(ui: &UiInput, line: &str) -> Intent {
    if let Some(path) = line.strip_prefix("/file ") {
        ui.set_file(PathBuf::from(path.trim()));
        return Intent::SelectFile;
    }
    match line {
        "/connect" => Intent::Connect,
        "/image" => Intent::OpenDialog,
        "/upload" => Intent::ConfirmImage,
        "/cancel" => Intent::CloseDialog,
        text => {
            ui.set_text(text);
            Intent::SubmitText
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn read_all(input: &[u8]) -> (Vec<Intent>, UiInput) {
        let ui = UiInput::default();
        let (tx, mut rx) = mpsc::channel(16);
        read_lines(input, ui.clone(), tx).await.unwrap();

        let mut intents = Vec::new();
        while let Some(intent) = rx.recv().await {
            intents.push(intent);
        }
        (intents, ui)
    }

    #[tokio::test]
    async fn invalid_utf8_does_not_end_input() {
        let (intents, ui) = read_all(b"hello\n\xff\xfe bad\n/connect\nafter\n").await;

        assert_eq!(
            intents,
            [
                Intent::SubmitText,
                Intent::SubmitText,
                Intent::Connect,
                Intent::SubmitText,
            ]
        );
        assert_eq!(ui.text(), "after");
    }

    #[tokio::test]
    async fn lossy_line_is_sent_as_text() {
        let (_, ui) = read_all(b"caf\xe9\r\n").await;
        assert_eq!(ui.text(), "caf\u{fffd}");
    }

    #[tokio::test]
    async fn commands_map_to_intents() {
        let (intents, ui) = read_all(b"/image\n/file  cat.png \n/upload\n/cancel").await;

        assert_eq!(
            intents,
            [
                Intent::OpenDialog,
                Intent::SelectFile,
                Intent::ConfirmImage,
                Intent::CloseDialog,
            ]
        );
        assert_eq!(ui.file(), Some(PathBuf::from("cat.png")));
    }
}
