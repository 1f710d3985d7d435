//! Attachment encoding.
//!
//! Turns a local file into a data URL that can travel inside an
//! [`OutgoingAction`](roomchat_core::OutgoingAction).

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::path::{Path, PathBuf};

/// A file ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name without directories; sent as the message text.
    pub file_name: String,
    pub mime: String,
    /// `data:<mime>;base64,<payload>`
    pub data_url: String,
}

/// Failed to read the selected file.
#[derive(Debug, thiserror::Error)]
#[error("failed to read {}: {source}", .path.display())]
pub struct ReadError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Read the whole file and encode it as a data URL.
pub async fn encode(path: impl AsRef<Path>) -> Result<Attachment, ReadError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|source| ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    let mime = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());
    let data_url = format!("data:{mime};base64,{}", BASE64.encode(&bytes));

    Ok(Attachment {
        file_name,
        mime,
        data_url,
    })
}
