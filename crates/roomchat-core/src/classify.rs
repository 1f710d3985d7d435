//! Text vs. hosted-image classification.

/// How a payload should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Literal chat text.
    Text,
    /// URL of an image hosted under the asset prefix.
    ImageRef,
}

/// Classify a payload against the hosted-asset prefix.
///
/// A payload is an image reference iff it starts with `https://` followed
/// by `asset_prefix`, compared byte-wise. This only picks a rendering
/// strategy; it is not a URL validator.
pub fn classify(payload: &str, asset_prefix: &str) -> ContentKind {
    let payload = payload.as_bytes();
    let scheme = b"https://";
    let prefix = asset_prefix.as_bytes();

    if payload.len() < scheme.len() + prefix.len() {
        return ContentKind::Text;
    }
    let (head, rest) = payload.split_at(scheme.len());
    if head == scheme && rest.starts_with(prefix) {
        ContentKind::ImageRef
    } else {
        ContentKind::Text
    }
}
