//! Rendered messages and the bounded on-screen history.

use crate::{Color, ContentKind, IncomingPayload, classify};
use std::collections::VecDeque;
use std::num::NonZeroUsize;

/// A message as shown in the chat window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub content: String,
    pub color: Color,
    /// Sent by the local user.
    pub is_own: bool,
    pub kind: ContentKind,
}

impl MessageRecord {
    /// Local echo of a message the user just sent.
    pub fn own(content: String, asset_prefix: &str) -> Self {
        let kind = classify(&content, asset_prefix);
        Self {
            content,
            color: Color::local(),
            is_own: true,
            kind,
        }
    }

    /// A message delivered by the server.
    pub fn incoming(payload: IncomingPayload, asset_prefix: &str) -> Self {
        let kind = classify(&payload.data, asset_prefix);
        Self {
            content: payload.data,
            color: payload.color,
            is_own: false,
            kind,
        }
    }

    /// The in-band notice shown when the connection fails.
    pub fn connection_error() -> Self {
        Self {
            content: "Error".to_string(),
            color: Color::error(),
            is_own: false,
            kind: ContentKind::Text,
        }
    }

    /// How a view should draw this record.
    pub fn render(&self) -> Rendered<'_> {
        match self.kind {
            ContentKind::Text => Rendered::Text(&self.content),
            ContentKind::ImageRef => Rendered::Image { src: &self.content },
        }
    }
}

/// Rendering strategy for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendered<'a> {
    /// Literal text content, never interpreted as markup.
    Text(&'a str),
    /// Embedded image with the payload as its source.
    Image { src: &'a str },
}

/// Ordered, size-bounded sequence of records, oldest first.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    cap: NonZeroUsize,
    records: VecDeque<MessageRecord>,
}

impl HistoryBuffer {
    pub fn new(cap: NonZeroUsize) -> Self {
        Self {
            cap,
            records: VecDeque::with_capacity(cap.get()),
        }
    }

    /// Append a record, evicting the oldest ones past the cap.
    ///
    /// Returns how many records were evicted.
    pub fn append(&mut self, record: MessageRecord) -> usize {
        self.records.push_back(record);
        let mut evicted = 0;
        while self.records.len() > self.cap.get() {
            self.records.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Records in arrival order. Each call starts from the oldest.
    pub fn snapshot(&self) -> impl ExactSizeIterator<Item = &MessageRecord> + '_ {
        self.records.iter()
    }

    /// The most recently appended record.
    pub fn latest(&self) -> Option<&MessageRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn cap(&self) -> NonZeroUsize {
        self.cap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cap(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn remote(data: &str) -> MessageRecord {
        MessageRecord::incoming(
            IncomingPayload {
                data: data.to_string(),
                color: "00ff00".parse().unwrap(),
            },
            "assets.example.com",
        )
    }

    fn contents(buffer: &HistoryBuffer) -> Vec<&str> {
        buffer.snapshot().map(|r| r.content.as_str()).collect()
    }

    #[test]
    fn keeps_most_recent_within_cap() {
        for limit in 1..=5 {
            let mut buffer = HistoryBuffer::new(cap(limit));
            let mut appended = Vec::new();
            for i in 0..12 {
                let content = format!("m{i}");
                buffer.append(remote(&content));
                appended.push(content);

                assert!(buffer.len() <= limit);
                let expected: Vec<&str> = appended
                    .iter()
                    .skip(appended.len().saturating_sub(limit))
                    .map(String::as_str)
                    .collect();
                assert_eq!(contents(&buffer), expected);
            }
        }
    }

    #[test]
    fn append_reports_evictions() {
        let mut buffer = HistoryBuffer::new(cap(2));
        assert_eq!(buffer.append(remote("a")), 0);
        assert_eq!(buffer.append(remote("b")), 0);
        assert_eq!(buffer.append(remote("c")), 1);
        assert_eq!(buffer.latest().map(|r| r.content.as_str()), Some("c"));
    }

    #[test]
    fn cap_of_one_keeps_latest() {
        let mut buffer = HistoryBuffer::new(cap(1));
        assert_eq!(buffer.cap().get(), 1);
        buffer.append(remote("a"));
        buffer.append(remote("b"));
        assert_eq!(contents(&buffer), ["b"]);
    }

    #[test]
    fn snapshot_is_restartable() {
        let mut buffer = HistoryBuffer::new(cap(3));
        buffer.append(remote("a"));
        buffer.append(remote("b"));
        let first: Vec<_> = contents(&buffer);
        let second: Vec<_> = contents(&buffer);
        assert_eq!(first, second);
        assert_eq!(buffer.snapshot().len(), 2);
    }

    #[test]
    fn own_record_uses_local_color() {
        let record = MessageRecord::own("hello".to_string(), "assets.example.com");
        assert!(record.is_own);
        assert_eq!(record.color, Color::local());
        assert_eq!(record.render(), Rendered::Text("hello"));
    }

    #[test]
    fn hosted_image_renders_as_image() {
        let record = remote("https://assets.example.com/cat.png");
        assert!(!record.is_own);
        assert_eq!(
            record.render(),
            Rendered::Image {
                src: "https://assets.example.com/cat.png"
            }
        );
    }

    #[test]
    fn error_notice_is_plain_text() {
        let record = MessageRecord::connection_error();
        assert_eq!(record.color, Color::error());
        assert_eq!(record.render(), Rendered::Text("Error"));
    }
}
