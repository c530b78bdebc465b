//! Completed-response types.

use std::io::Read;

/// Output of a completed HTTP request.
///
/// The record is always fully populated, whatever the status code: deciding
/// what to do with a non-200 response is the caller's business. Headers are
/// kept as ordered name/value pairs in receipt order, duplicates included.
#[derive(Debug)]
pub struct ResponseRecord {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: ResponseBody,
}

impl ResponseRecord {
    /// True for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Last value received for `name` (case-insensitive), if any.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response entity: decoded UTF-8 text, or a forward-only byte reader.
pub enum ResponseBody {
    Text(String),
    Stream(BodyReader),
}

impl ResponseBody {
    /// Borrow the text, if this body was materialized in text mode.
    pub fn text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            ResponseBody::Stream(_) => None,
        }
    }

    /// Take the text, if this body was materialized in text mode.
    pub fn into_text(self) -> Option<String> {
        match self {
            ResponseBody::Text(text) => Some(text),
            ResponseBody::Stream(_) => None,
        }
    }
}

impl std::fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseBody::Text(text) => f.debug_tuple("Text").field(text).finish(),
            ResponseBody::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// One-shot reader over an unconsumed response entity.
///
/// The reader owns the underlying connection: it stays open until the reader
/// is dropped, so draining it after the executor call has returned yields the
/// entity bytes without truncation.
pub struct BodyReader {
    inner: Box<dyn Read + Send>,
}

impl BodyReader {
    pub(crate) fn new(inner: Box<dyn Read + Send>) -> Self {
        Self { inner }
    }
}

impl Read for BodyReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}
