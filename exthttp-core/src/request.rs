//! Outgoing-request types.

use std::io::Read;

/// Supported HTTP methods. The contract covers exactly these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Method::Get => "GET",
            Method::Post => "POST",
        };
        write!(f, "{}", s)
    }
}

/// A POST request body: UTF-8 text, or an opaque byte stream attached to the
/// request without buffering.
pub enum RequestBody {
    Text(String),
    Stream(Box<dyn Read + Send>),
}

impl RequestBody {
    /// Convenience constructor for streaming bodies.
    pub fn stream<R: Read + Send + 'static>(reader: R) -> Self {
        RequestBody::Stream(Box::new(reader))
    }
}

impl std::fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestBody::Text(text) => f.debug_tuple("Text").field(text).finish(),
            RequestBody::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// How the response entity is materialized: fully buffered UTF-8 text, or a
/// one-shot byte reader the caller drains after the call returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    Text,
    Stream,
}
