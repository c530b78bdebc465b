//! The seam between the executor and the network layer.

use std::io::Read;

use crate::error::Error;
use crate::request::{Method, RequestBody};

/// A fully composed outgoing request. The header list is final: the
/// transport applies every pair in order, duplicates included, and adds
/// nothing beyond what the HTTP library itself requires.
#[derive(Debug)]
pub struct TransportRequest {
    pub method: Method,
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

/// A completed exchange: status line and headers parsed, entity not yet
/// consumed. Dropping `body` releases the connection.
pub struct TransportResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Box<dyn Read + Send>,
}

/// A generic interface to execute one blocking HTTP request.
/// Tests and embedders can implement this trait and pass it to
/// [`HttpRequestExecutor::with_transport`](crate::HttpRequestExecutor::with_transport)
/// to decouple the executor from any specific HTTP library.
pub trait Transport {
    fn send(&self, request: TransportRequest) -> Result<TransportResponse, Error>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: TransportRequest) -> Result<TransportResponse, Error> {
        (**self).send(request)
    }
}
