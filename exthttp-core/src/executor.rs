//! Executor: validates call parameters, runs one blocking request, and
//! materializes the response record.

use std::io::Read;
use std::time::Duration;

use log::{info, warn};

use crate::error::Error;
use crate::request::{Method, RequestBody, ResponseMode};
use crate::response::{BodyReader, ResponseBody, ResponseRecord};
use crate::reqwest_transport::ReqwestTransport;
use crate::transport::{Transport, TransportRequest};

/// Timeout knobs for the production transport.
///
/// The defaults (`None`) keep the historical behavior of no deadline at all;
/// anything operational should set both.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutorConfig {
    pub connect_timeout: Option<Duration>,
    pub timeout: Option<Duration>,
}

/// Issues a single blocking GET or POST per call.
///
/// Each call is one atomic request/response transaction: no state is kept
/// across calls, no retries, no redirect policy beyond the transport's own.
pub struct HttpRequestExecutor<T: Transport = ReqwestTransport> {
    transport: T,
}

impl HttpRequestExecutor<ReqwestTransport> {
    /// Executor over the reqwest transport with default (unlimited) timeouts.
    pub fn new() -> Self {
        Self::with_config(ExecutorConfig::default())
    }

    pub fn with_config(config: ExecutorConfig) -> Self {
        Self {
            transport: ReqwestTransport::new(config.connect_timeout, config.timeout),
        }
    }
}

impl Default for HttpRequestExecutor<ReqwestTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> HttpRequestExecutor<T> {
    /// Executor over a caller-provided transport.
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Send a GET request.
    ///
    /// `headers` are applied in iteration order, duplicates allowed. The
    /// returned record is populated for every completed round trip, non-200
    /// included; `mode` selects text or stream materialization of the body.
    pub fn get(
        &self,
        uri: &str,
        headers: &[(String, String)],
        mode: ResponseMode,
    ) -> Result<ResponseRecord, Error> {
        if uri.is_empty() {
            return Err(invalid("URL parameter is not set."));
        }

        let request = TransportRequest {
            method: Method::Get,
            uri: uri.to_string(),
            headers: headers.to_vec(),
            body: None,
        };
        self.finish(request, mode)
    }

    /// Send a POST request with a text or stream body.
    ///
    /// The `Content-Type` header is set from `content_type` before the caller
    /// headers are applied; a caller-supplied `Content-Type` wins. The
    /// response body is always materialized as text.
    pub fn post(
        &self,
        uri: &str,
        headers: &[(String, String)],
        content_type: &str,
        body: RequestBody,
    ) -> Result<ResponseRecord, Error> {
        if uri.is_empty() {
            return Err(invalid("URL parameter is not set."));
        }
        if content_type.is_empty() {
            return Err(invalid("contentType parameter is not set."));
        }
        if let RequestBody::Text(text) = &body {
            if text.is_empty() {
                return Err(invalid("body parameter is not set."));
            }
        }

        let request = TransportRequest {
            method: Method::Post,
            uri: uri.to_string(),
            headers: compose_post_headers(content_type, headers),
            body: Some(body),
        };
        self.finish(request, ResponseMode::Text)
    }

    fn finish(&self, request: TransportRequest, mode: ResponseMode) -> Result<ResponseRecord, Error> {
        let method = request.method;
        let uri = request.uri.clone();

        let response = self.transport.send(request).map_err(|e| {
            warn!("{} {} failed: {}", method, uri, e);
            e
        })?;

        if response.status != 200 {
            info!("StatusCode:{}", response.status);
        }

        let body = match mode {
            ResponseMode::Text => {
                let mut raw = Vec::new();
                let mut reader = response.body;
                reader.read_to_end(&mut raw).map_err(|e| {
                    warn!("{} {} failed reading body: {}", method, uri, e);
                    Error::request_failed(&e)
                })?;
                let text = String::from_utf8(raw).map_err(|e| {
                    warn!("{} {} body is not valid UTF-8: {}", method, uri, e);
                    Error::request_failed(&e)
                })?;
                ResponseBody::Text(text)
            }
            ResponseMode::Stream => ResponseBody::Stream(BodyReader::new(response.body)),
        };

        Ok(ResponseRecord {
            status: response.status,
            headers: response.headers,
            body,
        })
    }
}

fn invalid(message: &str) -> Error {
    info!("{}", message);
    Error::InvalidArgument(message.to_string())
}

/// `Content-Type` goes first, caller headers follow in order. A
/// caller-supplied `Content-Type` replaces the executor's value; every other
/// duplicate name is kept as-is.
fn compose_post_headers(
    content_type: &str,
    caller: &[(String, String)],
) -> Vec<(String, String)> {
    let mut headers = vec![("Content-Type".to_string(), content_type.to_string())];
    for (k, v) in caller {
        if k.eq_ignore_ascii_case("Content-Type") {
            headers[0].1 = v.clone();
        } else {
            headers.push((k.clone(), v.clone()));
        }
    }
    headers
}
