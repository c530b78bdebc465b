use std::time::Duration;

use log::debug;
use reqwest::blocking::{Body, Client};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::Error;
use crate::request::{Method, RequestBody};
use crate::transport::{Transport, TransportRequest, TransportResponse};

/// The production transport, using `reqwest`'s blocking client.
///
/// A fresh client is built per call: each request gets its own connection and
/// nothing is pooled across calls. With no timeout configured the request may
/// block indefinitely.
pub struct ReqwestTransport {
    connect_timeout: Option<Duration>,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    pub fn new(connect_timeout: Option<Duration>, timeout: Option<Duration>) -> Self {
        Self {
            connect_timeout,
            timeout,
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: TransportRequest) -> Result<TransportResponse, Error> {
        // `timeout` is passed unconditionally: `None` disables reqwest's
        // default 30s deadline.
        let mut builder = Client::builder().timeout(self.timeout);
        if let Some(t) = self.connect_timeout {
            builder = builder.connect_timeout(t);
        }
        let client = builder.build().map_err(|e| Error::request_failed(&e))?;

        let mut req = match request.method {
            Method::Get => client.get(&request.uri),
            Method::Post => client.post(&request.uri),
        };

        let mut headers = HeaderMap::new();
        for (k, v) in &request.headers {
            let name =
                HeaderName::from_bytes(k.as_bytes()).map_err(|e| Error::request_failed(&e))?;
            let value = HeaderValue::from_str(v).map_err(|e| Error::request_failed(&e))?;
            headers.append(name, value);
        }
        req = req.headers(headers);

        if let Some(body) = request.body {
            req = match body {
                RequestBody::Text(text) => req.body(text.into_bytes()),
                RequestBody::Stream(reader) => req.body(Body::new(reader)),
            };
        }

        let response = req.send().map_err(|e| Error::request_failed(&e))?;

        let status = response.status().as_u16();
        let mut out_headers = Vec::new();
        for (k, v) in response.headers() {
            out_headers.push((
                k.as_str().to_string(),
                v.to_str().unwrap_or("(binary)").to_string(),
            ));
        }
        debug!("{} {} -> {}", request.method, request.uri, status);

        // The reqwest response implements Read over the unconsumed entity and
        // owns the connection, so the stream stays valid until dropped.
        Ok(TransportResponse {
            status,
            headers: out_headers,
            body: Box::new(response),
        })
    }
}
