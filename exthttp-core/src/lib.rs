//! A minimal synchronous HTTP client: one blocking GET or POST per call.
//!
//! [`HttpRequestExecutor`] validates the caller's parameters, issues a single
//! request, and returns a [`ResponseRecord`] with the status code, the
//! response headers in receipt order, and the body as text or as a
//! forward-only byte reader. The network layer sits behind the [`Transport`]
//! trait so embedders and tests can substitute it.

pub mod error;
pub mod executor;
pub mod request;
pub mod response;
pub mod reqwest_transport;
pub mod transport;

pub use error::Error;
pub use executor::{ExecutorConfig, HttpRequestExecutor};
pub use request::{Method, RequestBody, ResponseMode};
pub use response::{BodyReader, ResponseBody, ResponseRecord};
pub use reqwest_transport::ReqwestTransport;
pub use transport::{Transport, TransportRequest, TransportResponse};
