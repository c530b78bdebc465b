use thiserror::Error;

/// Failures surfaced to the caller.
///
/// A completed round trip is never an error, whatever the status code; the
/// caller reads the status off the returned record.
#[derive(Debug, Error)]
pub enum Error {
    /// A required parameter was missing or empty. Raised before any network
    /// I/O is attempted.
    #[error("{0}")]
    InvalidArgument(String),

    /// The request failed at the transport layer: connection setup,
    /// transmission, response reading, or body decoding. The cause carries
    /// the underlying failure's description.
    #[error("An error occurred. Cause: [{cause}]")]
    RequestFailed { cause: String },
}

impl Error {
    /// Wrap a transport-layer failure, flattening its source chain into the
    /// cause message.
    pub(crate) fn request_failed(err: &dyn std::error::Error) -> Self {
        let mut cause = err.to_string();
        let mut source = err.source();
        while let Some(inner) = source {
            cause.push_str(": ");
            cause.push_str(&inner.to_string());
            source = inner.source();
        }
        Error::RequestFailed { cause }
    }
}
