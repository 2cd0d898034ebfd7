use thiserror::Error;

/// Errors surfaced by client operations.
///
/// Blocking calls return `Timeout` when their wait bound elapses, `Transport`
/// when the underlying operation itself fails, and `Service` when the service
/// answered a correlated request with an explicit error envelope. Malformed
/// inbound payloads are never surfaced; the dispatch loop drops them and the
/// original caller runs into `Timeout` instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("pubwire: operation has timed out")]
    Timeout,

    #[error("pubwire: transport failure: {0}")]
    Transport(String),

    #[error("pubwire: service error {status}: {message}")]
    Service { status: u16, message: String },

    #[error("pubwire: unable to decode the response")]
    UnexpectedReply,

    #[error("pubwire: unable to encode the request: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
