use thiserror::Error;

/// Errors that stop a run from starting, or terminate it early.
///
/// Per-message delivery failures are never reported through this type; they
/// arrive as [`Outcome`](crate::Outcome)s.
#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("concurrency limit must be greater than zero")]
    InvalidConcurrency,
    #[error("http client setup failed: {0}")]
    Client(String),
    #[error("internal fault: {0}")]
    Internal(String),
}
