use std::fmt;
use std::num::NonZeroUsize;
use std::time::Duration;

use url::Url;

use crate::NotifierError;

pub const DEFAULT_CONCURRENCY_LIMIT: usize = 100;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One line of input, addressed by its position in the input sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    index: usize,
    body: String,
}

impl Message {
    pub fn new(index: usize, body: impl Into<String>) -> Self {
        Self {
            index,
            body: body.into(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Builds messages from bodies, numbering them from zero in iteration order.
pub fn messages_from_bodies<I, S>(bodies: I) -> Vec<Message>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    bodies
        .into_iter()
        .enumerate()
        .map(|(index, body)| Message::new(index, body))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageEvent {
    Success,
    Timeout,
    HttpError,
    RuntimeError,
    /// Terminal signal of a run; carries no message index.
    Completed,
}

impl fmt::Display for MessageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageEvent::Success => write!(f, "success"),
            MessageEvent::Timeout => write!(f, "timeout"),
            MessageEvent::HttpError => write!(f, "http error"),
            MessageEvent::RuntimeError => write!(f, "runtime error"),
            MessageEvent::Completed => write!(f, "completed"),
        }
    }
}

/// Classification of one delivery attempt, or the terminal completed signal.
///
/// `error_detail` is present exactly for `Timeout`, `HttpError` and
/// `RuntimeError`; `message_index` is absent exactly for `Completed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    event: MessageEvent,
    message_index: Option<usize>,
    error_detail: Option<String>,
}

impl Outcome {
    pub fn success(message_index: usize) -> Self {
        Self {
            event: MessageEvent::Success,
            message_index: Some(message_index),
            error_detail: None,
        }
    }

    pub fn timeout(message_index: usize, detail: impl Into<String>) -> Self {
        Self::failure(MessageEvent::Timeout, message_index, detail.into())
    }

    /// The detail is the decimal status code.
    pub fn http_error(message_index: usize, status: u16) -> Self {
        Self::failure(MessageEvent::HttpError, message_index, status.to_string())
    }

    pub fn runtime_error(message_index: usize, detail: impl Into<String>) -> Self {
        Self::failure(MessageEvent::RuntimeError, message_index, detail.into())
    }

    pub fn completed() -> Self {
        Self {
            event: MessageEvent::Completed,
            message_index: None,
            error_detail: None,
        }
    }

    fn failure(event: MessageEvent, message_index: usize, detail: String) -> Self {
        Self {
            event,
            message_index: Some(message_index),
            error_detail: Some(detail),
        }
    }

    pub fn event(&self) -> MessageEvent {
        self.event
    }

    pub fn message_index(&self) -> Option<usize> {
        self.message_index
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    pub fn is_completed(&self) -> bool {
        self.event == MessageEvent::Completed
    }
}

/// A validated absolute `http` or `https` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(Url);

impl Endpoint {
    pub fn parse(raw: &str) -> Result<Self, NotifierError> {
        let invalid = |reason: String| NotifierError::InvalidEndpoint {
            endpoint: raw.to_string(),
            reason,
        };
        let url = Url::parse(raw.trim()).map_err(|err| invalid(err.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(invalid(format!("unsupported scheme {other}"))),
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(invalid("missing host".to_string()));
        }
        Ok(Self(url))
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Settings for one run. Immutable once the run starts.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub endpoint: Endpoint,
    pub concurrency_limit: NonZeroUsize,
    /// Zero disables pacing.
    pub submission_interval: Duration,
    pub request_timeout: Duration,
}

impl RunConfig {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            concurrency_limit: NonZeroUsize::new(DEFAULT_CONCURRENCY_LIMIT)
                .unwrap_or(NonZeroUsize::MIN),
            submission_interval: Duration::ZERO,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_concurrency_limit(mut self, limit: usize) -> Result<Self, NotifierError> {
        self.concurrency_limit = NonZeroUsize::new(limit).ok_or(NotifierError::InvalidConcurrency)?;
        Ok(self)
    }

    pub fn with_submission_interval(mut self, interval: Duration) -> Self {
        self.submission_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Every message produced an outcome and `Completed` was delivered.
    Completed,
    /// Cancellation stopped the consumer loop early.
    Interrupted,
}
