use std::time::Duration;

use engine_logging::engine_debug;
use reqwest::StatusCode;

use crate::{Endpoint, Message, NotifierError, Outcome};

/// Performs one delivery attempt and classifies it.
///
/// Implementations must return exactly one per-message outcome and must not
/// retry.
#[async_trait::async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, message: &Message, endpoint: &Endpoint) -> Outcome;
}

/// Posts the message body to the endpoint; only status 200 counts as success.
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    client: reqwest::Client,
}

impl ReqwestExecutor {
    pub fn new(request_timeout: Duration) -> Result<Self, NotifierError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| NotifierError::Client(err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Executor for ReqwestExecutor {
    async fn execute(&self, message: &Message, endpoint: &Endpoint) -> Outcome {
        let index = message.index();
        let request = match self
            .client
            .post(endpoint.as_url().clone())
            .body(message.body().to_owned())
            .build()
        {
            Ok(request) => request,
            Err(err) => return Outcome::runtime_error(index, err.to_string()),
        };

        let outcome = match self.client.execute(request).await {
            Ok(response) => classify_status(index, response.status()),
            Err(err) => map_reqwest_error(index, err),
        };
        engine_debug!(
            "message_id={} classified as {} detail={:?}",
            index,
            outcome.event(),
            outcome.error_detail()
        );
        outcome
    }
}

fn classify_status(index: usize, status: StatusCode) -> Outcome {
    if status == StatusCode::OK {
        Outcome::success(index)
    } else {
        Outcome::http_error(index, status.as_u16())
    }
}

fn map_reqwest_error(index: usize, err: reqwest::Error) -> Outcome {
    if err.is_timeout() {
        return Outcome::timeout(index, err.to_string());
    }
    Outcome::runtime_error(index, err.to_string())
}
