use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use engine_logging::{engine_debug, engine_info};
use futures_util::FutureExt;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

use crate::bus::{event_bus, panic_message, EventBus, OutcomeHandler};
use crate::executor::{Executor, ReqwestExecutor};
use crate::tracker::CompletionTracker;
use crate::{Message, NotifierError, RunConfig, RunState};

/// Broadcasts messages to one endpoint with a bounded number of requests in
/// flight.
///
/// One submission loop acquires a permit per message and spawns a unit of
/// work for it; every unit of work emits one outcome into a single-consumer
/// funnel that drives the caller's [`OutcomeHandler`].
pub struct Dispatcher {
    config: RunConfig,
    executor: Arc<dyn Executor>,
}

impl Dispatcher {
    /// Builds a dispatcher that posts over HTTP with the configured timeout.
    pub fn new(config: RunConfig) -> Result<Self, NotifierError> {
        let executor = ReqwestExecutor::new(config.request_timeout)?;
        Ok(Self::with_executor(config, Arc::new(executor)))
    }

    pub fn with_executor(config: RunConfig, executor: Arc<dyn Executor>) -> Self {
        Self { config, executor }
    }

    /// Runs every message and returns once the consumer loop has exited.
    ///
    /// On `Ok(RunState::Completed)` the handler has seen one outcome per
    /// message followed by a single `Completed`. Cancelling `cancel` stops the
    /// consumer immediately; requests already in flight are left to finish
    /// and their outcomes are dropped.
    pub async fn run<H>(
        &self,
        messages: Vec<Message>,
        handler: &mut H,
        cancel: CancellationToken,
    ) -> Result<RunState, NotifierError>
    where
        H: OutcomeHandler + ?Sized,
    {
        let total = messages.len();
        engine_info!(
            "dispatching {} messages to {} (limit={}, interval={:?})",
            total,
            self.config.endpoint,
            self.config.concurrency_limit,
            self.config.submission_interval
        );

        let run_token = cancel.child_token();
        let (bus, consumer) = event_bus(run_token.clone());
        if total == 0 {
            bus.complete();
        }
        let tracker = Arc::new(CompletionTracker::new(total));

        let submit = self.submit_all(messages, bus, tracker, run_token.clone());
        let drain = async {
            let result = consumer.drain(handler).await;
            // Stops the submission loop if the consumer exited early.
            run_token.cancel();
            result
        };

        let ((), result) = tokio::join!(submit, drain);
        result
    }

    async fn submit_all(
        &self,
        messages: Vec<Message>,
        bus: EventBus,
        tracker: Arc<CompletionTracker>,
        cancel: CancellationToken,
    ) {
        let permits = self.config.concurrency_limit.get().min(Semaphore::MAX_PERMITS);
        let semaphore = Arc::new(Semaphore::new(permits));
        let interval = self.config.submission_interval;

        let mut pending = messages.into_iter().peekable();
        while let Some(message) = pending.next() {
            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                permit = semaphore.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_closed) => break,
                },
            };

            engine_debug!("submitting message_id={}", message.index());
            self.spawn_worker(message, permit, bus.clone(), tracker.clone());

            if !interval.is_zero() && pending.peek().is_some() {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
        }
    }

    fn spawn_worker(
        &self,
        message: Message,
        permit: OwnedSemaphorePermit,
        bus: EventBus,
        tracker: Arc<CompletionTracker>,
    ) {
        let executor = self.executor.clone();
        let endpoint = self.config.endpoint.clone();
        tokio::spawn(async move {
            let attempt = AssertUnwindSafe(executor.execute(&message, &endpoint))
                .catch_unwind()
                .await;
            match attempt {
                Ok(outcome) => {
                    bus.publish(outcome);
                }
                Err(payload) => {
                    bus.fault(format!(
                        "delivery of message_id={} panicked: {}",
                        message.index(),
                        panic_message(payload.as_ref())
                    ));
                }
            }

            drop(permit);
            if tracker.record() {
                engine_debug!("all {} messages have an outcome", tracker.finished());
                bus.complete();
            }
        });
    }
}
