use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use engine_logging::{engine_error, engine_trace, engine_warn};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{NotifierError, Outcome, RunState};

/// Receives outcomes on the consumer's execution context, one call at a time.
pub trait OutcomeHandler {
    fn on_outcome(&mut self, outcome: &Outcome);
}

impl<F> OutcomeHandler for F
where
    F: FnMut(&Outcome),
{
    fn on_outcome(&mut self, outcome: &Outcome) {
        self(outcome)
    }
}

#[derive(Debug)]
pub(crate) enum BusMessage {
    Outcome(Outcome),
    Completed,
    Fault(String),
}

/// Sending half shared by all units of work.
///
/// Sends are skipped once the run is cancelled; the channel itself is only
/// ever closed by the consumer.
#[derive(Debug, Clone)]
pub(crate) struct EventBus {
    tx: mpsc::UnboundedSender<BusMessage>,
    cancel: CancellationToken,
}

pub(crate) struct EventConsumer {
    rx: mpsc::UnboundedReceiver<BusMessage>,
    cancel: CancellationToken,
}

pub(crate) fn event_bus(cancel: CancellationToken) -> (EventBus, EventConsumer) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        EventBus {
            tx,
            cancel: cancel.clone(),
        },
        EventConsumer { rx, cancel },
    )
}

impl EventBus {
    pub(crate) fn publish(&self, outcome: Outcome) -> bool {
        self.send(BusMessage::Outcome(outcome))
    }

    pub(crate) fn complete(&self) -> bool {
        self.send(BusMessage::Completed)
    }

    pub(crate) fn fault(&self, detail: impl Into<String>) -> bool {
        self.send(BusMessage::Fault(detail.into()))
    }

    fn send(&self, message: BusMessage) -> bool {
        if self.cancel.is_cancelled() {
            engine_trace!("run cancelled; dropping {:?}", message);
            return false;
        }
        self.tx.send(message).is_ok()
    }
}

impl EventConsumer {
    /// Delivers events to `handler` until the completed signal, a fault, or
    /// cancellation.
    pub(crate) async fn drain<H>(mut self, handler: &mut H) -> Result<RunState, NotifierError>
    where
        H: OutcomeHandler + ?Sized,
    {
        let result = loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    engine_warn!("run interrupted; pending outcomes are dropped");
                    break Ok(RunState::Interrupted);
                }
                message = self.rx.recv() => match message {
                    Some(BusMessage::Outcome(outcome)) => {
                        if let Err(err) = deliver(handler, &outcome) {
                            break Err(err);
                        }
                    }
                    Some(BusMessage::Completed) => match deliver(handler, &Outcome::completed()) {
                        Ok(()) => break Ok(RunState::Completed),
                        Err(err) => break Err(err),
                    },
                    Some(BusMessage::Fault(detail)) => {
                        engine_error!("run aborted: {}", detail);
                        break Err(NotifierError::Internal(detail));
                    }
                    None => {
                        break Err(NotifierError::Internal(
                            "event channel closed before completion".to_string(),
                        ));
                    }
                },
            }
        };
        self.rx.close();
        result
    }
}

/// Invokes the handler, turning a panic into an internal fault for the run.
fn deliver<H>(handler: &mut H, outcome: &Outcome) -> Result<(), NotifierError>
where
    H: OutcomeHandler + ?Sized,
{
    panic::catch_unwind(AssertUnwindSafe(|| handler.on_outcome(outcome))).map_err(|payload| {
        let detail = format!(
            "outcome handler panicked on {}: {}",
            outcome.event(),
            panic_message(payload.as_ref())
        );
        engine_error!("run aborted: {}", detail);
        NotifierError::Internal(detail)
    })
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MessageEvent;

    #[tokio::test]
    async fn delivers_outcomes_then_completed() {
        let (bus, consumer) = event_bus(CancellationToken::new());
        assert!(bus.publish(Outcome::success(1)));
        assert!(bus.publish(Outcome::http_error(0, 500)));
        assert!(bus.complete());

        let mut seen = Vec::new();
        let state = consumer
            .drain(&mut |outcome: &Outcome| seen.push(outcome.clone()))
            .await
            .unwrap();

        assert_eq!(state, RunState::Completed);
        let events: Vec<_> = seen.iter().map(Outcome::event).collect();
        assert_eq!(
            events,
            vec![
                MessageEvent::Success,
                MessageEvent::HttpError,
                MessageEvent::Completed
            ]
        );
    }

    #[tokio::test]
    async fn cancelled_bus_drops_sends_and_consumer_stops() {
        let cancel = CancellationToken::new();
        let (bus, consumer) = event_bus(cancel.clone());
        cancel.cancel();
        assert!(!bus.publish(Outcome::success(0)));

        let mut calls = 0;
        let state = consumer
            .drain(&mut |_: &Outcome| calls += 1)
            .await
            .unwrap();
        assert_eq!(state, RunState::Interrupted);
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn sends_after_consumer_exit_are_rejected() {
        let cancel = CancellationToken::new();
        let (bus, consumer) = event_bus(cancel.clone());
        assert!(bus.fault("boom"));

        let err = consumer.drain(&mut |_: &Outcome| {}).await.unwrap_err();
        assert!(matches!(err, NotifierError::Internal(detail) if detail == "boom"));
        assert!(!bus.publish(Outcome::success(0)));
    }

    #[tokio::test]
    async fn handler_panic_becomes_internal_error() {
        let (bus, consumer) = event_bus(CancellationToken::new());
        assert!(bus.publish(Outcome::success(0)));
        assert!(bus.complete());

        let err = consumer
            .drain(&mut |_: &Outcome| panic!("stdout closed"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, NotifierError::Internal(ref detail) if detail.contains("stdout closed")),
            "{err}"
        );
        assert!(!bus.publish(Outcome::success(1)));
    }
}
