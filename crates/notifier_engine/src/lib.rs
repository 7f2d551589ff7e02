//! Notifier engine: bounded-concurrency HTTP broadcast of text messages.
mod bus;
mod cancel;
mod dispatcher;
mod error;
mod executor;
mod tracker;
mod types;

pub use bus::OutcomeHandler;
pub use cancel::CancellationSource;
pub use dispatcher::Dispatcher;
pub use error::NotifierError;
pub use executor::{Executor, ReqwestExecutor};
pub use tokio_util::sync::CancellationToken;
pub use types::{
    messages_from_bodies, Endpoint, Message, MessageEvent, Outcome, RunConfig, RunState,
    DEFAULT_CONCURRENCY_LIMIT, DEFAULT_REQUEST_TIMEOUT,
};
