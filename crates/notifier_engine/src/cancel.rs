//! Interrupt handling for a run.
//!
//! The dispatcher only ever sees a [`CancellationToken`]. [`CancellationSource`]
//! owns the token and can bind it to process signals, so tests can cancel a
//! run without touching real signals.
//!
//! On Unix SIGINT, SIGTERM and SIGQUIT are observed; elsewhere only ctrl-c.

use std::io;

use engine_logging::engine_info;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default)]
pub struct CancellationSource {
    token: CancellationToken,
}

impl CancellationSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Installs the signal handlers and spawns a task that cancels the token
    /// on the first shutdown signal.
    ///
    /// Handlers are in place when this returns. Must be called from within a
    /// tokio runtime. The task ends on its own if the token is cancelled by
    /// other means first.
    pub fn listen_for_signals(&self) -> io::Result<JoinHandle<()>> {
        let mut signals = ShutdownSignals::install()?;
        let token = self.token.clone();
        Ok(tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = signals.recv() => {
                    engine_info!("shutdown signal received");
                    token.cancel();
                }
            }
        }))
    }
}

#[cfg(unix)]
struct ShutdownSignals {
    sigint: tokio::signal::unix::Signal,
    sigterm: tokio::signal::unix::Signal,
    sigquit: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl ShutdownSignals {
    fn install() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
            sigquit: signal(SignalKind::quit())?,
        })
    }

    async fn recv(&mut self) {
        tokio::select! {
            _ = self.sigint.recv()  => {},
            _ = self.sigterm.recv() => {},
            _ = self.sigquit.recv() => {},
        }
    }
}

#[cfg(not(unix))]
struct ShutdownSignals;

#[cfg(not(unix))]
impl ShutdownSignals {
    fn install() -> io::Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) {
        // An error here means ctrl-c cannot be observed; never resolve.
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
