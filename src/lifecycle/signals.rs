//! OS signal handling.
//!
//! A [`SignalWatcher`] subscribes to SIGINT and SIGTERM and translates the
//! first one received into cancellation of the shared token. It is
//! single-shot: after the first signal, or after teardown, the subscription
//! is dropped and the task ends. Once released, later SIGINT/SIGTERM get the
//! OS default action again.

use crate::logging::Logger;
use std::fmt;
use std::future::Future;
use std::io;
#[cfg(unix)]
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(unix)]
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const MODULE: &str = "signals";

/// Signals that request a graceful shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// SIGINT / Ctrl-C
    Interrupt,
    /// SIGTERM
    Terminate,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownSignal::Interrupt => write!(f, "SIGINT"),
            ShutdownSignal::Terminate => write!(f, "SIGTERM"),
        }
    }
}

#[cfg(unix)]
struct Subscription {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
    released: Arc<AtomicBool>,
}

#[cfg(unix)]
impl Subscription {
    fn register() -> io::Result<Self> {
        use signal_hook::consts::{SIGINT, SIGTERM};
        use tokio::signal::unix::{signal, SignalKind};

        // Tokio never uninstalls its handler, so the default action is
        // chained behind a flag that is set when the subscription is dropped.
        let released = Arc::new(AtomicBool::new(false));
        for sig in [SIGINT, SIGTERM] {
            signal_hook::flag::register_conditional_default(sig, Arc::clone(&released))?;
        }

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
            released,
        })
    }

    async fn recv(&mut self) -> ShutdownSignal {
        tokio::select! {
            Some(()) = self.interrupt.recv() => ShutdownSignal::Interrupt,
            Some(()) = self.terminate.recv() => ShutdownSignal::Terminate,
            else => std::future::pending().await,
        }
    }
}

#[cfg(unix)]
impl Drop for Subscription {
    fn drop(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

#[cfg(not(unix))]
struct Subscription;

#[cfg(not(unix))]
impl Subscription {
    fn register() -> io::Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) -> ShutdownSignal {
        match tokio::signal::ctrl_c().await {
            Ok(()) => ShutdownSignal::Interrupt,
            Err(_) => std::future::pending().await,
        }
    }
}

/// Background task turning the first shutdown signal into cancellation
pub struct SignalWatcher {
    handle: JoinHandle<Option<ShutdownSignal>>,
    teardown: CancellationToken,
    logger: Logger,
}

impl SignalWatcher {
    /// Register for SIGINT/SIGTERM and spawn the watcher task.
    ///
    /// Registration happens before this returns, so a signal delivered
    /// afterwards is never missed. Must be called inside a Tokio runtime.
    pub fn spawn(logger: Logger, trigger: CancellationToken) -> io::Result<Self> {
        let mut subscription = Subscription::register()?;
        Ok(Self::watching(
            async move { subscription.recv().await },
            logger,
            trigger,
        ))
    }

    /// Spawn a watcher over an arbitrary signal source. The source future
    /// owns the subscription; it is dropped when the watcher finishes.
    pub(crate) fn watching<F>(arrival: F, logger: Logger, trigger: CancellationToken) -> Self
    where
        F: Future<Output = ShutdownSignal> + Send + 'static,
    {
        let teardown = CancellationToken::new();
        let handle = tokio::spawn(watch(arrival, logger.clone(), trigger, teardown.clone()));
        Self {
            handle,
            teardown,
            logger,
        }
    }

    /// Tear the subscription down and wait for the task to end.
    ///
    /// Returns the signal that was received, if any.
    pub async fn shutdown(self) -> Option<ShutdownSignal> {
        self.teardown.cancel();
        match self.handle.await {
            Ok(received) => received,
            Err(error) => {
                self.logger
                    .warn(MODULE, format!("signal watcher task failed: {error}"));
                None
            }
        }
    }
}

async fn watch<F>(
    arrival: F,
    logger: Logger,
    trigger: CancellationToken,
    teardown: CancellationToken,
) -> Option<ShutdownSignal>
where
    F: Future<Output = ShutdownSignal>,
{
    let received = tokio::select! {
        signal = arrival => Some(signal),
        _ = teardown.cancelled() => None,
    };

    if let Some(signal) = received {
        logger.warn(MODULE, format!("receive signal: {signal}"));
        trigger.cancel();
    }

    received
}
