//! Per-call operation context.
//!
//! The context names the caller (its "user agent") for attribution and, for
//! suspendable stores, carries a cancellation signal down to the innermost
//! adapter. Store layers pass it through untouched.

use tokio::sync::watch;

/// Sending half of a cancellation pair.
#[derive(Debug)]
pub struct CancellationSource {
    tx: watch::Sender<bool>,
}

impl CancellationSource {
    /// Create a new source together with its first signal.
    pub fn new() -> (Self, CancellationSignal) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, CancellationSignal { rx: Some(rx) })
    }

    /// Another signal observing this source.
    pub fn signal(&self) -> CancellationSignal {
        CancellationSignal {
            rx: Some(self.tx.subscribe()),
        }
    }

    /// Fire the signal. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Receiving half of a cancellation pair.
///
/// Cancellation is advisory: nothing in the decorator stack checks it, and an
/// adapter is free to ignore it.
#[derive(Debug, Clone, Default)]
pub struct CancellationSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl CancellationSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        Self { rx: None }
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
    }

    /// Resolve once cancellation fires.
    ///
    /// Pends forever for [`CancellationSignal::never`] or when the source was
    /// dropped without cancelling.
    pub async fn cancelled(&self) {
        let Some(rx) = &self.rx else {
            return std::future::pending().await;
        };
        let mut rx = rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Immutable per-call context.
#[derive(Debug, Clone)]
pub struct OperationContext {
    user_agent: String,
    cancellation: CancellationSignal,
}

impl OperationContext {
    /// Context attributed to `user_agent`, never cancelled.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            cancellation: CancellationSignal::never(),
        }
    }

    /// Attach a cancellation signal.
    pub fn with_cancellation(mut self, cancellation: CancellationSignal) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Caller identifier copied verbatim into audit and deletion fields.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn cancellation(&self) -> &CancellationSignal {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
