//! Cancellation token shared between a caller and a running batch.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

use crate::errors::{ContractflowError, Result};

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    reason: RwLock<Option<String>>,
}

/// A cloneable token for cooperative cancellation.
///
/// Batches check the token before issuing each exchange; exchanges already
/// in flight run to completion. Only the first cancellation reason is kept.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    /// Creates a new cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation with a reason. Idempotent.
    ///
    /// An observer that sees the token cancelled always reads its reason.
    pub fn cancel(&self, reason: impl Into<String>) {
        let mut slot = self.inner.reason.write();
        if slot.is_some() {
            return;
        }
        let reason = reason.into();
        info!(reason = %reason, "Cancellation requested");
        *slot = Some(reason);
        self.inner.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Returns the cancellation reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        self.inner.reason.read().clone()
    }

    /// Fails with [`ContractflowError::Cancelled`] once cancelled.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(ContractflowError::Cancelled(self.reason().unwrap_or_default()))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_default_not_cancelled() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        assert!(token.reason().is_none());
        assert!(token.check().is_ok());
    }

    #[test]
    fn test_first_reason_wins() {
        let token = CancellationToken::new();
        token.cancel("deadline");
        token.cancel("user");

        assert_eq!(token.reason(), Some("deadline".to_string()));
        assert!(matches!(token.check(), Err(ContractflowError::Cancelled(r)) if r == "deadline"));
    }

    #[test]
    fn test_clones_share_state() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel("stop");
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_cancelled_token_always_has_reason() {
        for _ in 0..50 {
            let token = CancellationToken::new();
            let observers: Vec<_> = (0..4)
                .map(|_| {
                    let token = token.clone();
                    std::thread::spawn(move || {
                        while !token.is_cancelled() {
                            std::hint::spin_loop();
                        }
                        token.reason()
                    })
                })
                .collect();

            token.cancel("deadline");
            for observer in observers {
                assert_eq!(observer.join().unwrap(), Some("deadline".to_string()));
            }
        }
    }
}
