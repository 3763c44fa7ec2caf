//! Cooperative cancellation for in-flight Analyzer calls.
//!
//! A `CancellationSource` owns the signal; any number of `CancellationToken`s
//! observe it. Dropping the source does not cancel its tokens.

use tokio::sync::watch;

#[derive(Debug)]
pub struct CancellationSource {
    tx: watch::Sender<bool>,
}

#[derive(Debug, Clone)]
pub struct CancellationToken {
    rx: watch::Receiver<bool>,
}

impl CancellationSource {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            rx: self.tx.subscribe(),
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken {
    /// A token whose source is already gone; it never fires.
    pub fn never() -> Self {
        CancellationSource::new().token()
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is requested. Pends forever if the source
    /// is dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_token_starts_uncancelled() {
        let source = CancellationSource::new();
        assert!(!source.token().is_cancelled());
        assert!(!source.is_cancelled());
    }

    #[test]
    fn test_cancel_reaches_every_token() {
        let source = CancellationSource::new();
        let t1 = source.token();
        let t2 = t1.clone();
        source.cancel();
        assert!(t1.is_cancelled());
        assert!(t2.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_resolves_after_cancel() {
        let source = CancellationSource::new();
        let token = source.token();
        let waiter = tokio::spawn(async move { token.cancelled().await });
        source.cancel();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("cancelled() should resolve")
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_token_does_not_resolve() {
        let token = CancellationToken::never();
        let result = tokio::time::timeout(Duration::from_secs(60), token.cancelled()).await;
        assert!(result.is_err());
        assert!(!token.is_cancelled());
    }
}
