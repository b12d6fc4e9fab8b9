//! Shutdown coordination for the emulator.
//!
//! `main` and the integration tests own a [`Shutdown`]; the emulator's
//! `HttpServer::run` takes a receiver from it and drains in-flight
//! redirects once it fires, racing it against Ctrl+C and SIGTERM.

use tokio::sync::broadcast;

/// Broadcast handle that stops a running emulator.
///
/// Cloning shares the same channel, so any clone can stop every server
/// subscribed through another.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal. Receivers subscribed later miss it.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of tasks still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_every_subscriber() {
        let shutdown = Shutdown::new();
        let mut a = shutdown.subscribe();
        let mut b = shutdown.subscribe();
        assert_eq!(shutdown.receiver_count(), 2);

        shutdown.trigger();
        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }

    #[test]
    fn test_trigger_without_server_is_harmless() {
        let shutdown = Shutdown::default();
        let clone = shutdown.clone();
        clone.trigger();
        assert_eq!(shutdown.receiver_count(), 0);
    }
}
