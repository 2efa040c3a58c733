//! The "stop accepting new requests" hook.

use tokio::sync::watch;

/// Owned by whatever supervises the server; flips every connection created
/// from it into draining mode.
#[derive(Debug)]
pub struct DrainHandle {
    tx: watch::Sender<bool>,
}

impl DrainHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// A signal to hand to a connection.
    pub fn signal(&self) -> DrainSignal {
        DrainSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Ask every connection to finish its current request and stop.
    pub fn drain(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_draining(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for DrainHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// The connection-side view of a [`DrainHandle`].
#[derive(Debug, Clone)]
pub struct DrainSignal {
    rx: watch::Receiver<bool>,
}

impl DrainSignal {
    pub fn is_draining(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once draining has been requested. Never resolves if the
    /// handle is dropped without draining.
    pub async fn drained(&mut self) {
        if self.rx.wait_for(|draining| *draining).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
