//! Write-behind persistence.
//!
//! Mutations hand their new value to a [`PersistQueue`] and return immediately. A
//! single background task applies the writes in the order they were issued, so the
//! last value issued for a key is also the last one written. Failed writes are
//! logged and dropped, and anything still queued when the process exits is lost.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::KeyValueStore;

enum Command {
    Write { key: String, payload: String },
    Flush(oneshot::Sender<()>),
}

/// Handle feeding the background writer. Cloning shares the same writer.
#[derive(Debug, Clone)]
pub struct PersistQueue {
    sender: mpsc::UnboundedSender<Command>,
}

impl PersistQueue {
    /// Spawn the writer task on the current tokio runtime.
    ///
    /// The task exits once every handle has been dropped and the queue drained.
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(drain(store, receiver));
        Self { sender }
    }

    /// Serialise `value` now and queue it for storage under `key`.
    pub fn enqueue<T>(&self, key: &str, value: &T)
    where
        T: Serialize + ?Sized,
    {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(key, "failed to serialise value for storage: {err}");
                return;
            }
        };

        let command = Command::Write {
            key: key.to_string(),
            payload,
        };
        if self.sender.send(command).is_err() {
            warn!(key, "persistence writer has stopped; dropping write");
        }
    }

    /// Wait until every write queued before this call has been attempted.
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.sender.send(Command::Flush(ack)).is_err() {
            return;
        }
        let _ = done.await;
    }
}

async fn drain(store: Arc<dyn KeyValueStore>, mut receiver: mpsc::UnboundedReceiver<Command>) {
    while let Some(command) = receiver.recv().await {
        match command {
            Command::Write { key, payload } => match store.set(&key, &payload).await {
                Ok(()) => debug!(key = %key, bytes = payload.len(), "persisted"),
                Err(err) => warn!(key = %key, "failed to persist: {err}"),
            },
            Command::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    debug!("persistence writer stopped");
}
