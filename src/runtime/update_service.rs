//! Asynchronous bulk update service.
//!
//! The accounting service runs independently of the job lifecycle. Its
//! requests are queued on a bounded channel and applied one at a time by a
//! background loop; each sender awaits the reply for its own request.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::core::{FairsharePlugin, IngestError};
use crate::runtime::api::{handle_rec_update, UpdateAck};
use crate::runtime::Spawn;

type Reply = Result<UpdateAck, IngestError>;

struct UpdateRequest {
    payload: String,
    reply: oneshot::Sender<Reply>,
}

/// Handle used by the accounting side to submit updates.
#[derive(Clone)]
pub struct UpdateClient {
    tx: mpsc::Sender<UpdateRequest>,
}

impl UpdateClient {
    /// Submit a raw payload and wait until it has been applied or rejected.
    ///
    /// # Errors
    ///
    /// Returns the decoding error for a malformed payload, or
    /// [`IngestError::ServiceClosed`] if the service loop has stopped.
    pub async fn send(&self, payload: impl Into<String>) -> Result<UpdateAck, IngestError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(UpdateRequest {
                payload: payload.into(),
                reply,
            })
            .await
            .map_err(|_| IngestError::ServiceClosed)?;
        rx.await.map_err(|_| IngestError::ServiceClosed)?
    }
}

/// Background loop applying bulk updates to a plugin's store.
pub struct UpdateService;

impl UpdateService {
    /// Start the service loop on `spawner` and return a client for it.
    ///
    /// The loop exits once every [`UpdateClient`] clone has been dropped.
    ///
    /// # Panics
    ///
    /// Panics if `queue_depth` is zero.
    pub fn start<S: Spawn>(
        plugin: Arc<FairsharePlugin>,
        queue_depth: usize,
        spawner: &S,
    ) -> UpdateClient {
        let (tx, rx) = mpsc::channel(queue_depth);
        spawner.spawn(Self::run(plugin, rx));
        UpdateClient { tx }
    }

    async fn run(plugin: Arc<FairsharePlugin>, mut rx: mpsc::Receiver<UpdateRequest>) {
        tracing::info!("update service started");
        while let Some(request) = rx.recv().await {
            let result = handle_rec_update(&plugin, &request.payload);
            if request.reply.send(result).is_err() {
                tracing::warn!("update requester dropped before reply");
            }
        }
        tracing::info!("update service stopped");
    }
}
