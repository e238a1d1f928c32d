//! Runtime adapters and the host-facing API surface.

pub mod api;
pub mod spawn;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_spawner;
#[cfg(feature = "tokio-runtime")]
pub mod update_service;

pub use api::{dispatch, handle_inactive, handle_priority, handle_rec_update, handle_validate};
pub use api::{CallbackOutcome, PriorityResponse, Topic, UpdateAck};
pub use spawn::Spawn;
#[cfg(feature = "tokio-runtime")]
pub use tokio_spawner::TokioSpawner;
#[cfg(feature = "tokio-runtime")]
pub use update_service::{UpdateClient, UpdateService};
