//! Host-facing callback argument models and JSON handlers.
//!
//! The host scheduler passes each callback a JSON argument object. These
//! handlers decode the fields the plugin needs and forward to
//! [`FairsharePlugin`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{
    FairsharePlugin, IngestError, JobHost, PluginError, RecordSnapshot, Rejection, UserId,
};

/// Arguments of the admission callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateArgs {
    /// Submitting user.
    pub userid: UserId,
    /// Submitted jobspec; only `attributes.system.bank` is read.
    pub jobspec: Jobspec,
}

/// Subset of a jobspec read by the plugin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Jobspec {
    /// Jobspec attributes.
    pub attributes: JobAttributes,
}

/// Jobspec attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobAttributes {
    /// System attributes set at submission.
    pub system: SystemAttributes,
}

/// System attributes of a jobspec.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemAttributes {
    /// Bank named by the submitter.
    #[serde(default)]
    pub bank: Option<String>,
}

/// Arguments of the priority callbacks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriorityArgs {
    /// Owning user.
    pub userid: UserId,
    /// Current urgency of the job.
    pub urgency: i32,
}

/// Output of the priority callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityResponse {
    /// Priority assigned to the job.
    pub priority: u64,
}

/// Arguments of the inactive callback.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InactiveArgs {
    /// Owning user.
    pub userid: UserId,
}

/// Reply to an applied bulk update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAck {
    /// Entries applied to the store.
    pub applied: usize,
}

/// Diagnostic dump of the accounting store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshotResponse {
    /// Every record, ordered by user then bank.
    pub records: Vec<RecordSnapshot>,
}

/// Job lifecycle events the plugin subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Job submitted; decide admission.
    Validate,
    /// Job entered the priority state.
    StatePriority,
    /// Host asks for a recalculated priority.
    PriorityGet,
    /// Job became inactive.
    StateInactive,
}

impl Topic {
    /// Every topic, in registration order.
    pub const ALL: [Self; 4] = [
        Self::Validate,
        Self::StatePriority,
        Self::PriorityGet,
        Self::StateInactive,
    ];

    /// Topic string used by the host.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validate => "job.validate",
            Self::StatePriority => "job.state.priority",
            Self::PriorityGet => "job.priority.get",
            Self::StateInactive => "job.state.inactive",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| PluginError::UnknownTopic(s.to_owned()))
    }
}

/// Result of a dispatched callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Job admitted.
    Accepted,
    /// Job refused with a reason.
    Rejected(Rejection),
    /// Priority assigned.
    Priority(PriorityResponse),
    /// Inactive processing finished.
    Released,
}

/// Admission callback.
///
/// # Errors
///
/// Returns the [`Rejection`] to report; undecodable arguments are rejected
/// with [`Rejection::MalformedArgs`].
pub fn handle_validate<H>(
    plugin: &FairsharePlugin,
    job: &mut H,
    args: &Value,
) -> Result<(), Rejection>
where
    H: JobHost + ?Sized,
{
    let args = ValidateArgs::deserialize(args).map_err(|e| {
        tracing::warn!(error = %e, "undecodable validate args");
        Rejection::MalformedArgs
    })?;
    plugin
        .validate(job, args.userid, args.jobspec.attributes.system.bank.as_deref())
        .map(|_| ())
}

/// Priority callback, used for both entering the priority state and
/// recalculation requests.
///
/// # Errors
///
/// Returns [`PluginError::Unpack`] if the arguments cannot be decoded.
pub fn handle_priority<H>(
    plugin: &FairsharePlugin,
    job: &mut H,
    args: &Value,
) -> Result<PriorityResponse, PluginError>
where
    H: JobHost + ?Sized,
{
    let args = PriorityArgs::deserialize(args)?;
    let priority = plugin.priority(job, args.userid, args.urgency);
    Ok(PriorityResponse { priority })
}

/// Inactive callback.
///
/// # Errors
///
/// Returns [`PluginError::Unpack`] if the arguments cannot be decoded.
pub fn handle_inactive<H>(
    plugin: &FairsharePlugin,
    job: &mut H,
    args: &Value,
) -> Result<(), PluginError>
where
    H: JobHost + ?Sized,
{
    let args = InactiveArgs::deserialize(args)?;
    plugin.inactive(job, args.userid);
    Ok(())
}

/// Bulk update request. The acknowledgement is produced only after the
/// update is visible to admissions.
///
/// # Errors
///
/// Returns [`IngestError`] for malformed payloads; nothing is applied.
pub fn handle_rec_update(
    plugin: &FairsharePlugin,
    payload: &str,
) -> Result<UpdateAck, IngestError> {
    let applied = plugin.apply_payload(payload)?;
    Ok(UpdateAck { applied })
}

/// Diagnostic dump of the store.
#[must_use]
pub fn store_snapshot(plugin: &FairsharePlugin) -> StoreSnapshotResponse {
    StoreSnapshotResponse {
        records: plugin.store().snapshot(),
    }
}

/// Route a host callback by topic string.
///
/// # Errors
///
/// Returns [`PluginError::UnknownTopic`] for unhandled topics and
/// [`PluginError::Unpack`] for undecodable priority or inactive arguments.
pub fn dispatch<H>(
    plugin: &FairsharePlugin,
    topic: &str,
    job: &mut H,
    args: &Value,
) -> Result<CallbackOutcome, PluginError>
where
    H: JobHost + ?Sized,
{
    match topic.parse::<Topic>()? {
        Topic::Validate => Ok(match handle_validate(plugin, job, args) {
            Ok(()) => CallbackOutcome::Accepted,
            Err(reason) => CallbackOutcome::Rejected(reason),
        }),
        Topic::StatePriority | Topic::PriorityGet => {
            handle_priority(plugin, job, args).map(CallbackOutcome::Priority)
        }
        Topic::StateInactive => {
            handle_inactive(plugin, job, args).map(|()| CallbackOutcome::Released)
        }
    }
}
