//! Error types for accounting and priority operations.

use thiserror::Error;

/// Reasons a job is refused at admission.
///
/// Each variant renders a distinct message that is passed back to the
/// submitter verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The admission arguments could not be decoded.
    #[error("unable to unpack bank arg")]
    MalformedArgs,
    /// The user has no entry in the accounting store.
    #[error("user not found in accounting database")]
    UserNotFound,
    /// The user named a bank they are not registered under.
    #[error("user does not belong to specified bank")]
    NotInBank,
    /// No bank was named and the user's default bank is not registered.
    #[error("user/default bank entry does not exist")]
    DefaultBankMissing,
    /// The resolved bank record has a fairshare of zero.
    #[error("user fairshare value is 0")]
    ZeroFairshare,
    /// The resolved bank record is already at its active job limit.
    #[error("user has max number of jobs submitted")]
    MaxJobsReached,
    /// The host refused to attach the bank record to the job.
    #[error("unable to attach bank info to job")]
    BindFailed,
}

/// Errors produced while decoding a bulk update payload.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Payload is not valid JSON or is missing a required field.
    #[error("failed to unpack update: {0}")]
    Unpack(#[from] serde_json::Error),
    /// A numeric field could not be parsed.
    #[error("invalid {field}: {value:?}")]
    InvalidNumber {
        /// Name of the offending field.
        field: &'static str,
        /// Raw value as received.
        value: String,
    },
    /// A string field that must be non-empty was empty.
    #[error("empty {0}")]
    EmptyField(&'static str),
    /// A batch envelope carried no entries.
    #[error("update batch is empty")]
    EmptyBatch,
    /// The update service is no longer accepting requests.
    #[error("update service closed")]
    ServiceClosed,
}

/// Errors returned by a job host when storing a binding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// The job already carries a value under the requested key.
    #[error("job already has a value for `{0}`")]
    AlreadySet(String),
    /// Host-specific failure.
    #[error("host error: {0}")]
    Host(String),
}

/// Errors surfaced by host-facing callback handlers and plugin construction.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Callback arguments did not have the expected shape.
    #[error("failed to unpack callback args: {0}")]
    Unpack(#[from] serde_json::Error),
    /// The host invoked a topic this plugin does not handle.
    #[error("unknown topic: {0}")]
    UnknownTopic(String),
    /// Configuration failed validation.
    #[error("config invalid: {0}")]
    Config(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
