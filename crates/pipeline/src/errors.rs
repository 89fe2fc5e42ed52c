//! Error taxonomy for the status relay.
//!
//! Each stage of the relay has its own category error. [`RelayError`] wraps
//! one category per variant, so callers can match on the stage that failed
//! while the invoker only ever sees a single error with a readable message.
//!
//! Every variant is fatal to the invocation. An execution without a source
//! artifact is an outcome, not an error, and does not appear here.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Category errors
// ---------------------------------------------------------------------------

/// The inbound event is missing a required field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputValidationError {
    #[error("missing param event.detail")]
    MissingDetail,

    #[error("missing event param execution-id")]
    MissingExecutionId,

    #[error("missing event param pipeline")]
    MissingPipelineName,
}

/// A mandatory configuration value is unset or empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("required key {key} missing value")]
    MissingRequiredConfig {
        /// Environment key of the missing value (e.g. `AWS_REGION`).
        key: &'static str,
    },
}

/// The access token could not be turned into a usable credential.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecryptionError {
    /// The raw token is not valid base64.
    #[error("access token is not valid base64: {reason}")]
    MalformedCiphertext { reason: String },

    /// The decryption capability rejected the ciphertext or failed in transit.
    #[error("decryption failed: {cause}")]
    DecryptFailed { cause: String },

    #[error("decrypted access token is not valid UTF-8")]
    InvalidPlaintext,

    #[error("decrypted access token is empty")]
    EmptyPlaintext,
}

/// The pipeline execution could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Transport failure, or the provider reported an error (not found,
    /// validation, access denied).
    #[error("pipeline execution lookup failed: {cause}")]
    LookupFailed { cause: String },

    /// The provider answered without an error but returned no execution.
    #[error("missing pipeline execution")]
    EmptyExecutionResponse,
}

/// The source artifact's revision could not be resolved to a commit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevisionParseError {
    #[error("source artifact has no revision id")]
    MissingRevisionId,

    #[error("malformed revision url '{url}': {reason}")]
    MalformedRevisionUrl { url: String, reason: String },

    /// The URL path does not carry both an owner and a repository segment.
    #[error("revision url path '{path}' does not name an owner and repository")]
    UnderspecifiedRevisionPath { path: String },
}

/// The status report was not accepted by the hosting provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The request could not be built or sent, or the response not read.
    #[error("status delivery failed: {cause}")]
    DeliveryFailed { cause: String },

    /// The provider answered with something other than `201 Created`.
    #[error("unexpected response from GitHub, code: {status} body: {body}")]
    UnexpectedUpstreamResponse {
        /// HTTP status code returned.
        status: u16,
        /// Response body text, kept for diagnosis.
        body: String,
    },
}

// ---------------------------------------------------------------------------
// Relay-level error
// ---------------------------------------------------------------------------

/// I/O-performing stages bounded by the invocation deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoStage {
    Decrypt,
    Lookup,
    Deliver,
}

impl std::fmt::Display for IoStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Decrypt => "decrypt",
            Self::Lookup => "lookup",
            Self::Deliver => "deliver",
        })
    }
}

/// Reported to the invoker when an invocation fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error(transparent)]
    Input(#[from] InputValidationError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Decryption(#[from] DecryptionError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    RevisionParse(#[from] RevisionParseError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// The invocation deadline passed while a stage was waiting on I/O.
    #[error("invocation deadline exceeded during {stage}")]
    DeadlineExceeded { stage: IoStage },
}
