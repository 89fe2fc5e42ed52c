//! Shared value types for the status relay domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! behaviour: [`ExecutionStatus`] maps onto a [`CommitState`], [`Credential`]
//! hides its contents from `Debug`, and [`StatusReport`] is the exact JSON body
//! the hosting provider receives.

use serde::{Deserialize, Serialize};

use crate::{ExecutionId, PipelineName, RevisionLocation};

/// Name of the execution artifact that carries the source revision.
pub const SOURCE_ARTIFACT_NAME: &str = "SourceCode";

/// Value of the `context` field on every status report.
pub const STATUS_CONTEXT: &str = "continuous-integration/codepipeline";

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Run state of a pipeline execution as reported by the execution lookup.
///
/// Parsing never fails: unrecognised values (including the empty string) are
/// kept in [`ExecutionStatus::Other`] so they still map to a commit state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExecutionStatus {
    InProgress,
    Succeeded,
    Failed,
    Stopped,
    Stopping,
    Superseded,
    Cancelled,
    /// Any state this crate does not know about.
    Other(String),
}

impl ExecutionStatus {
    /// Parses the provider's string form (e.g. `"InProgress"`).
    pub fn parse(raw: &str) -> Self {
        match raw {
            "InProgress" => Self::InProgress,
            "Succeeded" => Self::Succeeded,
            "Failed" => Self::Failed,
            "Stopped" => Self::Stopped,
            "Stopping" => Self::Stopping,
            "Superseded" => Self::Superseded,
            "Cancelled" => Self::Cancelled,
            other => Self::Other(other.to_string()),
        }
    }

    /// Maps the run state onto the commit status shown by the hosting provider.
    ///
    /// Total: everything that is neither running nor succeeded is a failure.
    pub fn commit_state(&self) -> CommitState {
        match self {
            Self::InProgress => CommitState::Pending,
            Self::Succeeded => CommitState::Success,
            _ => CommitState::Failure,
        }
    }

    /// Returns the provider's string form.
    pub fn as_str(&self) -> &str {
        match self {
            Self::InProgress => "InProgress",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Stopped => "Stopped",
            Self::Stopping => "Stopping",
            Self::Superseded => "Superseded",
            Self::Cancelled => "Cancelled",
            Self::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named artifact snapshot attached to an execution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtifactRevision {
    pub name: String,
    /// Commit id for source artifacts.
    pub revision_id: String,
    /// URL-shaped locator of the revision (e.g. a GitHub commit page).
    pub revision_url: String,
}

/// Result of an execution lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRecord {
    pub pipeline_name: PipelineName,
    pub execution_id: ExecutionId,
    pub status: ExecutionStatus,
    /// In the order the provider returned them.
    pub artifact_revisions: Vec<ArtifactRevision>,
}

impl ExecutionRecord {
    /// Returns the first artifact named [`SOURCE_ARTIFACT_NAME`], if any.
    pub fn source_artifact(&self) -> Option<&ArtifactRevision> {
        self.artifact_revisions
            .iter()
            .find(|artifact| artifact.name == SOURCE_ARTIFACT_NAME)
    }
}

// ---------------------------------------------------------------------------
// Credential
// ---------------------------------------------------------------------------

/// Access token for the hosting provider's API.
///
/// `Debug` is redacted; the only way to read the value is [`Credential::expose`],
/// which the status publisher calls when building the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

// ---------------------------------------------------------------------------
// Status report
// ---------------------------------------------------------------------------

/// Commit status values accepted by the hosting provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitState {
    Pending,
    Success,
    Failure,
}

impl CommitState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl std::fmt::Display for CommitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON body of the outbound status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub context: String,
    pub state: CommitState,
    pub target_url: String,
}

impl StatusReport {
    /// Builds a report under the fixed [`STATUS_CONTEXT`].
    pub fn new(state: CommitState, target_url: impl Into<String>) -> Self {
        Self {
            context: STATUS_CONTEXT.to_string(),
            state,
            target_url: target_url.into(),
        }
    }
}

/// Everything a [`crate::StatusPublisher`] needs for one delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusDelivery {
    pub location: RevisionLocation,
    pub report: StatusReport,
    pub credential: Credential,
}

/// Console URL of an execution, used as the report's `target_url`.
pub fn execution_deep_link(
    region: &crate::Region,
    pipeline: &PipelineName,
    execution_id: &ExecutionId,
) -> String {
    format!(
        "https://{region}.console.aws.amazon.com/codesuite/codepipeline/pipelines/{pipeline}/executions/{execution_id}"
    )
}
