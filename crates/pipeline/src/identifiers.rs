//! Newtype domain identifiers.
//!
//! Every name that flows between stages is a distinct newtype wrapping a
//! `String`. This prevents accidentally passing a [`PipelineName`] where an
//! [`ExecutionId`] is expected; the execution lookup takes both as plain
//! strings on the wire.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers — pipeline side
// ---------------------------------------------------------------------------

string_id! {
    /// The name of a deployment pipeline, as carried in the event's
    /// `detail.pipeline` field.
    PipelineName
}

string_id! {
    /// Identifies one run of a pipeline (`detail.execution-id`).
    ExecutionId
}

string_id! {
    /// An AWS region name (e.g. `"us-east-1"`).
    Region
}

string_id! {
    /// Deployment stage name (`APPLICATION_STAGE_NAME`).
    StageName
}

impl StageName {
    /// Stage in which the access token is supplied in plaintext.
    pub const NON_SECURE: &'static str = "testing";

    /// Returns `true` if this stage bypasses credential decryption.
    pub fn is_non_secure(&self) -> bool {
        self.0 == Self::NON_SECURE
    }
}

// ---------------------------------------------------------------------------
// Identifiers — source-control side
// ---------------------------------------------------------------------------

string_id! {
    /// Host of a revision locator (e.g. `"github.com"`).
    RepositoryHost
}

string_id! {
    /// The owning user or organisation of a hosted repository.
    RepositoryOwner
}

string_id! {
    /// The repository name, without its owner.
    RepositoryName
}

string_id! {
    /// A Git commit SHA as reported in the artifact's revision id.
    CommitSha
}

// ---------------------------------------------------------------------------
// Identifiers — UUID-backed
// ---------------------------------------------------------------------------

/// Identifies a single invocation of the relay.
///
/// Taken from the Lambda request id when that is a UUID, generated otherwise.
/// Carried as a span field so every log line of one invocation correlates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationId(Uuid);

impl InvocationId {
    /// Generates a new random invocation identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a runtime-assigned request id, falling back to a random id when
    /// it is not a UUID.
    pub fn from_request_id(request_id: &str) -> Self {
        Uuid::parse_str(request_id)
            .map(Self)
            .unwrap_or_else(|_| Self::new_random())
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for InvocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
