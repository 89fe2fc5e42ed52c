//! Core domain for the CodePipeline → GitHub commit status relay.
//!
//! This crate contains every domain concept, newtype identifier, value type,
//! error category, and capability trait used by the relay. Infrastructure
//! crates implement the traits defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; `aws` and `github` define *how* to supply it,
//! and `relay` sequences the stages.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`PipelineName`, `ExecutionId`, `CommitSha`, etc.) |
//! | [`types`] | Execution records, status mapping, `Credential`, `StatusReport` |
//! | [`errors`] | Per-stage error categories and `RelayError` |
//! | [`event`] | Inbound event shape and validation |
//! | [`config`] | Configuration checks and access-token decoding |
//! | [`revision`] | Revision locator parsing |
//! | [`ports`] | `ExecutionLookup`, `Decryptor`, `StatusPublisher` |
//! | [`fakes`] | In-memory capability implementations for tests |

pub mod config;
pub mod errors;
pub mod event;
pub mod fakes;
pub mod identifiers;
pub mod ports;
pub mod revision;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{RawConfiguration, RequiredConfiguration, ResolvedConfiguration};
pub use errors::{
    ConfigurationError, DecryptionError, DeliveryError, InputValidationError, IoStage, LookupError,
    RelayError, RevisionParseError,
};
pub use event::{EventDetail, IncomingEvent, ValidatedEvent};
pub use identifiers::{
    CommitSha, ExecutionId, InvocationId, PipelineName, Region, RepositoryHost, RepositoryName,
    RepositoryOwner, StageName,
};
pub use ports::{Decryptor, ExecutionLookup, StatusPublisher};
pub use revision::RevisionLocation;
pub use types::{
    execution_deep_link, ArtifactRevision, CommitState, Credential, ExecutionRecord,
    ExecutionStatus, StatusDelivery, StatusReport, SOURCE_ARTIFACT_NAME, STATUS_CONTEXT,
};
