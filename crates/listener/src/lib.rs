//! Trigger event sources.
//!
//! Two ways of feeding [`pipeline::IncomingEvent`]s to a handler:
//!
//! - [`lambda::run`] — the AWS Lambda runtime loop. Each invocation's payload
//!   is the EventBridge event; the invocation deadline and request id come
//!   from the runtime context.
//! - [`single_shot::load_event`] — reads one JSON event from a file or stdin,
//!   for local runs and replaying captured events.
//!
//! ## Deployment Scenarios
//!
//! | Scenario | Event source | Notes |
//! |----------|--------------|-------|
//! | Production | `lambda::run` | EventBridge rule on CodePipeline state changes |
//! | Local replay | `single_shot::load_event` | `APPLICATION_STAGE_NAME=testing` skips KMS |
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Runtime protocol and payload deserialisation live here.
//! The handler only sees an [`pipeline::IncomingEvent`] and a
//! [`relay::InvocationContext`].

pub mod lambda;
pub mod single_shot;

use thiserror::Error;

/// Errors raised by an event source itself (not by event processing).
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("failed to read event: {0}")]
    Io(#[from] std::io::Error),

    #[error("event is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("lambda runtime failed: {0}")]
    Runtime(String),
}
