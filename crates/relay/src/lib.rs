//! Orchestration of one status relay invocation.
//!
//! [`StatusRelay`] owns the three capabilities (execution lookup, decryption,
//! status publishing) and drives a single event through the stages in order:
//!
//! 1. validate the event,
//! 2. resolve configuration and decrypt the access token,
//! 3. look up the execution,
//! 4. select the `SourceCode` artifact,
//! 5. parse its revision locator,
//! 6. map the run state to a commit state,
//! 7. publish the status report.
//!
//! The first failing stage ends the invocation with its error. An execution
//! without a source artifact ends it successfully with
//! [`RelayOutcome::SkippedNoSourceArtifact`] and nothing is published.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Stages sequence calls between business logic in
//! the [`pipeline`] crate and the capability traits. No domain rules live here.

pub mod context;

use std::sync::Arc;

use pipeline::config::{credential_from_plaintext, decode_ciphertext};
use pipeline::{
    execution_deep_link, CommitState, Decryptor, ExecutionId, ExecutionLookup, ExecutionRecord,
    IncomingEvent, IoStage, LookupError, PipelineName, RawConfiguration, RelayError,
    ResolvedConfiguration, RevisionLocation, StatusDelivery, StatusPublisher, StatusReport,
    ValidatedEvent, SOURCE_ARTIFACT_NAME,
};
use tracing::{debug, info, instrument};

pub use context::InvocationContext;

/// How an invocation that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// A status report was accepted by the hosting provider.
    Reported {
        location: RevisionLocation,
        state: CommitState,
    },
    /// The execution carried no source artifact, so there was nothing to report.
    SkippedNoSourceArtifact {
        pipeline: PipelineName,
        execution_id: ExecutionId,
    },
}

/// Drives one event through the relay stages.
///
/// Capabilities are constructed once by the composition root and shared
/// across invocations; nothing else outlives a call to [`StatusRelay::process`].
#[derive(Clone)]
pub struct StatusRelay {
    lookup: Arc<dyn ExecutionLookup>,
    decryptor: Arc<dyn Decryptor>,
    publisher: Arc<dyn StatusPublisher>,
}

impl StatusRelay {
    pub fn new(
        lookup: Arc<dyn ExecutionLookup>,
        decryptor: Arc<dyn Decryptor>,
        publisher: Arc<dyn StatusPublisher>,
    ) -> Self {
        Self {
            lookup,
            decryptor,
            publisher,
        }
    }

    /// Processes one event end to end.
    #[instrument(skip_all, fields(invocation_id = %ctx.invocation_id()))]
    pub async fn process(
        &self,
        event: IncomingEvent,
        config: RawConfiguration,
        ctx: &InvocationContext,
    ) -> Result<RelayOutcome, RelayError> {
        let event = event.validate()?;
        let config = self.resolve_configuration(config, ctx).await?;
        let record = self.resolve_execution(&event, ctx).await?;

        let Some(artifact) = record.source_artifact() else {
            info!(
                pipeline = %record.pipeline_name,
                execution_id = %record.execution_id,
                "no {SOURCE_ARTIFACT_NAME} found in execution"
            );
            return Ok(RelayOutcome::SkippedNoSourceArtifact {
                pipeline: event.pipeline,
                execution_id: event.execution_id,
            });
        };

        let location = RevisionLocation::from_artifact(artifact)?;
        let state = record.status.commit_state();
        debug!(status = %record.status, %state, "mapped execution status");

        let delivery = StatusDelivery {
            report: StatusReport::new(
                state,
                execution_deep_link(&config.region, &event.pipeline, &event.execution_id),
            ),
            location,
            credential: config.credential,
        };
        self.report(&delivery, ctx).await?;

        Ok(RelayOutcome::Reported {
            location: delivery.location,
            state,
        })
    }

    /// Checks the mandatory keys and produces the credential.
    #[instrument(skip_all, fields(stage))]
    async fn resolve_configuration(
        &self,
        config: RawConfiguration,
        ctx: &InvocationContext,
    ) -> Result<ResolvedConfiguration, RelayError> {
        let required = config.require()?;
        tracing::Span::current().record("stage", required.stage.as_str());

        if !required.needs_decryption() {
            debug!("non-secure stage, using access token as supplied");
            return Ok(required.into_plaintext());
        }

        let ciphertext = decode_ciphertext(&required.raw_token)?;
        let plaintext = ctx
            .bounded(IoStage::Decrypt, self.decryptor.decrypt(&ciphertext))
            .await?;
        let credential = credential_from_plaintext(plaintext)?;
        Ok(required.with_credential(credential))
    }

    #[instrument(skip_all, fields(pipeline = %event.pipeline, execution_id = %event.execution_id))]
    async fn resolve_execution(
        &self,
        event: &ValidatedEvent,
        ctx: &InvocationContext,
    ) -> Result<ExecutionRecord, RelayError> {
        let record = ctx
            .bounded(
                IoStage::Lookup,
                self.lookup.get_execution(&event.pipeline, &event.execution_id),
            )
            .await?
            .ok_or(LookupError::EmptyExecutionResponse)?;
        debug!(
            status = %record.status,
            artifacts = record.artifact_revisions.len(),
            "resolved pipeline execution"
        );
        Ok(record)
    }

    #[instrument(
        skip_all,
        fields(
            owner = %delivery.location.owner,
            repository = %delivery.location.repository,
            commit = %delivery.location.commit,
            state = %delivery.report.state,
        )
    )]
    async fn report(
        &self,
        delivery: &StatusDelivery,
        ctx: &InvocationContext,
    ) -> Result<(), RelayError> {
        ctx.bounded(IoStage::Deliver, self.publisher.publish(delivery))
            .await?;
        info!("commit status reported");
        Ok(())
    }
}
