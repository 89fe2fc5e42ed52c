//! Execution lookup over the CodePipeline `GetPipelineExecution` API.

use async_trait::async_trait;
use aws_sdk_codepipeline::error::DisplayErrorContext;
use aws_sdk_codepipeline::types::PipelineExecution;
use pipeline::{
    ArtifactRevision, ExecutionId, ExecutionLookup, ExecutionRecord, ExecutionStatus, LookupError,
    PipelineName,
};
use tracing::debug;

/// [`ExecutionLookup`] backed by a shared CodePipeline client.
#[derive(Debug, Clone)]
pub struct CodePipelineLookup {
    client: aws_sdk_codepipeline::Client,
}

impl CodePipelineLookup {
    pub fn new(client: aws_sdk_codepipeline::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ExecutionLookup for CodePipelineLookup {
    async fn get_execution(
        &self,
        pipeline: &PipelineName,
        execution_id: &ExecutionId,
    ) -> Result<Option<ExecutionRecord>, LookupError> {
        let output = self
            .client
            .get_pipeline_execution()
            .pipeline_name(pipeline.as_str())
            .pipeline_execution_id(execution_id.as_str())
            .send()
            .await
            .map_err(|e| LookupError::LookupFailed {
                cause: DisplayErrorContext(&e).to_string(),
            })?;

        debug!(found = output.pipeline_execution().is_some(), "GetPipelineExecution returned");
        Ok(output
            .pipeline_execution()
            .map(|execution| execution_record(pipeline, execution_id, execution)))
    }
}

/// Converts the SDK shape into the domain record.
///
/// Names and ids absent from the response fall back to the requested ones;
/// artifacts keep their response order.
pub fn execution_record(
    pipeline: &PipelineName,
    execution_id: &ExecutionId,
    execution: &PipelineExecution,
) -> ExecutionRecord {
    let pipeline_name = execution
        .pipeline_name()
        .and_then(PipelineName::new)
        .unwrap_or_else(|| pipeline.clone());
    let execution_id = execution
        .pipeline_execution_id()
        .and_then(ExecutionId::new)
        .unwrap_or_else(|| execution_id.clone());
    let status = ExecutionStatus::parse(execution.status().map(|s| s.as_str()).unwrap_or(""));

    let artifact_revisions = execution
        .artifact_revisions()
        .iter()
        .map(|artifact| ArtifactRevision {
            name: artifact.name().unwrap_or_default().to_string(),
            revision_id: artifact.revision_id().unwrap_or_default().to_string(),
            revision_url: artifact.revision_url().unwrap_or_default().to_string(),
        })
        .collect();

    ExecutionRecord {
        pipeline_name,
        execution_id,
        status,
        artifact_revisions,
    }
}
