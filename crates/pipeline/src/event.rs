//! Inbound pipeline state-change event and its validation.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::{ExecutionId, InputValidationError, PipelineName};

/// Event emitted by the pipeline service's event rule.
///
/// Only the fields the relay reads are modelled; everything else in the
/// envelope (`source`, `account`, `time`, ...) is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingEvent {
    #[serde(default)]
    pub detail: Option<EventDetail>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resources: Vec<String>,
}

/// The `detail` object of an [`IncomingEvent`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetail {
    #[serde(rename = "execution-id", default, deserialize_with = "null_as_default")]
    pub execution_id: String,
    /// State named by the event itself. Informational only: the relay reports
    /// the state returned by the execution lookup.
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pipeline: String,
}

/// Reads an explicit JSON `null` the same way as an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// An event whose mandatory fields are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEvent {
    pub pipeline: PipelineName,
    pub execution_id: ExecutionId,
    pub state: String,
    pub resources: Vec<String>,
}

impl IncomingEvent {
    /// Checks `detail`, then the execution id, then the pipeline name.
    pub fn validate(self) -> Result<ValidatedEvent, InputValidationError> {
        let detail = self.detail.ok_or(InputValidationError::MissingDetail)?;
        info!(
            execution_id = %detail.execution_id,
            pipeline = %detail.pipeline,
            state = %detail.state,
            "Incoming event detail"
        );

        let execution_id =
            ExecutionId::new(detail.execution_id).ok_or(InputValidationError::MissingExecutionId)?;
        let pipeline =
            PipelineName::new(detail.pipeline).ok_or(InputValidationError::MissingPipelineName)?;

        Ok(ValidatedEvent {
            pipeline,
            execution_id,
            state: detail.state,
            resources: self.resources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> IncomingEvent {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn full_event_validates() {
        let event = parse(
            r#"{
                "version": "0",
                "source": "aws.codepipeline",
                "resources": ["arn:aws:codepipeline:us-east-1:123456789012:deploy"],
                "detail": {
                    "pipeline": "deploy",
                    "execution-id": "a5ef215c-43b4-4513-b97f-1829f642e0b1",
                    "state": "SUCCEEDED",
                    "version": 3
                }
            }"#,
        );
        let valid = event.validate().unwrap();
        assert_eq!(valid.pipeline.as_str(), "deploy");
        assert_eq!(valid.execution_id.as_str(), "a5ef215c-43b4-4513-b97f-1829f642e0b1");
        assert_eq!(valid.state, "SUCCEEDED");
        assert_eq!(valid.resources.len(), 1);
    }

    #[test]
    fn missing_detail() {
        let err = parse(r#"{"resources": []}"#).validate().unwrap_err();
        assert_eq!(err, InputValidationError::MissingDetail);
    }

    #[test]
    fn null_detail_is_missing() {
        let err = parse(r#"{"detail": null}"#).validate().unwrap_err();
        assert_eq!(err, InputValidationError::MissingDetail);
    }

    #[test]
    fn empty_execution_id() {
        let err = parse(r#"{"detail": {"execution-id": "", "pipeline": "deploy"}}"#)
            .validate()
            .unwrap_err();
        assert_eq!(err, InputValidationError::MissingExecutionId);
    }

    #[test]
    fn execution_id_is_checked_before_pipeline() {
        let err = parse(r#"{"detail": {}}"#).validate().unwrap_err();
        assert_eq!(err, InputValidationError::MissingExecutionId);
    }

    #[test]
    fn null_execution_id_is_missing() {
        let err = parse(r#"{"detail": {"execution-id": null, "pipeline": "deploy"}}"#)
            .validate()
            .unwrap_err();
        assert_eq!(err, InputValidationError::MissingExecutionId);
    }

    #[test]
    fn null_pipeline_is_missing() {
        let err = parse(r#"{"detail": {"execution-id": "12345678", "pipeline": null}}"#)
            .validate()
            .unwrap_err();
        assert_eq!(err, InputValidationError::MissingPipelineName);
    }

    #[test]
    fn null_resources_and_state_are_empty() {
        let valid = parse(
            r#"{
                "resources": null,
                "detail": {"execution-id": "12345678", "pipeline": "deploy", "state": null}
            }"#,
        )
        .validate()
        .unwrap();
        assert!(valid.resources.is_empty());
        assert_eq!(valid.state, "");
    }

    #[test]
    fn missing_pipeline() {
        let err = parse(r#"{"detail": {"execution-id": "12345678"}}"#)
            .validate()
            .unwrap_err();
        assert_eq!(err, InputValidationError::MissingPipelineName);
    }
}
