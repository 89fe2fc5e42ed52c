//! Single-shot event source: one JSON event from a file or stdin.

use std::io::Read;
use std::path::Path;

use pipeline::IncomingEvent;

use crate::ListenerError;

/// Parses one event from `reader`.
pub fn read_event<R: Read>(reader: R) -> Result<IncomingEvent, ListenerError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Loads the event from `path`; `None` or `-` reads stdin.
pub fn load_event(path: Option<&Path>) -> Result<IncomingEvent, ListenerError> {
    match path {
        Some(path) if path != Path::new("-") => {
            read_event(std::io::BufReader::new(std::fs::File::open(path)?))
        }
        _ => read_event(std::io::stdin().lock()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eventbridge_envelope_is_accepted() {
        let json = br#"{
            "version": "0",
            "id": "01234567-0123-0123-0123-012345678901",
            "detail-type": "CodePipeline Pipeline Execution State Change",
            "source": "aws.codepipeline",
            "account": "123456789012",
            "time": "2020-01-24T22:03:44Z",
            "region": "us-east-1",
            "resources": ["arn:aws:codepipeline:us-east-1:123456789012:widgets-pipeline"],
            "detail": {
                "pipeline": "widgets-pipeline",
                "execution-id": "a5ef215c-43b4-4513-b97f-1829f642e0b1",
                "state": "STARTED",
                "version": 1
            }
        }"#;
        let event = read_event(&json[..]).unwrap();
        let detail = event.detail.unwrap();
        assert_eq!(detail.pipeline, "widgets-pipeline");
        assert_eq!(detail.execution_id, "a5ef215c-43b4-4513-b97f-1829f642e0b1");
        assert_eq!(detail.state, "STARTED");
        assert_eq!(event.resources.len(), 1);
    }

    #[test]
    fn event_without_detail_still_parses() {
        let event = read_event(&br#"{"resources": []}"#[..]).unwrap();
        assert!(event.detail.is_none());
    }

    #[test]
    fn invalid_json_is_a_listener_error() {
        let err = read_event(&b"{not json"[..]).unwrap_err();
        assert!(matches!(err, ListenerError::Json(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_event(Some(Path::new("/nonexistent/event.json"))).unwrap_err();
        assert!(matches!(err, ListenerError::Io(_)));
    }
}
