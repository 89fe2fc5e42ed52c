//! In-memory fakes for the capability traits (testing only)
//!
//! Each fake returns a scripted result and records how it was called, so
//! tests can assert both on the relay's outcome and on which capabilities it
//! reached.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::ports::{Decryptor, ExecutionLookup, StatusPublisher};
use crate::{
    DecryptionError, DeliveryError, ExecutionId, ExecutionRecord, LookupError, PipelineName,
    StatusDelivery,
};

// ---------------------------------------------------------------------------
// FakeExecutionLookup
// ---------------------------------------------------------------------------

/// Returns the same scripted response for every lookup.
#[derive(Debug)]
pub struct FakeExecutionLookup {
    response: Result<Option<ExecutionRecord>, LookupError>,
    calls: Mutex<Vec<(PipelineName, ExecutionId)>>,
}

impl FakeExecutionLookup {
    pub fn returning(record: ExecutionRecord) -> Self {
        Self::with_response(Ok(Some(record)))
    }

    /// Answers without an error and without a record.
    pub fn empty() -> Self {
        Self::with_response(Ok(None))
    }

    pub fn failing(cause: impl Into<String>) -> Self {
        Self::with_response(Err(LookupError::LookupFailed {
            cause: cause.into(),
        }))
    }

    pub fn with_response(response: Result<Option<ExecutionRecord>, LookupError>) -> Self {
        Self {
            response,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(PipelineName, ExecutionId)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExecutionLookup for FakeExecutionLookup {
    async fn get_execution(
        &self,
        pipeline: &PipelineName,
        execution_id: &ExecutionId,
    ) -> Result<Option<ExecutionRecord>, LookupError> {
        self.calls
            .lock()
            .unwrap()
            .push((pipeline.clone(), execution_id.clone()));
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// FakeDecryptor
// ---------------------------------------------------------------------------

/// Returns fixed plaintext and records every ciphertext it was given.
#[derive(Debug)]
pub struct FakeDecryptor {
    response: Result<Vec<u8>, DecryptionError>,
    inputs: Mutex<Vec<Vec<u8>>>,
}

impl FakeDecryptor {
    pub fn returning(plaintext: impl Into<Vec<u8>>) -> Self {
        Self {
            response: Ok(plaintext.into()),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(cause: impl Into<String>) -> Self {
        Self {
            response: Err(DecryptionError::DecryptFailed {
                cause: cause.into(),
            }),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn inputs(&self) -> Vec<Vec<u8>> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Decryptor for FakeDecryptor {
    async fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, DecryptionError> {
        self.inputs.lock().unwrap().push(ciphertext.to_vec());
        if ciphertext.is_empty() {
            return Err(DecryptionError::DecryptFailed {
                cause: "missing text to decrypt".to_string(),
            });
        }
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// RecordingPublisher
// ---------------------------------------------------------------------------

/// Records deliveries and answers with a scripted result.
#[derive(Debug)]
pub struct RecordingPublisher {
    response: Result<(), DeliveryError>,
    deliveries: Mutex<Vec<StatusDelivery>>,
}

impl RecordingPublisher {
    pub fn accepting() -> Self {
        Self::with_response(Ok(()))
    }

    /// Simulates the provider answering with `status` and `body`.
    pub fn rejecting(status: u16, body: impl Into<String>) -> Self {
        Self::with_response(Err(DeliveryError::UnexpectedUpstreamResponse {
            status,
            body: body.into(),
        }))
    }

    pub fn with_response(response: Result<(), DeliveryError>) -> Self {
        Self {
            response,
            deliveries: Mutex::new(Vec::new()),
        }
    }

    pub fn deliveries(&self) -> Vec<StatusDelivery> {
        self.deliveries.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatusPublisher for RecordingPublisher {
    async fn publish(&self, delivery: &StatusDelivery) -> Result<(), DeliveryError> {
        self.deliveries.lock().unwrap().push(delivery.clone());
        self.response.clone()
    }
}
