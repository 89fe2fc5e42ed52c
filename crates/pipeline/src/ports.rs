//! Capability traits implemented by the infrastructure crates.
//!
//! Each trait has exactly one method. `aws` implements [`ExecutionLookup`] and
//! [`Decryptor`]; `github` implements [`StatusPublisher`]. In-memory
//! implementations for tests live in [`crate::fakes`].

use async_trait::async_trait;

use crate::{
    DecryptionError, DeliveryError, ExecutionId, ExecutionRecord, LookupError, PipelineName,
    StatusDelivery,
};

/// Retrieves a pipeline execution by pipeline name and execution id.
#[async_trait]
pub trait ExecutionLookup: Send + Sync {
    /// Returns `Ok(None)` when the provider answered without an error but
    /// carried no execution in its response.
    async fn get_execution(
        &self,
        pipeline: &PipelineName,
        execution_id: &ExecutionId,
    ) -> Result<Option<ExecutionRecord>, LookupError>;
}

/// Decrypts the access token ciphertext (already base64-decoded).
#[async_trait]
pub trait Decryptor: Send + Sync {
    async fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, DecryptionError>;
}

/// Sends one status report to the hosting provider.
///
/// Implementations make a single attempt and succeed only on `201 Created`.
#[async_trait]
pub trait StatusPublisher: Send + Sync {
    async fn publish(&self, delivery: &StatusDelivery) -> Result<(), DeliveryError>;
}
