//! AWS infrastructure adapter.
//!
//! Implements two [`pipeline`] capability traits:
//!
//! - [`CodePipelineLookup`] — [`pipeline::ExecutionLookup`] via CodePipeline
//!   `GetPipelineExecution`.
//! - [`KmsDecryptor`] — [`pipeline::Decryptor`] via KMS `Decrypt`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** SDK request shapes and error rendering live here;
//! SDK errors are flattened into the domain's category errors with the full
//! error chain as the cause. Clients are built once by the composition root
//! with [`load_sdk_config`] and reused for every invocation.

pub mod codepipeline;
pub mod kms;

use aws_config::{BehaviorVersion, Region, SdkConfig};

pub use codepipeline::CodePipelineLookup;
pub use kms::KmsDecryptor;

/// Loads the shared SDK configuration from the default provider chain.
///
/// `region` overrides the chain's region when given.
pub async fn load_sdk_config(region: Option<String>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region));
    }
    loader.load().await
}

/// Builds both capabilities from one SDK configuration.
pub fn capabilities(config: &SdkConfig) -> (CodePipelineLookup, KmsDecryptor) {
    (
        CodePipelineLookup::new(aws_sdk_codepipeline::Client::new(config)),
        KmsDecryptor::new(aws_sdk_kms::Client::new(config)),
    )
}
