//! Access-token decryption over KMS `Decrypt`.
//!
//! The function's execution role needs `kms:Decrypt` on the key the token was
//! encrypted with.

use async_trait::async_trait;
use aws_sdk_kms::error::DisplayErrorContext;
use aws_sdk_kms::primitives::Blob;
use pipeline::{DecryptionError, Decryptor};

/// [`Decryptor`] backed by a shared KMS client.
#[derive(Debug, Clone)]
pub struct KmsDecryptor {
    client: aws_sdk_kms::Client,
}

impl KmsDecryptor {
    pub fn new(client: aws_sdk_kms::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Decryptor for KmsDecryptor {
    async fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, DecryptionError> {
        let output = self
            .client
            .decrypt()
            .ciphertext_blob(Blob::new(ciphertext))
            .send()
            .await
            .map_err(|e| DecryptionError::DecryptFailed {
                cause: DisplayErrorContext(&e).to_string(),
            })?;

        output
            .plaintext()
            .map(|blob| blob.as_ref().to_vec())
            .ok_or(DecryptionError::EmptyPlaintext)
    }
}
