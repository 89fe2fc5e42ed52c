//! Configuration resolution and access-token handling.
//!
//! [`RawConfiguration`] is what the environment supplies. [`RawConfiguration::require`]
//! checks the mandatory keys in a fixed order; the token then either passes
//! through unchanged (non-secure stage) or goes through
//! [`decode_ciphertext`] → decryption capability → [`credential_from_plaintext`].
//! The decryption call itself is driven by the relay so it can be bounded by
//! the invocation deadline.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::{ConfigurationError, Credential, DecryptionError, Region, StageName};

/// Environment key for the AWS region.
pub const REGION_KEY: &str = "AWS_REGION";
/// Environment key for the (possibly encrypted) GitHub access token.
pub const ACCESS_TOKEN_KEY: &str = "GITHUB_ACCESS_TOKEN";
/// Environment key for the deployment stage.
pub const STAGE_NAME_KEY: &str = "APPLICATION_STAGE_NAME";

/// Configuration values as supplied, before any checks.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RawConfiguration {
    pub region: Option<String>,
    pub access_token: Option<String>,
    pub stage_name: Option<String>,
}

impl std::fmt::Debug for RawConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawConfiguration")
            .field("region", &self.region)
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .field("stage_name", &self.stage_name)
            .finish()
    }
}

/// Mandatory configuration with every value present.
///
/// The token is still raw here: ciphertext unless the stage is non-secure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredConfiguration {
    pub region: Region,
    pub stage: StageName,
    pub raw_token: Credential,
}

/// Fully resolved configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfiguration {
    pub region: Region,
    pub stage: StageName,
    pub credential: Credential,
}

impl RawConfiguration {
    /// Reads the three keys through `lookup` (normally `std::env::var`).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            region: lookup(REGION_KEY),
            access_token: lookup(ACCESS_TOKEN_KEY),
            stage_name: lookup(STAGE_NAME_KEY),
        }
    }

    /// Reads the three keys from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Checks region, then access token, then stage name.
    ///
    /// A value that is set but blank counts as missing; accepted values are
    /// trimmed.
    pub fn require(self) -> Result<RequiredConfiguration, ConfigurationError> {
        let region = present(self.region, REGION_KEY)?;
        let raw_token = present(self.access_token, ACCESS_TOKEN_KEY)?;
        let stage = present(self.stage_name, STAGE_NAME_KEY)?;

        Ok(RequiredConfiguration {
            region: Region::new(region).ok_or(missing(REGION_KEY))?,
            stage: StageName::new(stage).ok_or(missing(STAGE_NAME_KEY))?,
            raw_token: Credential::new(raw_token),
        })
    }
}

impl RequiredConfiguration {
    /// Returns `true` when the raw token must be decrypted before use.
    pub fn needs_decryption(&self) -> bool {
        !self.stage.is_non_secure()
    }

    /// Finishes resolution with the given credential.
    pub fn with_credential(self, credential: Credential) -> ResolvedConfiguration {
        ResolvedConfiguration {
            region: self.region,
            stage: self.stage,
            credential,
        }
    }

    /// Finishes resolution using the raw token as the credential.
    pub fn into_plaintext(self) -> ResolvedConfiguration {
        let credential = self.raw_token.clone();
        self.with_credential(credential)
    }
}

fn missing(key: &'static str) -> ConfigurationError {
    ConfigurationError::MissingRequiredConfig { key }
}

fn present(value: Option<String>, key: &'static str) -> Result<String, ConfigurationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(missing(key)),
    }
}

/// Decodes the base64 ciphertext carried in the access token.
pub fn decode_ciphertext(raw_token: &Credential) -> Result<Vec<u8>, DecryptionError> {
    STANDARD
        .decode(raw_token.expose().trim())
        .map_err(|e| DecryptionError::MalformedCiphertext {
            reason: e.to_string(),
        })
}

/// Turns decrypted bytes into a credential.
///
/// One trailing newline is removed, then surrounding whitespace.
pub fn credential_from_plaintext(plaintext: Vec<u8>) -> Result<Credential, DecryptionError> {
    let text = String::from_utf8(plaintext).map_err(|_| DecryptionError::InvalidPlaintext)?;
    let token = text.strip_suffix('\n').unwrap_or(&text).trim();
    if token.is_empty() {
        return Err(DecryptionError::EmptyPlaintext);
    }
    Ok(Credential::new(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn raw(pairs: &[(&str, &str)]) -> RawConfiguration {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RawConfiguration::from_lookup(|key| env.get(key).cloned())
    }

    fn missing_key(err: ConfigurationError) -> &'static str {
        let ConfigurationError::MissingRequiredConfig { key } = err;
        key
    }

    #[test]
    fn region_is_checked_first() {
        let err = raw(&[]).require().unwrap_err();
        assert_eq!(missing_key(err), REGION_KEY);
    }

    #[test]
    fn token_is_checked_before_stage() {
        let err = raw(&[(REGION_KEY, "us-east-1")]).require().unwrap_err();
        assert_eq!(missing_key(err), ACCESS_TOKEN_KEY);
    }

    #[test]
    fn stage_is_checked_last() {
        let err = raw(&[(REGION_KEY, "us-east-1"), (ACCESS_TOKEN_KEY, "1234567")])
            .require()
            .unwrap_err();
        assert_eq!(missing_key(err), STAGE_NAME_KEY);
    }

    #[test]
    fn blank_values_count_as_missing() {
        let err = raw(&[(REGION_KEY, "  ")]).require().unwrap_err();
        assert_eq!(missing_key(err), REGION_KEY);
    }

    #[test]
    fn accepted_values_are_trimmed() {
        let required = raw(&[
            (REGION_KEY, " us-east-1\n"),
            (ACCESS_TOKEN_KEY, "1234567 "),
            (STAGE_NAME_KEY, " testing"),
        ])
        .require()
        .unwrap();
        assert_eq!(required.region.as_str(), "us-east-1");
        assert!(required.stage.is_non_secure());
        assert_eq!(required.into_plaintext().credential.expose(), "1234567");
    }

    #[test]
    fn testing_stage_uses_token_as_is() {
        let required = raw(&[
            (REGION_KEY, "us-east-1"),
            (ACCESS_TOKEN_KEY, "1234567"),
            (STAGE_NAME_KEY, "testing"),
        ])
        .require()
        .unwrap();
        assert!(!required.needs_decryption());
        let resolved = required.into_plaintext();
        assert_eq!(resolved.credential.expose(), "1234567");
        assert_eq!(resolved.region.as_str(), "us-east-1");
    }

    #[test]
    fn other_stages_need_decryption() {
        let required = raw(&[
            (REGION_KEY, "us-east-1"),
            (ACCESS_TOKEN_KEY, "AQICAHh="),
            (STAGE_NAME_KEY, "production"),
        ])
        .require()
        .unwrap();
        assert!(required.needs_decryption());
    }

    #[test]
    fn debug_output_hides_the_token() {
        let config = raw(&[(ACCESS_TOKEN_KEY, "ghp_secret")]);
        assert!(!format!("{config:?}").contains("ghp_secret"));
    }

    #[test]
    fn ciphertext_is_standard_base64() {
        let bytes = decode_ciphertext(&Credential::new("c29tZS1ibG9i")).unwrap();
        assert_eq!(bytes, b"some-blob");
    }

    #[test]
    fn non_base64_token_is_malformed() {
        let err = decode_ciphertext(&Credential::new("not base64!")).unwrap_err();
        assert!(matches!(err, DecryptionError::MalformedCiphertext { .. }));
    }

    #[test]
    fn plaintext_is_trimmed() {
        let credential = credential_from_plaintext(b" some-encrypted-text\n".to_vec()).unwrap();
        assert_eq!(credential.expose(), "some-encrypted-text");

        let credential = credential_from_plaintext(b"\ttoken \r\n".to_vec()).unwrap();
        assert_eq!(credential.expose(), "token");
    }

    #[test]
    fn blank_plaintext_is_rejected() {
        let err = credential_from_plaintext(b" \n".to_vec()).unwrap_err();
        assert_eq!(err, DecryptionError::EmptyPlaintext);
    }

    #[test]
    fn non_utf8_plaintext_is_rejected() {
        let err = credential_from_plaintext(vec![0xff, 0xfe]).unwrap_err();
        assert_eq!(err, DecryptionError::InvalidPlaintext);
    }
}
