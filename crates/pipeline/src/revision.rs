//! Revision locator parsing.
//!
//! A source artifact carries a commit id and a URL-shaped locator such as
//! `https://github.com/acme/widgets/commit/abc123`. The locator's first two
//! path segments name the owner and repository; everything after them is
//! ignored.

use url::Url;

use crate::{
    ArtifactRevision, CommitSha, RepositoryHost, RepositoryName, RepositoryOwner,
    RevisionParseError,
};

/// The commit a status report is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionLocation {
    pub host: RepositoryHost,
    pub owner: RepositoryOwner,
    pub repository: RepositoryName,
    pub commit: CommitSha,
}

impl RevisionLocation {
    /// Resolves the commit from a source artifact.
    pub fn from_artifact(artifact: &ArtifactRevision) -> Result<Self, RevisionParseError> {
        let commit = CommitSha::new(artifact.revision_id.trim())
            .ok_or(RevisionParseError::MissingRevisionId)?;
        Self::parse(&artifact.revision_url, commit)
    }

    /// Parses `locator` and attaches `commit`.
    pub fn parse(locator: &str, commit: CommitSha) -> Result<Self, RevisionParseError> {
        let malformed = |reason: String| RevisionParseError::MalformedRevisionUrl {
            url: locator.to_string(),
            reason,
        };

        let url = Url::parse(locator).map_err(|e| malformed(e.to_string()))?;
        let host = url
            .host_str()
            .and_then(RepositoryHost::new)
            .ok_or_else(|| malformed("no host".to_string()))?;

        // Path segments: [0] is empty (leading slash), [1] owner, [2] repository.
        let segments: Vec<&str> = url.path().split('/').collect();
        let underspecified = || RevisionParseError::UnderspecifiedRevisionPath {
            path: url.path().to_string(),
        };
        if segments.len() < 3 {
            return Err(underspecified());
        }
        let owner = RepositoryOwner::new(segments[1]).ok_or_else(underspecified)?;
        let repository = RepositoryName::new(segments[2]).ok_or_else(underspecified)?;

        Ok(Self {
            host,
            owner,
            repository,
            commit,
        })
    }

    /// Host of the provider's REST API (`api.<host>`).
    pub fn api_host(&self) -> String {
        format!("api.{}", self.host)
    }

    /// Path of the commit status resource on the provider's REST API.
    pub fn statuses_path(&self) -> String {
        format!(
            "/repos/{}/{}/statuses/{}",
            self.owner, self.repository, self.commit
        )
    }

    /// Full commit status endpoint, `https://api.<host>/repos/{owner}/{repo}/statuses/{commit}`.
    pub fn statuses_url(&self) -> String {
        format!("https://{}{}", self.api_host(), self.statuses_path())
    }
}
