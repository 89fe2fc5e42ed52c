//! Process-level settings read once at start-up.
//!
//! The relay's own configuration (`AWS_REGION`, `GITHUB_ACCESS_TOKEN`,
//! `APPLICATION_STAGE_NAME`) is not read here: it is re-read on every
//! invocation by [`pipeline::RawConfiguration::from_env`].

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const MODE_KEY: &str = "RELAY_MODE";
const EVENT_FILE_KEY: &str = "RELAY_EVENT_FILE";
const TIMEOUT_KEY: &str = "RELAY_TIMEOUT_SECS";
const HTTP_TIMEOUT_KEY: &str = "GITHUB_HTTP_TIMEOUT_SECS";
const API_BASE_KEY: &str = "GITHUB_API_BASE";
/// Set by the Lambda execution environment.
const LAMBDA_RUNTIME_KEY: &str = "AWS_LAMBDA_RUNTIME_API";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Upper bound accepted for either timeout setting.
const MAX_TIMEOUT_SECS: u64 = 24 * 60 * 60;

/// How events reach the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMode {
    /// AWS Lambda runtime loop.
    Lambda,
    /// One event from a file or stdin, then exit.
    SingleShot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSettings {
    pub mode: TriggerMode,
    /// Single-shot input; `None` reads stdin.
    pub event_file: Option<PathBuf>,
    /// Single-shot invocation deadline.
    pub timeout: Duration,
    pub http_timeout: Duration,
    pub github_api_base: Option<String>,
}

impl RuntimeSettings {
    /// Reads settings from the environment; the first positional argument, if
    /// any, overrides `RELAY_EVENT_FILE`.
    pub fn from_env(args: impl IntoIterator<Item = String>) -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), args)
    }

    pub fn from_lookup<F>(lookup: F, args: impl IntoIterator<Item = String>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = match lookup(MODE_KEY).as_deref() {
            Some("lambda") => TriggerMode::Lambda,
            Some("single-shot") => TriggerMode::SingleShot,
            Some(other) => bail!("{MODE_KEY} must be 'lambda' or 'single-shot', got '{other}'"),
            None if lookup(LAMBDA_RUNTIME_KEY).is_some() => TriggerMode::Lambda,
            None => TriggerMode::SingleShot,
        };

        let event_file = args
            .into_iter()
            .next()
            .or_else(|| lookup(EVENT_FILE_KEY))
            .map(PathBuf::from);

        Ok(Self {
            mode,
            event_file,
            timeout: seconds(&lookup, TIMEOUT_KEY)?.unwrap_or(DEFAULT_TIMEOUT),
            http_timeout: seconds(&lookup, HTTP_TIMEOUT_KEY)?.unwrap_or(github::DEFAULT_TIMEOUT),
            github_api_base: lookup(API_BASE_KEY).filter(|base| !base.is_empty()),
        })
    }
}

fn seconds<F>(lookup: &F, key: &str) -> Result<Option<Duration>>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| -> Result<Duration> {
            let secs = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{key} must be a whole number of seconds, got '{raw}'"))?;
            if !(1..=MAX_TIMEOUT_SECS).contains(&secs) {
                bail!("{key} must be between 1 and {MAX_TIMEOUT_SECS} seconds, got {secs}");
            }
            Ok(Duration::from_secs(secs))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)], args: &[&str]) -> Result<RuntimeSettings> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RuntimeSettings::from_lookup(
            |key| env.get(key).cloned(),
            args.iter().map(|a| a.to_string()),
        )
    }

    #[test]
    fn defaults_to_single_shot_from_stdin() {
        let s = settings(&[], &[]).unwrap();
        assert_eq!(s.mode, TriggerMode::SingleShot);
        assert_eq!(s.event_file, None);
        assert_eq!(s.timeout, DEFAULT_TIMEOUT);
        assert_eq!(s.http_timeout, github::DEFAULT_TIMEOUT);
        assert_eq!(s.github_api_base, None);
    }

    #[test]
    fn lambda_environment_selects_lambda_mode() {
        let s = settings(&[(LAMBDA_RUNTIME_KEY, "127.0.0.1:9001")], &[]).unwrap();
        assert_eq!(s.mode, TriggerMode::Lambda);
    }

    #[test]
    fn explicit_mode_wins() {
        let s = settings(
            &[(LAMBDA_RUNTIME_KEY, "127.0.0.1:9001"), (MODE_KEY, "single-shot")],
            &[],
        )
        .unwrap();
        assert_eq!(s.mode, TriggerMode::SingleShot);
        assert!(settings(&[(MODE_KEY, "daemon")], &[]).is_err());
    }

    #[test]
    fn argument_overrides_event_file_setting() {
        let s = settings(&[(EVENT_FILE_KEY, "from-env.json")], &["from-arg.json"]).unwrap();
        assert_eq!(s.event_file, Some(PathBuf::from("from-arg.json")));

        let s = settings(&[(EVENT_FILE_KEY, "from-env.json")], &[]).unwrap();
        assert_eq!(s.event_file, Some(PathBuf::from("from-env.json")));
    }

    #[test]
    fn timeouts_are_whole_seconds() {
        let s = settings(&[(TIMEOUT_KEY, "5"), (HTTP_TIMEOUT_KEY, " 2 ")], &[]).unwrap();
        assert_eq!(s.timeout, Duration::from_secs(5));
        assert_eq!(s.http_timeout, Duration::from_secs(2));

        let err = settings(&[(TIMEOUT_KEY, "1.5")], &[]).unwrap_err();
        assert!(err.to_string().contains(TIMEOUT_KEY));
    }

    #[test]
    fn out_of_range_timeouts_are_rejected() {
        let err = settings(&[(TIMEOUT_KEY, u64::MAX.to_string().as_str())], &[]).unwrap_err();
        assert!(err.to_string().contains(TIMEOUT_KEY));

        let err = settings(&[(HTTP_TIMEOUT_KEY, "0")], &[]).unwrap_err();
        assert!(err.to_string().contains(HTTP_TIMEOUT_KEY));

        let err = settings(&[(TIMEOUT_KEY, "0")], &[]).unwrap_err();
        assert!(err.to_string().contains(TIMEOUT_KEY));

        let s = settings(&[(TIMEOUT_KEY, MAX_TIMEOUT_SECS.to_string().as_str())], &[]).unwrap();
        assert_eq!(s.timeout, Duration::from_secs(MAX_TIMEOUT_SECS));
    }
}
