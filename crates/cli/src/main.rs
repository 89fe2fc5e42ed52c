//! codepipeline-status entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Wire observability** — JSON `tracing-subscriber` output plus an
//!    optional OpenTelemetry OTLP exporter (see [`telemetry`]).
//! 2. **Read process settings** — trigger mode, timeouts, GitHub API base
//!    (see [`settings`]).
//! 3. **Construct infrastructure** — one AWS SDK configuration, the
//!    CodePipeline and KMS capabilities built from it, and the GitHub status
//!    client, all injected into a [`relay::StatusRelay`] that lives for the
//!    whole process.
//! 4. **Select trigger mode** — based on [`settings::TriggerMode`]:
//!    - `Lambda` — run the Lambda runtime loop, one relay invocation per event.
//!    - `SingleShot` — read one event from a file or stdin and process it.
//!
//! The relay configuration (`AWS_REGION`, `GITHUB_ACCESS_TOKEN`,
//! `APPLICATION_STAGE_NAME`) is read fresh on every invocation.

mod settings;
mod telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};
use github::{GitHubClientConfig, GitHubStatusClient};
use pipeline::{IncomingEvent, InvocationId, RawConfiguration, RelayError};
use relay::{InvocationContext, RelayOutcome, StatusRelay};
use settings::{RuntimeSettings, TriggerMode};
use telemetry::Telemetry;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = Telemetry::init()?;
    let result = run(&telemetry).await;
    if let Err(e) = &result {
        tracing::error!(error = %format!("{e:#}"), "codepipeline-status exited with an error");
    }
    telemetry.shutdown();
    result
}

async fn run(telemetry: &Telemetry) -> Result<()> {
    let settings = RuntimeSettings::from_env(std::env::args().skip(1))?;
    info!(mode = ?settings.mode, "starting codepipeline-status");
    let relay = build_relay(&settings).await?;

    match settings.mode {
        TriggerMode::Lambda => {
            listener::lambda::run(|event, ctx| {
                let relay = relay.clone();
                async move {
                    let result = handle(&relay, event, ctx).await;
                    telemetry.flush();
                    result
                }
            })
            .await?;
        }
        TriggerMode::SingleShot => {
            let event = listener::single_shot::load_event(settings.event_file.as_deref())
                .context("loading event")?;
            let ctx =
                InvocationContext::new(InvocationId::new_random()).with_timeout(settings.timeout);
            handle(&relay, event, ctx).await?;
        }
    }
    Ok(())
}

async fn build_relay(settings: &RuntimeSettings) -> Result<StatusRelay> {
    let sdk_config = aws::load_sdk_config(std::env::var(pipeline::config::REGION_KEY).ok()).await;
    let (lookup, decryptor) = aws::capabilities(&sdk_config);
    let publisher = GitHubStatusClient::new(GitHubClientConfig {
        timeout: settings.http_timeout,
        api_base: settings.github_api_base.clone(),
    })
    .context("building GitHub status client")?;

    Ok(StatusRelay::new(
        Arc::new(lookup),
        Arc::new(decryptor),
        Arc::new(publisher),
    ))
}

async fn handle(
    relay: &StatusRelay,
    event: IncomingEvent,
    ctx: InvocationContext,
) -> Result<(), RelayError> {
    match relay.process(event, RawConfiguration::from_env(), &ctx).await? {
        RelayOutcome::Reported { location, state } => info!(
            invocation_id = %ctx.invocation_id(),
            owner = %location.owner,
            repository = %location.repository,
            commit = %location.commit,
            %state,
            "invocation complete"
        ),
        RelayOutcome::SkippedNoSourceArtifact {
            pipeline,
            execution_id,
        } => info!(
            invocation_id = %ctx.invocation_id(),
            %pipeline,
            %execution_id,
            "invocation complete, nothing to report"
        ),
    }
    Ok(())
}
