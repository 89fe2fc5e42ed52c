//! AWS Lambda event source.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use lambda_runtime::{service_fn, LambdaEvent};
use pipeline::{IncomingEvent, InvocationId, RelayError};
use relay::InvocationContext;
use tracing::warn;

use crate::ListenerError;

/// Builds the invocation context from the runtime's request id and deadline.
///
/// `deadline_ms` is milliseconds since the Unix epoch, as reported by the
/// runtime API.
pub fn invocation_context(request_id: &str, deadline_ms: u64) -> InvocationContext {
    let ctx = InvocationContext::new(InvocationId::from_request_id(request_id));
    let now_ms = Utc::now().timestamp_millis();
    let remaining_ms = i64::try_from(deadline_ms).unwrap_or(i64::MAX) - now_ms;
    ctx.with_timeout(Duration::from_millis(remaining_ms.max(0) as u64))
}

/// Runs the Lambda runtime loop until the runtime shuts the process down.
///
/// Every invocation is passed to `handler`; a handler error is reported back
/// to the runtime as the invocation's error.
pub async fn run<F, Fut>(handler: F) -> Result<(), ListenerError>
where
    F: Fn(IncomingEvent, InvocationContext) -> Fut,
    Fut: Future<Output = Result<(), RelayError>>,
{
    let service = service_fn(|event: LambdaEvent<IncomingEvent>| {
        let ctx = invocation_context(&event.context.request_id, event.context.deadline);
        let fut = handler(event.payload, ctx);
        async move {
            fut.await.map_err(|e| {
                warn!(error = %e, "invocation failed");
                lambda_runtime::Error::from(e)
            })
        }
    });

    lambda_runtime::run(service)
        .await
        .map_err(|e| ListenerError::Runtime(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deadline_in_the_future_bounds_the_invocation() {
        let deadline = (Utc::now().timestamp_millis() + 30_000) as u64;
        let ctx = invocation_context("8476a536-e9f4-11e8-9739-2dfe598c3fcd", deadline);

        assert_eq!(
            ctx.invocation_id().to_string(),
            "8476a536-e9f4-11e8-9739-2dfe598c3fcd"
        );
        let remaining = ctx.remaining().unwrap();
        assert!(remaining <= Duration::from_secs(30));
        assert!(remaining > Duration::from_secs(25));
    }

    #[tokio::test]
    async fn past_deadline_leaves_no_time() {
        let ctx = invocation_context("req", 0);
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }
}
