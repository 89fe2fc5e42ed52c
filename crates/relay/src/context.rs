//! Per-invocation context: correlation id and deadline.

use std::future::Future;
use std::time::Duration;

use pipeline::{InvocationId, IoStage, RelayError};
use tokio::time::Instant;

/// Threaded through every I/O-performing stage of one invocation.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    invocation_id: InvocationId,
    deadline: Option<Instant>,
}

impl InvocationContext {
    /// A context with no deadline.
    pub fn new(invocation_id: InvocationId) -> Self {
        Self {
            invocation_id,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the deadline `timeout` from now. A timeout too large to represent
    /// leaves the context unbounded.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    pub fn invocation_id(&self) -> InvocationId {
        self.invocation_id
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; `None` when unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Runs `fut` under the deadline, converting its error into a [`RelayError`].
    pub async fn bounded<F, T, E>(&self, stage: IoStage, fut: F) -> Result<T, RelayError>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<RelayError>,
    {
        match self.deadline {
            None => fut.await.map_err(Into::into),
            Some(deadline) => match tokio::time::timeout_at(deadline, fut).await {
                Ok(result) => result.map_err(Into::into),
                Err(_) => Err(RelayError::DeadlineExceeded { stage }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::LookupError;

    #[tokio::test]
    async fn unbounded_context_passes_results_through() {
        let ctx = InvocationContext::new(InvocationId::new_random());
        assert!(ctx.remaining().is_none());

        let ok: Result<u8, RelayError> = ctx
            .bounded(IoStage::Lookup, async { Ok::<_, LookupError>(7) })
            .await;
        assert_eq!(ok.unwrap(), 7);

        let err = ctx
            .bounded(IoStage::Lookup, async {
                Err::<u8, _>(LookupError::EmptyExecutionResponse)
            })
            .await
            .unwrap_err();
        assert_eq!(err, RelayError::Lookup(LookupError::EmptyExecutionResponse));
    }

    #[tokio::test]
    async fn unrepresentable_timeout_leaves_context_unbounded() {
        let ctx = InvocationContext::new(InvocationId::new_random())
            .with_timeout(Duration::from_secs(u64::MAX));
        assert!(ctx.deadline().is_none());

        let ok = ctx
            .bounded(IoStage::Decrypt, async { Ok::<_, LookupError>("plaintext") })
            .await;
        assert_eq!(ok.unwrap(), "plaintext");
    }

    #[tokio::test(start_paused = true)]
    async fn stage_past_deadline_fails_with_its_name() {
        let ctx = InvocationContext::new(InvocationId::new_random())
            .with_timeout(Duration::from_millis(50));

        let err = ctx
            .bounded(IoStage::Deliver, async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, LookupError>(())
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RelayError::DeadlineExceeded {
                stage: IoStage::Deliver
            }
        );
    }
}
