use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{ExternalCall, RagError, RagResult};

/// Run one external call under an optional deadline.
///
/// On expiry the call's future is dropped, which cancels the request, and a
/// `Timeout` error naming the call is returned.
pub(crate) async fn with_deadline<T, F>(
    call: ExternalCall,
    limit: Option<Duration>,
    fut: F,
) -> RagResult<T>
where
    F: Future<Output = RagResult<T>>,
{
    let Some(after) = limit else {
        return fut.await;
    };

    match tokio::time::timeout(after, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(call = %call, ?after, "External call timed out");
            Err(RagError::Timeout { call, after })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::test;

    #[test]
    async fn test_completes_within_deadline() {
        let result = with_deadline(
            ExternalCall::IndexQuery,
            Some(Duration::from_secs(5)),
            async { Ok::<_, RagError>(7) },
        )
        .await;
        assert_eq!(result.unwrap(), 7);
    }

    #[test]
    async fn test_times_out() {
        let result: RagResult<()> = with_deadline(
            ExternalCall::AnswerGeneration,
            Some(Duration::from_millis(10)),
            async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(())
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(RagError::Timeout { call: ExternalCall::AnswerGeneration, .. })
        ));
    }

    #[test]
    async fn test_no_limit_passes_errors_through() {
        let result: RagResult<()> = with_deadline(ExternalCall::QueryEmbedding, None, async {
            Err(RagError::InvalidInput("nope".to_string()))
        })
        .await;
        assert!(result.unwrap_err().is_invalid_input());
    }
}
