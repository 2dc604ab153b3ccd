//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap upstream attempts with a deadline
//! - Cancel the attempt cleanly on timeout (the future is dropped)
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - The deadline covers sending the request and buffering the whole body
//! - Timeout errors are distinct from other errors

use std::future::Future;
use std::time::Duration;

use tokio::time;

/// Run `attempt` under `limit`, mapping an elapsed deadline through `on_timeout`.
pub async fn with_deadline<F, T, E>(
    limit: Duration,
    attempt: F,
    on_timeout: impl FnOnce(Duration) -> E,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    match time::timeout(limit, attempt).await {
        Ok(result) => result,
        Err(_) => Err(on_timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_finishes_in_time() {
        let result: Result<u8, String> =
            with_deadline(Duration::from_millis(200), async { Ok(7) }, |_| "late".into()).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn test_elapsed_deadline() {
        let result: Result<u8, String> = with_deadline(
            Duration::from_millis(20),
            async {
                time::sleep(Duration::from_secs(5)).await;
                Ok(7)
            },
            |limit| format!("timed out after {}ms", limit.as_millis()),
        )
        .await;
        assert_eq!(result, Err("timed out after 20ms".to_string()));
    }
}
