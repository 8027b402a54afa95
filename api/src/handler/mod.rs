use std::future::Future;
use std::time::Duration;

use shared::error::{AppError, AppResult};

pub mod event;
pub mod health;
pub mod user;

/// Bounds one repository call by the configured per-request deadline.
/// The caller sees a timeout status; work already handed to the backend
/// is not guaranteed to be cancelled there.
async fn with_timeout<T>(
    operation: &str,
    limit: Duration,
    fut: impl Future<Output = AppResult<T>>,
) -> AppResult<T> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!("Timeout while calling {operation}().");
            Err(AppError::RequestTimeout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_passes_results_through() {
        let res = with_timeout("noop", Duration::from_secs(1), async { Ok(42) }).await;
        assert_eq!(res.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_with_timeout_maps_elapsed_deadline() {
        let res: AppResult<()> = with_timeout("slow", Duration::from_millis(5), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .await;
        assert!(matches!(res, Err(AppError::RequestTimeout)));
    }
}
