//! All-settled batch execution.
//!
//! Every item of a batch is sent independently; a failing item never aborts its
//! siblings. Results keep the input order.

use std::future::Future;

use futures_util::future::join_all;

use crate::error::TravelTimeError;

/// Outcome of one item of a batch call.
#[derive(Debug)]
pub enum BatchResponse<T> {
    /// The request succeeded.
    Success(T),
    /// The request failed.
    Error(TravelTimeError),
}

impl<T> BatchResponse<T> {
    /// Check if this item succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, BatchResponse::Success(_))
    }

    /// Check if this item failed.
    pub fn is_error(&self) -> bool {
        matches!(self, BatchResponse::Error(_))
    }

    /// Borrow the response body if this item succeeded.
    pub fn success(&self) -> Option<&T> {
        match self {
            BatchResponse::Success(body) => Some(body),
            BatchResponse::Error(_) => None,
        }
    }

    /// Borrow the error if this item failed.
    pub fn error(&self) -> Option<&TravelTimeError> {
        match self {
            BatchResponse::Success(_) => None,
            BatchResponse::Error(error) => Some(error),
        }
    }

    /// Convert into a `Result`.
    pub fn into_result(self) -> Result<T, TravelTimeError> {
        match self {
            BatchResponse::Success(body) => Ok(body),
            BatchResponse::Error(error) => Err(error),
        }
    }
}

impl<T> From<Result<T, TravelTimeError>> for BatchResponse<T> {
    fn from(result: Result<T, TravelTimeError>) -> Self {
        match result {
            Ok(body) => BatchResponse::Success(body),
            Err(error) => BatchResponse::Error(error),
        }
    }
}

/// Run `request` for every item and collect every outcome.
///
/// With `chunk_size` set, items run in waves of that size and each wave settles
/// completely before the next one starts. `None` or `Some(0)` runs everything
/// at once.
pub async fn execute_batch<I, F, Fut, T>(
    items: I,
    mut request: F,
    chunk_size: Option<usize>,
) -> Vec<BatchResponse<T>>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<T, TravelTimeError>>,
{
    let futures: Vec<Fut> = items.into_iter().map(&mut request).collect();

    let wave = match chunk_size {
        Some(size) if size > 0 => size,
        _ => futures.len().max(1),
    };

    let mut results = Vec::with_capacity(futures.len());
    let mut pending = futures.into_iter().peekable();
    while pending.peek().is_some() {
        let chunk: Vec<Fut> = pending.by_ref().take(wave).collect();
        tracing::trace!(size = chunk.len(), "running batch wave");
        results.extend(join_all(chunk).await.into_iter().map(BatchResponse::from));
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_partial_failure_preserves_order() {
        let results = execute_batch(
            vec![1, 2, 3],
            |n| async move {
                if n == 2 {
                    Err(TravelTimeError::InvalidResponse("boom".into()))
                } else {
                    Ok(n * 10)
                }
            },
            None,
        )
        .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].success(), Some(&10));
        assert!(results[1].is_error());
        assert_eq!(results[2].success(), Some(&30));
        assert_eq!(results.iter().filter(|r| r.is_error()).count(), 1);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let results: Vec<BatchResponse<u32>> =
            execute_batch(Vec::<u32>::new(), |n| async move { Ok(n) }, Some(2)).await;
        assert!(results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_waves_settle_before_next_starts() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let results = execute_batch(
            0..5u64,
            |n| {
                let in_flight = in_flight.clone();
                let peak = peak.clone();
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10 * (5 - n))).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    if n == 0 {
                        Err(TravelTimeError::TaskAborted)
                    } else {
                        Ok(n)
                    }
                }
            },
            Some(2),
        )
        .await;

        assert_eq!(peak.load(Ordering::SeqCst), 2);
        assert!(results[0].is_error());
        let values: Vec<u64> = results.iter().filter_map(|r| r.success().copied()).collect();
        assert_eq!(values, vec![1, 2, 3, 4]);
    }
}
