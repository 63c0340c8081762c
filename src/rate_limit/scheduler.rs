//! Hits-per-minute request scheduler.
//!
//! One [`RateLimiter`] is owned by each client instance. Cloning the handle shares
//! the same queue and credit window, which is how the JSON and protobuf clients
//! can be metered together.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::TravelTimeError;
use crate::rate_limit::{CREDIT_WINDOW, RateLimitSettings, RateLimitSettingsUpdate};

type BoxedJob = Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send>;

struct QueuedTask {
    job: BoxedJob,
    hits: u32,
}

struct SchedulerState {
    settings: RateLimitSettings,
    queue: VecDeque<QueuedTask>,
    /// Hits admitted during the last minute.
    reserved_hits: u32,
    /// Minimum-spacing timer is running.
    throttle_active: bool,
    /// A dispatched task has not finished yet.
    request_in_progress: bool,
    /// Paused while a 429 backoff is waited out.
    sleeping: bool,
}

impl SchedulerState {
    fn admits(&self, hits: u32) -> bool {
        let limit = self.settings.hits_per_minute;
        if self.reserved_hits.saturating_add(hits) <= limit {
            return true;
        }
        // A task larger than the whole budget can only ever run alone.
        if hits > limit && self.reserved_hits == 0 {
            tracing::warn!(
                hits,
                hits_per_minute = limit,
                "request costs more hits than the per-minute budget; dispatching it alone"
            );
            return true;
        }
        false
    }
}

/// Single-process scheduler enforcing a hits-per-minute ceiling.
///
/// Tasks are dispatched one at a time on the Tokio runtime. The scheduler never
/// fails a task for rate-limit reasons, it only delays it.
///
/// [`RateLimiter::add_and_execute`] must be called from within a Tokio runtime.
#[derive(Clone)]
pub struct RateLimiter {
    state: Arc<Mutex<SchedulerState>>,
}

impl RateLimiter {
    /// Create a new scheduler with the given settings.
    pub fn new(settings: RateLimitSettings) -> Result<Self, TravelTimeError> {
        settings.validate()?;
        Ok(Self {
            state: Arc::new(Mutex::new(SchedulerState {
                settings,
                queue: VecDeque::new(),
                reserved_hits: 0,
                throttle_active: false,
                request_in_progress: false,
                sleeping: false,
            })),
        })
    }

    fn lock(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue `task` and try to advance the scheduler.
    ///
    /// `hits` is the credit the task consumes from the per-minute budget.
    /// Priority tasks are put at the front of the queue. The returned future
    /// resolves with the task's output once it has been dispatched and completed.
    ///
    /// When rate limiting is disabled the task is started immediately.
    pub fn add_and_execute<F, Fut, T>(&self, task: F, hits: u32, priority: bool) -> ScheduledTask<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job: BoxedJob = Box::new(move || {
            Box::pin(async move {
                let output = task().await;
                let _ = tx.send(output);
            })
        });

        {
            let mut state = self.lock();
            if !state.settings.enabled {
                drop(state);
                tokio::spawn(job());
                return ScheduledTask { rx };
            }
            let queued = QueuedTask { job, hits };
            if priority {
                state.queue.push_front(queued);
            } else {
                state.queue.push_back(queued);
            }
            tracing::trace!(hits, priority, queued = state.queue.len(), "task queued");
        }

        self.execute();
        ScheduledTask { rx }
    }

    /// Dispatch the head of the queue if every gate is open.
    fn execute(&self) {
        let (job, hits, spacing) = {
            let mut state = self.lock();
            if state.request_in_progress || state.throttle_active || state.sleeping {
                return;
            }
            let Some(next) = state.queue.pop_front() else {
                return;
            };
            if !state.admits(next.hits) {
                // Head-of-line blocking: nothing behind may overtake.
                state.queue.push_front(next);
                return;
            }

            state.throttle_active = true;
            state.request_in_progress = true;
            state.reserved_hits = state.reserved_hits.saturating_add(next.hits);
            tracing::debug!(
                hits = next.hits,
                reserved = state.reserved_hits,
                queued = state.queue.len(),
                "dispatching task"
            );
            let spacing = state.settings.min_spacing(next.hits);
            (next.job, next.hits, spacing)
        };

        let limiter = self.clone();
        spawn_detached(async move {
            tokio::time::sleep(spacing).await;
            limiter.end_throttle();
        });

        let guard = DispatchGuard {
            limiter: self.clone(),
            hits,
        };
        spawn_detached(async move {
            job().await;
            drop(guard);
        });
    }

    fn end_throttle(&self) {
        let pending = {
            let mut state = self.lock();
            state.throttle_active = false;
            !state.queue.is_empty()
        };
        if pending {
            self.execute();
        }
    }

    fn task_clean_up(&self, hits: u32) {
        let pending = {
            let mut state = self.lock();
            state.request_in_progress = false;
            !state.queue.is_empty()
        };
        if pending {
            self.execute();
        }

        let limiter = self.clone();
        spawn_detached(async move {
            tokio::time::sleep(CREDIT_WINDOW).await;
            {
                let mut state = limiter.lock();
                state.reserved_hits = state.reserved_hits.saturating_sub(hits);
                tracing::trace!(hits, reserved = state.reserved_hits, "credit released");
            }
            limiter.execute();
        });
    }

    /// Whether rate limiting is active.
    pub fn is_enabled(&self) -> bool {
        self.lock().settings.enabled
    }

    /// Current settings.
    pub fn settings(&self) -> RateLimitSettings {
        self.lock().settings.clone()
    }

    /// Merge `update` into the current settings.
    ///
    /// Already queued or running tasks are not re-evaluated.
    pub fn set_rate_limit_settings(
        &self,
        update: &RateLimitSettingsUpdate,
    ) -> Result<(), TravelTimeError> {
        let mut state = self.lock();
        let merged = state.settings.merge(update);
        merged.validate()?;
        state.settings = merged;
        Ok(())
    }

    /// Pause or resume dispatching.
    ///
    /// Used while a `429` backoff is waited out. Resuming re-triggers the queue.
    pub fn set_sleeping(&self, sleeping: bool) {
        self.lock().sleeping = sleeping;
        if !sleeping {
            self.execute();
        }
    }

    /// Whether dispatching is paused.
    pub fn is_sleeping(&self) -> bool {
        self.lock().sleeping
    }

    /// How many times a `429` is retried.
    pub fn retry_count(&self) -> u32 {
        self.lock().settings.retry_count
    }

    /// Wait between a `429` and the next attempt.
    pub fn time_between_retries(&self) -> std::time::Duration {
        self.lock().settings.time_between_retries
    }

    /// Number of tasks waiting for dispatch.
    pub fn queued(&self) -> usize {
        self.lock().queue.len()
    }

    /// Hits currently held in the credit window.
    pub fn reserved_hits(&self) -> u32 {
        self.lock().reserved_hits
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(SchedulerState {
                settings: RateLimitSettings::default(),
                queue: VecDeque::new(),
                reserved_hits: 0,
                throttle_active: false,
                request_in_progress: false,
                sleeping: false,
            })),
        }
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("RateLimiter")
            .field("settings", &state.settings)
            .field("queued", &state.queue.len())
            .field("reserved_hits", &state.reserved_hits)
            .field("throttle_active", &state.throttle_active)
            .field("request_in_progress", &state.request_in_progress)
            .field("sleeping", &state.sleeping)
            .finish()
    }
}

/// Releases the in-flight slot and schedules the credit release, even if the task panics.
struct DispatchGuard {
    limiter: RateLimiter,
    hits: u32,
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        self.limiter.task_clean_up(self.hits);
    }
}

fn spawn_detached<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    // During runtime shutdown there is nothing left to drive.
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        handle.spawn(future);
    }
}

/// Future returned by [`RateLimiter::add_and_execute`].
///
/// Resolves with the task output, or [`TravelTimeError::TaskAborted`] if the
/// task was dropped without completing.
#[must_use = "the task result is lost if the handle is dropped"]
pub struct ScheduledTask<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> Future for ScheduledTask<T> {
    type Output = Result<T, TravelTimeError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.map_err(|_| TravelTimeError::TaskAborted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::Instant;

    fn enabled(hits_per_minute: u32) -> RateLimiter {
        RateLimiter::new(RateLimitSettings {
            enabled: true,
            hits_per_minute,
            ..Default::default()
        })
        .unwrap()
    }

    fn recorder() -> Arc<Mutex<Vec<&'static str>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn record(
        log: &Arc<Mutex<Vec<&'static str>>>,
        name: &'static str,
    ) -> impl FnOnce() -> std::future::Ready<()> + Send + 'static {
        let log = log.clone();
        move || {
            log.lock().unwrap().push(name);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_runs_immediately() {
        let limiter = RateLimiter::default();
        let start = Instant::now();

        let a = limiter.add_and_execute(|| async { 1 }, 1000, false);
        let b = limiter.add_and_execute(|| async { 2 }, 1000, false);

        assert_eq!(a.await.unwrap(), 1);
        assert_eq!(b.await.unwrap(), 2);
        assert_eq!(Instant::now(), start);
        assert_eq!(limiter.queued(), 0);
        assert_eq!(limiter.reserved_hits(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatches_are_spaced() {
        let limiter = enabled(60);
        let start = Instant::now();

        let handles: Vec<_> = (0..3)
            .map(|_| limiter.add_and_execute(|| async { Instant::now() }, 1, false))
            .collect();

        let mut times = Vec::new();
        for handle in handles {
            times.push(handle.await.unwrap() - start);
        }

        assert_eq!(times[0], Duration::ZERO);
        assert!(times[1] >= Duration::from_secs(1));
        assert!(times[2] >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_credit_never_exceeds_budget() {
        let limiter = enabled(3);
        let start = Instant::now();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let probe = limiter.clone();
                limiter.add_and_execute(
                    move || async move { (Instant::now(), probe.reserved_hits()) },
                    1,
                    false,
                )
            })
            .collect();

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }

        for (_, reserved) in &results {
            assert!(*reserved <= 3);
        }
        // The fourth hit only fits once the first one leaves the window.
        assert!(results[3].0 - start >= CREDIT_WINDOW);
    }

    #[tokio::test(start_paused = true)]
    async fn test_credit_is_released_after_window() {
        let limiter = enabled(10);
        limiter
            .add_and_execute(|| async {}, 4, false)
            .await
            .unwrap();
        assert_eq!(limiter.reserved_hits(), 4);

        tokio::time::sleep(CREDIT_WINDOW + Duration::from_millis(1)).await;
        assert_eq!(limiter.reserved_hits(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_priority_jumps_queue() {
        let limiter = enabled(6000);
        let log = recorder();

        limiter.set_sleeping(true);
        let a = limiter.add_and_execute(record(&log, "a"), 1, false);
        let b = limiter.add_and_execute(record(&log, "b"), 1, false);
        let retry = limiter.add_and_execute(record(&log, "retry"), 1, true);
        assert_eq!(limiter.queued(), 3);
        limiter.set_sleeping(false);

        a.await.unwrap();
        b.await.unwrap();
        retry.await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["retry", "a", "b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_head_of_line_blocking() {
        let limiter = enabled(3);
        let log = recorder();

        let big = limiter.add_and_execute(record(&log, "three"), 3, false);
        let medium = limiter.add_and_execute(record(&log, "two"), 2, false);
        let small = limiter.add_and_execute(record(&log, "one"), 1, false);

        big.await.unwrap();
        medium.await.unwrap();
        small.await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["three", "two", "one"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleeping_pauses_dispatch() {
        let limiter = enabled(6000);
        limiter.set_sleeping(true);
        let task = limiter.add_and_execute(|| async { "done" }, 1, false);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(limiter.queued(), 1);
        assert_eq!(limiter.reserved_hits(), 0);

        limiter.set_sleeping(false);
        assert_eq!(task.await.unwrap(), "done");
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_failure_propagates_and_queue_advances() {
        let limiter = enabled(6000);

        let failing =
            limiter.add_and_execute(|| async { Err::<u32, &str>("boom") }, 1, false);
        let next = limiter.add_and_execute(|| async { Ok::<u32, &str>(7) }, 1, false);

        assert_eq!(failing.await.unwrap(), Err("boom"));
        assert_eq!(next.await.unwrap(), Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_oversized_task_runs_alone() {
        let limiter = enabled(2);
        let result = limiter.add_and_execute(|| async { "big" }, 5, false).await;
        assert_eq!(result.unwrap(), "big");
        assert_eq!(limiter.reserved_hits(), 5);
    }

    #[tokio::test]
    async fn test_settings_update_merges() {
        let limiter = RateLimiter::default();
        limiter
            .set_rate_limit_settings(&RateLimitSettingsUpdate::default().enabled(true))
            .unwrap();
        assert!(limiter.is_enabled());
        assert_eq!(limiter.settings().hits_per_minute, 60);

        let err = limiter
            .set_rate_limit_settings(&RateLimitSettingsUpdate::default().hits_per_minute(0))
            .unwrap_err();
        assert!(matches!(err, TravelTimeError::Config(_)));
        assert_eq!(limiter.settings().hits_per_minute, 60);
    }

    #[test]
    fn test_zero_budget_rejected() {
        let result = RateLimiter::new(RateLimitSettings {
            hits_per_minute: 0,
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
