//! Rate limiting for the TravelTime API.
//!
//! TravelTime accounts usage in "hits" per minute. A single request can cost
//! several hits: every departure/arrival search inside the body counts as one.
//! This module provides a per-client scheduler that keeps outbound requests under
//! the plan's hits-per-minute ceiling.
//!
//! ## How it works
//!
//! - Requests are queued in FIFO order; 429 retries jump to the front.
//! - A request is admitted only if its hits fit into the credit still available
//!   in the current one-minute window. Admitted hits are given back 60 seconds
//!   after admission.
//! - At most one request is dispatched at a time, and consecutive dispatches are
//!   spaced by `hits * 60s / hits_per_minute`.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use traveltime_api_client::rate_limit::{RateLimitSettings, RateLimiter};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let limiter = RateLimiter::new(RateLimitSettings {
//!     enabled: true,
//!     hits_per_minute: 120,
//!     ..Default::default()
//! })?;
//!
//! let answer = limiter.add_and_execute(|| async { 42 }, 1, false).await?;
//! assert_eq!(answer, 42);
//! # Ok(())
//! # }
//! ```

mod scheduler;

pub use scheduler::{RateLimiter, ScheduledTask};

use std::time::Duration;

use crate::error::TravelTimeError;

/// Length of the credit window. Admitted hits are released this long after admission.
pub const CREDIT_WINDOW: Duration = Duration::from_secs(60);

/// Rate limiter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitSettings {
    /// Whether to enable rate limiting.
    pub enabled: bool,
    /// Hits allowed per minute by the API plan.
    pub hits_per_minute: u32,
    /// How many times a request is repeated when the API returns `429`.
    pub retry_count: u32,
    /// Wait between a `429` and the next attempt.
    pub time_between_retries: Duration,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            hits_per_minute: 60,
            retry_count: 3,
            time_between_retries: Duration::from_millis(1000),
        }
    }
}

impl RateLimitSettings {
    /// Check that the settings can drive the scheduler.
    pub fn validate(&self) -> Result<(), TravelTimeError> {
        if self.hits_per_minute == 0 {
            return Err(TravelTimeError::Config(
                "hits_per_minute must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Merge a partial update into these settings.
    pub fn merge(&self, update: &RateLimitSettingsUpdate) -> Self {
        Self {
            enabled: update.enabled.unwrap_or(self.enabled),
            hits_per_minute: update.hits_per_minute.unwrap_or(self.hits_per_minute),
            retry_count: update.retry_count.unwrap_or(self.retry_count),
            time_between_retries: update
                .time_between_retries
                .unwrap_or(self.time_between_retries),
        }
    }

    /// Minimum spacing enforced after dispatching a request that costs `hits`.
    pub fn min_spacing(&self, hits: u32) -> Duration {
        let per_minute = u64::from(self.hits_per_minute.max(1));
        let millis = CREDIT_WINDOW.as_millis() as u64 * u64::from(hits) / per_minute;
        Duration::from_millis(millis)
    }
}

/// Partial update for [`RateLimitSettings`]. `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitSettingsUpdate {
    /// New enabled flag.
    pub enabled: Option<bool>,
    /// New hits-per-minute ceiling.
    pub hits_per_minute: Option<u32>,
    /// New retry count.
    pub retry_count: Option<u32>,
    /// New wait between retries.
    pub time_between_retries: Option<Duration>,
}

impl RateLimitSettingsUpdate {
    /// Set the enabled flag.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Set the hits-per-minute ceiling.
    pub fn hits_per_minute(mut self, hits: u32) -> Self {
        self.hits_per_minute = Some(hits);
        self
    }

    /// Set the retry count.
    pub fn retry_count(mut self, count: u32) -> Self {
        self.retry_count = Some(count);
        self
    }

    /// Set the wait between retries.
    pub fn time_between_retries(mut self, wait: Duration) -> Self {
        self.time_between_retries = Some(wait);
        self
    }
}

impl From<RateLimitSettings> for RateLimitSettingsUpdate {
    fn from(settings: RateLimitSettings) -> Self {
        Self {
            enabled: Some(settings.enabled),
            hits_per_minute: Some(settings.hits_per_minute),
            retry_count: Some(settings.retry_count),
            time_between_retries: Some(settings.time_between_retries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = RateLimitSettings::default();
        assert!(!settings.enabled);
        assert_eq!(settings.hits_per_minute, 60);
        assert_eq!(settings.retry_count, 3);
        assert_eq!(settings.time_between_retries, Duration::from_secs(1));
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let base = RateLimitSettings::default();
        let merged = base.merge(&RateLimitSettingsUpdate::default().hits_per_minute(300));
        assert_eq!(merged.hits_per_minute, 300);
        assert_eq!(merged.retry_count, base.retry_count);
        assert_eq!(merged.enabled, base.enabled);
    }

    #[test]
    fn test_zero_hits_per_minute_rejected() {
        let settings = RateLimitSettings {
            hits_per_minute: 0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(TravelTimeError::Config(_))));
    }

    #[test]
    fn test_min_spacing_scales_with_hits() {
        let settings = RateLimitSettings {
            hits_per_minute: 120,
            ..Default::default()
        };
        assert_eq!(settings.min_spacing(1), Duration::from_millis(500));
        assert_eq!(settings.min_spacing(4), Duration::from_secs(2));
        assert_eq!(settings.min_spacing(0), Duration::ZERO);
    }
}
