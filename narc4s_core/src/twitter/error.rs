use chrono::{DateTime, Duration, Utc};
use std::fmt;
use thiserror::Error;

/// Minutes assumed when the upstream does not say when the window resets
pub const DEFAULT_RATE_LIMIT_WINDOW_MINUTES: i64 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitReset {
    pub reset_at: DateTime<Utc>,
    pub wait_minutes: i64,
}

impl RateLimitReset {
    /// Build from the `x-rate-limit-reset` header value (unix seconds).
    pub fn from_reset_header(reset: Option<i64>, now: DateTime<Utc>) -> Self {
        let reset_at = reset
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .unwrap_or_else(|| now + Duration::minutes(DEFAULT_RATE_LIMIT_WINDOW_MINUTES));

        let remaining_secs = (reset_at - now).num_seconds();
        let wait_minutes = ((remaining_secs + 59).div_euclid(60)).max(1);

        Self {
            reset_at,
            wait_minutes,
        }
    }
}

impl fmt::Display for RateLimitReset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Twitter API rate limit exceeded. Please wait {} minutes and try again. Reset time: {} UTC",
            self.wait_minutes,
            self.reset_at.format("%H:%M:%S")
        )
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    RateLimited(RateLimitReset),
    #[error("Twitter API error: {0}")]
    Upstream(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Upstream(format!("request timed out: {}", err))
        } else {
            FetchError::Upstream(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_reset_from_header() {
        let reset = RateLimitReset::from_reset_header(Some(1_700_000_000 + 301), now());
        assert_eq!(reset.wait_minutes, 6);
        assert_eq!(reset.reset_at.timestamp(), 1_700_000_301);
    }

    #[test]
    fn test_reset_falls_back_to_fifteen_minutes() {
        let reset = RateLimitReset::from_reset_header(None, now());
        assert_eq!(reset.wait_minutes, 15);
        assert_eq!(reset.reset_at, now() + Duration::minutes(15));
    }

    #[test]
    fn test_reset_in_the_past_still_waits_a_minute() {
        let reset = RateLimitReset::from_reset_header(Some(1_699_999_000), now());
        assert_eq!(reset.wait_minutes, 1);
    }

    #[test]
    fn test_rate_limit_message() {
        // 1_700_000_000 is 22:13:20 UTC
        let reset = RateLimitReset::from_reset_header(None, now());
        let message = FetchError::RateLimited(reset).to_string();
        assert_eq!(
            message,
            "Twitter API rate limit exceeded. Please wait 15 minutes and try again. Reset time: 22:28:20 UTC"
        );
    }
}
