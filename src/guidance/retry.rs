use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bounded polling: at most `max_attempts` checks, `interval_ms` apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 10, interval_ms: 100 }
    }
}

/// Poll `check` until it yields a value or the attempts run out.
pub async fn poll_until<T, F>(policy: RetryPolicy, mut check: F) -> Option<T>
where
    F: FnMut() -> Option<T>,
{
    let attempts = policy.max_attempts.max(1);
    for attempt in 1..=attempts {
        if let Some(value) = check() {
            return Some(value);
        }
        if attempt < attempts {
            tokio::time::sleep(Duration::from_millis(policy.interval_ms)).await;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_later_attempt() {
        let mut calls = 0;
        let result = poll_until(RetryPolicy::default(), || {
            calls += 1;
            (calls == 3).then_some("ready")
        })
        .await;
        assert_eq!(result, Some("ready"));
        assert_eq!(calls, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let mut calls = 0;
        let start = tokio::time::Instant::now();
        let result: Option<()> = poll_until(RetryPolicy { max_attempts: 4, interval_ms: 50 }, || {
            calls += 1;
            None
        })
        .await;
        assert!(result.is_none());
        assert_eq!(calls, 4);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(150));
        assert!(elapsed < Duration::from_millis(200));
    }
}
