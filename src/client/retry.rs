//! Bounded backoff schedule for throttled and failing requests.

use core::time::Duration;

/// Default delays between attempts: 1 s, 2 s, 5 s, 10 s, 30 s.
const DEFAULT_DELAYS_MS: [u64; 5] = [1_000, 2_000, 5_000, 10_000, 30_000];

/// How often and how long to wait before retrying a rate-limited (429)
/// or failing (5xx) request.
///
/// A request is retried at most [`RetryPolicy::max_retries`] times; the
/// n-th retry waits `delays[n]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before each retry, in order.
    delays: Vec<Duration>,
}

impl Default for RetryPolicy {
    #[inline]
    fn default() -> Self {
        Self {
            delays: DEFAULT_DELAYS_MS
                .iter()
                .copied()
                .map(Duration::from_millis)
                .collect(),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given delay table.
    #[inline]
    #[must_use]
    pub const fn new(delays: Vec<Duration>) -> Self {
        Self { delays }
    }

    /// A policy that never retries.
    #[inline]
    #[must_use]
    pub const fn none() -> Self {
        Self { delays: Vec::new() }
    }

    /// The delay table.
    #[inline]
    #[must_use]
    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    /// Maximum number of retries after the first attempt.
    #[inline]
    #[must_use]
    pub fn max_retries(&self) -> usize {
        self.delays.len()
    }

    /// Delay before retry number `retry` (0-based), or `None` once the
    /// schedule is exhausted.
    #[inline]
    #[must_use]
    pub fn delay_for(&self, retry: usize) -> Option<Duration> {
        self.delays.get(retry).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries(), 5);
        assert_eq!(policy.delay_for(0), Some(Duration::from_secs(1)));
        assert_eq!(policy.delay_for(4), Some(Duration::from_secs(30)));
        assert_eq!(policy.delay_for(5), None);
    }

    #[test]
    fn none_never_retries() {
        let policy = RetryPolicy::none();
        assert_eq!(policy.max_retries(), 0);
        assert_eq!(policy.delay_for(0), None);
    }

    #[test]
    fn custom_schedule() {
        let policy = RetryPolicy::new(vec![Duration::from_millis(5); 3]);
        assert_eq!(policy.delays().len(), 3);
        assert_eq!(policy.delay_for(2), Some(Duration::from_millis(5)));
    }
}
