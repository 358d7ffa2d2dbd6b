use log::debug;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

/// Spaces out requests with a uniformly-random delay to respect the
/// remote service's informal rate limits.
pub struct RateLimiter {
    min_delay: Duration,
    max_delay: Duration,
    request_count: usize,
}

impl RateLimiter {
    pub fn new(min_delay_secs: f64, max_delay_secs: f64) -> Self {
        let min = min_delay_secs.max(0.0);
        let max = max_delay_secs.max(min);
        Self {
            min_delay: Duration::from_secs_f64(min),
            max_delay: Duration::from_secs_f64(max),
            request_count: 0,
        }
    }

    /// Sleep before every request except the first.
    pub async fn wait(&mut self) {
        if self.should_wait() {
            self.apply_delay().await;
        }
        self.increment();
    }

    fn should_wait(&self) -> bool {
        self.request_count > 0
    }

    async fn apply_delay(&self) {
        let delay = self.sample_delay();
        debug!("Sleeping for {:.2} seconds", delay.as_secs_f64());
        sleep(delay).await;
    }

    fn sample_delay(&self) -> Duration {
        if self.max_delay <= self.min_delay {
            return self.min_delay;
        }
        let span = (self.max_delay - self.min_delay).as_secs_f64();
        let jitter = rand::rng().random_range(0.0..=span);
        self.min_delay + Duration::from_secs_f64(jitter)
    }

    fn increment(&mut self) {
        self.request_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_never_waits() {
        let limiter = RateLimiter::new(2.0, 5.0);
        assert!(!limiter.should_wait());
    }

    #[test]
    fn sampled_delay_stays_within_bounds() {
        let limiter = RateLimiter::new(1.0, 3.0);
        for _ in 0..50 {
            let d = limiter.sample_delay();
            assert!(d >= Duration::from_secs(1));
            assert!(d <= Duration::from_secs(3));
        }
    }

    #[test]
    fn inverted_bounds_collapse_to_min() {
        let limiter = RateLimiter::new(5.0, 1.0);
        assert_eq!(limiter.sample_delay(), Duration::from_secs(5));
    }
}
