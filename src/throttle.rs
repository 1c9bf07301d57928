//! Rate limiting of outgoing state publishes.

use embassy_time::{Duration, Instant};

/// Default minimum interval between two state publishes of one component.
pub const DEFAULT_THROTTLE: Duration = Duration::from_secs(1);

/// A monotonic publish deadline.
///
/// Nothing is throttled until the first publish; after that, publishes are
/// skipped until `interval` has elapsed since the last accepted one.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    interval: Duration,
    next_publish: Option<Instant>,
}

impl Throttle {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_publish: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Whether a publish is allowed at `now`.
    pub fn is_ready(&self, now: Instant) -> bool {
        match self.next_publish {
            Some(deadline) => now >= deadline,
            None => true,
        }
    }

    /// Record a publish at `now` and push the deadline forward.
    pub fn arm(&mut self, now: Instant) {
        self.next_publish = Some(now + self.interval);
    }

    /// Checks readiness and arms in one step. Returns `false` when throttled.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        if !self.is_ready(now) {
            return false;
        }
        self.arm(now);
        true
    }

    /// The instant after which the next publish is accepted, if any was made.
    pub fn next_publish(&self) -> Option<Instant> {
        self.next_publish
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_publish_is_never_throttled() {
        let throttle = Throttle::new(Duration::from_secs(60));
        assert!(throttle.is_ready(Instant::from_millis(0)));
    }

    #[test]
    fn deadline_delays_until_interval_elapses() {
        let mut throttle = Throttle::new(Duration::from_millis(500));
        let start = Instant::from_millis(1_000);

        assert!(throttle.try_acquire(start));
        assert!(!throttle.try_acquire(start + Duration::from_millis(499)));
        assert!(throttle.try_acquire(start + Duration::from_millis(500)));
        assert_eq!(
            throttle.next_publish(),
            Some(start + Duration::from_millis(1_000))
        );
    }

    #[test]
    fn rejected_attempt_does_not_move_deadline() {
        let mut throttle = Throttle::new(Duration::from_millis(100));
        let start = Instant::from_millis(0);
        throttle.arm(start);
        assert!(!throttle.try_acquire(start + Duration::from_millis(50)));
        assert_eq!(throttle.next_publish(), Some(start + Duration::from_millis(100)));
    }

    #[test]
    fn zero_interval_never_throttles() {
        let mut throttle = Throttle::new(Duration::from_ticks(0));
        let now = Instant::from_millis(10);
        assert!(throttle.try_acquire(now));
        assert!(throttle.try_acquire(now));
    }
}
