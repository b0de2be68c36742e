//! Fixed-rate tick pacing

use std::time::{Duration, Instant};

/// Blocks until the next tick boundary
#[derive(Debug)]
pub struct FixedClock {
    period: Duration,
    next: Option<Instant>,
    paced: bool,
}

impl FixedClock {
    /// A clock ticking once every `period`
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next: None,
            paced: true,
        }
    }

    /// A clock that never sleeps (tests, benchmarks)
    pub fn unpaced() -> Self {
        Self {
            period: Duration::ZERO,
            next: None,
            paced: false,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Sleep until the next boundary; returns how long it slept
    pub fn wait(&mut self) -> Duration {
        if !self.paced {
            return Duration::ZERO;
        }

        let now = Instant::now();
        let next = *self.next.get_or_insert(now) + self.period;
        self.next = Some(next);

        if next > now {
            let slept = next - now;
            std::thread::sleep(slept);
            slept
        } else {
            if now - next > self.period * 2 {
                // Too far behind; resynchronize instead of bursting ticks
                self.next = Some(now);
            }
            Duration::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_from_settings() {
        let settings = crate::Settings::default();
        let clock = FixedClock::new(settings.tick_duration());
        assert_eq!(clock.period(), Duration::from_secs_f64(1.0 / 15.0));
    }

    #[test]
    fn test_unpaced_never_sleeps() {
        let mut clock = FixedClock::unpaced();
        for _ in 0..100 {
            assert_eq!(clock.wait(), Duration::ZERO);
        }
    }

    #[test]
    fn test_paced_clock_holds_rate() {
        let mut clock = FixedClock::new(Duration::from_millis(10));
        let started = Instant::now();
        for _ in 0..5 {
            clock.wait();
        }
        assert!(started.elapsed() >= Duration::from_millis(45));
    }
}
