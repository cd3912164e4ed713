//! Time source used for report timestamps and uptime.
//!
//! The [`Reporter`](crate::reporter::Reporter) never calls `Utc::now()` directly.
//! It asks the [`Clock`] it was built with, so tests can pin time with a
//! [`FixedClock`] instead of swapping process-wide state.

use chrono::{DateTime, Utc};

/// Supplies the current instant.
///
/// Implementations must not cache readings on behalf of callers: every
/// formatted event calls [`Clock::now`] again.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Pins the clock to the Unix epoch.
    pub fn epoch() -> Self {
        FixedClock(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn system_clock_follows_wall_time() {
        let before = Utc::now();
        let now = SystemClock.now();
        let after = Utc::now();

        assert!(now >= before && now <= after);
        assert!(after - before < TimeDelta::milliseconds(100));
    }

    #[test]
    fn fixed_clock_never_moves() {
        let clock = FixedClock::epoch();

        assert_eq!(clock.now(), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(clock.now(), clock.now());
    }
}
