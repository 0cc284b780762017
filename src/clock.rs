//! Monotonic timestamps for test start/finish notifications.

use std::sync::OnceLock;
use std::time::Instant;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// An opaque monotonic point in time. Only differences between two timestamps
/// taken in the same process are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    seconds: u64,
    nanoseconds: u32,
}

impl Timestamp {
    pub fn from_seconds_and_nanoseconds(seconds: u64, nanoseconds: u64) -> Self {
        Self {
            seconds: seconds.saturating_add(nanoseconds / NANOS_PER_SEC),
            nanoseconds: (nanoseconds % NANOS_PER_SEC) as u32,
        }
    }

    /// Current monotonic time, measured from a process-wide origin.
    pub fn now() -> Self {
        static ORIGIN: OnceLock<Instant> = OnceLock::new();
        let elapsed = ORIGIN.get_or_init(Instant::now).elapsed();
        Self::from_seconds_and_nanoseconds(elapsed.as_secs(), u64::from(elapsed.subsec_nanos()))
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    pub fn nanoseconds(&self) -> u32 {
        self.nanoseconds
    }

    /// Elapsed seconds from `start` to `self`.
    ///
    /// Computed as whole nanoseconds first so that e.g. `1000.0s -> 1001.5s` is exactly `1.5`.
    /// A finish that precedes its start yields a negative value; ordering is the caller's
    /// responsibility.
    pub fn duration_since(&self, start: Timestamp) -> f64 {
        let secs = i128::from(self.seconds) - i128::from(start.seconds);
        let nanos = i128::from(self.nanoseconds) - i128::from(start.nanoseconds);
        let total = secs * i128::from(NANOS_PER_SEC) + nanos;
        total as f64 / NANOS_PER_SEC as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_combines_seconds_and_nanoseconds() {
        let start = Timestamp::from_seconds_and_nanoseconds(1000, 0);
        let end = Timestamp::from_seconds_and_nanoseconds(1001, 500_000_000);
        assert_eq!(end.duration_since(start), 1.5);
    }

    #[test]
    fn duration_borrows_across_second_boundary() {
        let start = Timestamp::from_seconds_and_nanoseconds(10, 900_000_000);
        let end = Timestamp::from_seconds_and_nanoseconds(11, 100_000_000);
        assert!((end.duration_since(start) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn nanoseconds_overflow_carries_into_seconds() {
        let t = Timestamp::from_seconds_and_nanoseconds(1, 2_250_000_000);
        assert_eq!(t.seconds(), 3);
        assert_eq!(t.nanoseconds(), 250_000_000);
    }

    #[test]
    fn now_is_monotonic() {
        let a = Timestamp::now();
        let b = Timestamp::now();
        assert!(b >= a);
        assert!(b.duration_since(a) >= 0.0);
    }
}
