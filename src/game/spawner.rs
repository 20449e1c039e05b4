//! Time-driven spawner: a fixed cadence inside a fixed window.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use crate::game::Millis;

/// Emits one spawn every `interval_ms` between `start_delay_ms` and
/// `start_delay_ms + duration_ms`.
///
/// The spawner is polled with the level's elapsed time and reports how many
/// spawns became due since the last poll, so one large step never loses
/// spawns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedSpawner {
    start_delay_ms: Millis,
    interval_ms: Millis,
    duration_ms: Millis,
    /// Spawns already handed out.
    emitted: u32,
}

impl TimedSpawner {
    /// Create a spawner. `interval_ms` must be positive.
    #[must_use]
    pub fn new(start_delay_ms: Millis, interval_ms: Millis, duration_ms: Millis) -> Self {
        Self {
            start_delay_ms,
            interval_ms,
            duration_ms,
            emitted: 0,
        }
    }

    /// Total number of spawns over the whole window.
    #[must_use]
    pub fn total(&self) -> u32 {
        if self.interval_ms <= 0.0 || self.duration_ms <= 0.0 {
            return 0;
        }
        (self.duration_ms / self.interval_ms).ceil() as u32
    }

    /// Spawns due at `elapsed`, counted from the start of the level.
    #[must_use]
    fn due(&self, elapsed: Millis) -> u32 {
        if elapsed < self.start_delay_ms || self.interval_ms <= 0.0 {
            return 0;
        }
        let since = elapsed - self.start_delay_ms;
        let due = (since / self.interval_ms).floor() as u32 + 1;
        due.min(self.total())
    }

    /// Number of new spawns owed at `elapsed`.
    pub fn poll(&mut self, elapsed: Millis) -> u32 {
        let due = self.due(elapsed);
        let fresh = due.saturating_sub(self.emitted);
        self.emitted = self.emitted.max(due);
        fresh
    }

    /// Spawns handed out so far.
    #[must_use]
    pub const fn emitted(&self) -> u32 {
        self.emitted
    }

    /// Check if the spawning window has closed.
    #[must_use]
    pub fn is_finished(&self, elapsed: Millis) -> bool {
        elapsed >= self.start_delay_ms + self.duration_ms
    }

    /// Time left until the window closes.
    #[must_use]
    pub fn remaining_ms(&self, elapsed: Millis) -> Millis {
        (self.start_delay_ms + self.duration_ms - elapsed).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawner() -> TimedSpawner {
        TimedSpawner::new(10_000.0, 6_000.0, 60_000.0)
    }

    #[test]
    fn test_nothing_before_start_delay() {
        let mut s = spawner();
        assert_eq!(s.poll(0.0), 0);
        assert_eq!(s.poll(9_999.0), 0);
        assert_eq!(s.poll(10_000.0), 1);
        assert_eq!(s.poll(10_016.0), 0);
    }

    #[test]
    fn test_cadence() {
        let mut s = spawner();
        assert_eq!(s.poll(10_000.0), 1);
        assert_eq!(s.poll(15_999.0), 0);
        assert_eq!(s.poll(16_000.0), 1);
        // A long step catches up
        assert_eq!(s.poll(34_000.0), 3);
        assert_eq!(s.emitted(), 5);
    }

    #[test]
    fn test_window_closes() {
        let mut s = spawner();
        assert_eq!(s.total(), 10);
        assert_eq!(s.poll(1_000_000.0), 10);
        assert_eq!(s.poll(2_000_000.0), 0);

        assert!(!s.is_finished(69_999.0));
        assert!(s.is_finished(70_000.0));
    }

    #[test]
    fn test_remaining() {
        let s = spawner();
        assert!((s.remaining_ms(0.0) - 70_000.0).abs() < f64::EPSILON);
        assert!((s.remaining_ms(65_000.0) - 5_000.0).abs() < f64::EPSILON);
        assert!(s.remaining_ms(90_000.0).abs() < f64::EPSILON);
    }
}
