//! Simulation clock
//!
//! Frames arrive with wall-clock timestamps at an irregular rate. The clock
//! turns them into a per-frame delta, total elapsed time, and a once-per-second
//! tick driven by an accumulator so seconds are never skipped or doubled.

use serde::{Deserialize, Serialize};

/// Timing derived from one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockTick {
    /// Seconds since the previous frame
    pub dt: f64,
    /// Seconds since the start of the run
    pub elapsed: f64,
    /// True when a whole second of elapsed time completed on this frame
    pub second_ticked: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationClock {
    start: f64,
    last_update: f64,
    /// Timestamp of the last whole-second boundary that fired
    last_second: f64,
}

impl SimulationClock {
    pub fn new(now: f64) -> Self {
        Self {
            start: now,
            last_update: now,
            last_second: now,
        }
    }

    pub fn advance(&mut self, now: f64) -> ClockTick {
        // Timestamps are expected to be monotonic; a backwards step is treated
        // as a zero-length frame.
        let dt = (now - self.last_update).max(0.0);
        self.last_update = self.last_update.max(now);

        let second_ticked = now - self.last_second >= 1.0;
        if second_ticked {
            self.last_second += 1.0;
        }

        ClockTick {
            dt,
            elapsed: self.elapsed_at(now),
            second_ticked,
        }
    }

    /// Restart timing at `now` (used on restart)
    pub fn reset(&mut self, now: f64) {
        *self = Self::new(now);
    }

    /// Elapsed time at the last frame seen
    pub fn elapsed(&self) -> f64 {
        self.elapsed_at(self.last_update)
    }

    fn elapsed_at(&self, now: f64) -> f64 {
        (now - self.start).max(0.0)
    }

    pub fn last_update(&self) -> f64 {
        self.last_update
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_delta_and_elapsed() {
        let mut clock = SimulationClock::new(10.0);
        let t = clock.advance(10.25);
        assert!((t.dt - 0.25).abs() < 1e-9);
        assert!((t.elapsed - 0.25).abs() < 1e-9);
        assert!(!t.second_ticked);

        let t = clock.advance(10.75);
        assert!((t.dt - 0.5).abs() < 1e-9);
        assert!((t.elapsed - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_second_ticks_once_per_second() {
        let mut clock = SimulationClock::new(0.0);
        let mut ticks = 0;
        let mut t = 0.0;
        // Irregular frame lengths over ~5 seconds
        let steps = [0.016, 0.033, 0.05, 0.007, 0.1];
        let mut i = 0;
        while t < 5.0 {
            t += steps[i % steps.len()];
            i += 1;
            if clock.advance(t).second_ticked {
                ticks += 1;
            }
        }
        assert!(ticks == 4 || ticks == 5, "ticks = {ticks}");
    }

    #[test]
    fn test_stall_is_caught_up_not_skipped() {
        let mut clock = SimulationClock::new(0.0);
        // One long stall spanning three seconds fires once per frame afterwards
        assert!(clock.advance(3.2).second_ticked);
        assert!(clock.advance(3.21).second_ticked);
        assert!(clock.advance(3.22).second_ticked);
        assert!(!clock.advance(3.23).second_ticked);
    }

    #[test]
    fn test_reset() {
        let mut clock = SimulationClock::new(0.0);
        clock.advance(7.5);
        clock.reset(8.0);
        assert_eq!(clock.elapsed(), 0.0);
        let t = clock.advance(8.5);
        assert!((t.dt - 0.5).abs() < 1e-9);
        assert!((t.elapsed - 0.5).abs() < 1e-9);
        assert!(!t.second_ticked);
    }

    #[test]
    fn test_backwards_timestamp_is_zero_dt() {
        let mut clock = SimulationClock::new(5.0);
        clock.advance(6.0);
        let t = clock.advance(5.5);
        assert_eq!(t.dt, 0.0);
    }
}
