// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Fixed-timestep paint gate.

use std::time::{Duration, Instant};

/// Decides when the timeline should repaint, at most once per interval.
///
/// Deadlines advance in whole intervals from the first frame, so the rate
/// stays steady regardless of when the host happens to call in. After a
/// stall longer than one interval the schedule restarts from `now`.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval: Duration,
    next_due: Option<Instant>,
}

impl FrameScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true if a frame is due and consumes it.
    pub fn should_paint(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now < due => false,
            Some(due) => {
                let next = due + self.interval;
                self.next_due = Some(if next <= now { now + self.interval } else { next });
                true
            }
            None => {
                self.next_due = Some(now + self.interval);
                true
            }
        }
    }

    /// Time left until the next frame is due.
    pub fn time_until_next(&self, now: Instant) -> Duration {
        self.next_due
            .map_or(Duration::ZERO, |due| due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gates_to_interval() {
        let mut scheduler = FrameScheduler::new(Duration::from_millis(16));
        let t0 = Instant::now();

        let painted = (0..100)
            .filter(|ms| scheduler.should_paint(t0 + Duration::from_millis(*ms)))
            .count();
        // Frames at 0, 16, 32, 48, 64, 80, 96.
        assert_eq!(painted, 7);
    }

    #[test]
    fn test_resyncs_after_stall() {
        let mut scheduler = FrameScheduler::new(Duration::from_millis(16));
        let t0 = Instant::now();
        assert!(scheduler.should_paint(t0));
        assert!(scheduler.should_paint(t0 + Duration::from_millis(500)));
        assert!(!scheduler.should_paint(t0 + Duration::from_millis(510)));
        assert!(scheduler.should_paint(t0 + Duration::from_millis(516)));
        assert_eq!(
            scheduler.time_until_next(t0 + Duration::from_millis(520)),
            Duration::from_millis(12)
        );
    }
}
