//! Scheduled reward events, polled once per frame.

use std::fmt;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A source of "pulse this node" events.
pub trait TriggerSource: fmt::Debug {
    /// Called once per frame with the frame timestamp and the number of live
    /// nodes. Returns the index of the node to pulse, if any.
    fn poll(&mut self, now_ms: f64, live: usize) -> Option<usize>;
}

/// Never fires.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTriggers;

impl TriggerSource for NoTriggers {
    fn poll(&mut self, _now_ms: f64, _live: usize) -> Option<usize> {
        None
    }
}

/// Every `interval_ms`, picks a random live node and pulses it with
/// probability `probability`.
#[derive(Debug)]
pub struct RewardSchedule {
    interval_ms: f64,
    probability: f64,
    next_due: Option<f64>,
    rng: SmallRng,
}

impl RewardSchedule {
    pub const DEFAULT_INTERVAL_MS: f64 = 2500.0;
    pub const DEFAULT_PROBABILITY: f64 = 0.25;

    pub fn new(interval_ms: f64, probability: f64, seed: u64) -> Self {
        Self {
            interval_ms,
            probability: probability.clamp(0.0, 1.0),
            next_due: None,
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl TriggerSource for RewardSchedule {
    fn poll(&mut self, now_ms: f64, live: usize) -> Option<usize> {
        let due = *self.next_due.get_or_insert(now_ms + self.interval_ms);
        if now_ms < due {
            return None;
        }
        // One tick per poll; a long pause does not replay missed ticks.
        self.next_due = Some(now_ms + self.interval_ms);
        if live == 0 {
            return None;
        }
        let index = self.rng.random_range(0..live);
        self.rng.random_bool(self.probability).then_some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certain_schedule_fires_once_per_interval() {
        let mut s = RewardSchedule::new(2500.0, 1.0, 9);
        let mut fired = 0;
        let mut t = 0.0;
        while t < 10_000.0 {
            if let Some(i) = s.poll(t, 4) {
                assert!(i < 4);
                fired += 1;
            }
            t += 16.0;
        }
        assert_eq!(fired, 3);
    }

    #[test]
    fn empty_scene_never_fires() {
        let mut s = RewardSchedule::new(100.0, 1.0, 9);
        assert_eq!(s.poll(0.0, 0), None);
        assert_eq!(s.poll(500.0, 0), None);
    }

    #[test]
    fn impossible_schedule_never_fires() {
        let mut s = RewardSchedule::new(10.0, 0.0, 9);
        assert!((0..1000).all(|i| s.poll(i as f64 * 16.0, 10).is_none()));
    }
}
