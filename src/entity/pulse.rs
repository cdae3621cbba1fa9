/// Per-frame multiplier applied to an active pulse.
pub const PULSE_DECAY: f64 = 0.94;

/// Below this a pulse is snapped to zero and the highlight switches off.
pub const PULSE_FLOOR: f64 = 1e-3;

/// Transient highlight intensity in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pulse(f64);

impl Pulse {
    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_active(self) -> bool {
        self.0 > 0.0
    }

    pub fn trigger(self) -> Self {
        Pulse(1.0)
    }

    pub fn advance(self, decay: f64) -> Self {
        let next = self.0 * decay;
        if next < PULSE_FLOOR {
            Pulse(0.0)
        } else {
            Pulse(next)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifty_frames_of_decay() {
        let mut p = Pulse::default().trigger();
        for _ in 0..50 {
            p = p.advance(PULSE_DECAY);
        }
        assert!((p.value() - PULSE_DECAY.powi(50)).abs() < 1e-12);
        assert!((p.value() - 0.045).abs() < 0.002);
    }

    #[test]
    fn settles_to_exact_zero() {
        let mut p = Pulse::default().trigger();
        let mut frames = 0;
        while p.is_active() {
            p = p.advance(PULSE_DECAY);
            frames += 1;
        }
        // 0.94^112 < 1e-3 <= 0.94^111
        assert_eq!(frames, 112);
        assert_eq!(p.advance(PULSE_DECAY), Pulse::default());
    }
}
