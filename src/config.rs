//! Engine options, deserializable from a plain JS/JSON object.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::trigger::RewardSchedule;

/// Options of the hero particle network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkOptions {
    pub particle_count: usize,
    pub speed: f64,
    pub connection_distance: f64,
    pub particle_opacity: f64,
    pub line_opacity: f64,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            particle_count: 50,
            speed: 0.3,
            connection_distance: 150.0,
            particle_opacity: 0.3,
            line_opacity: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub network: NetworkOptions,
    /// Quiet period before a resize rebuilds the scene.
    pub resize_debounce_ms: f64,
    /// Visible fraction of the canvas needed to keep animating.
    pub visibility_threshold: f64,
    pub reward_interval_ms: f64,
    pub reward_probability: f64,
    pub pulse_decay: f64,
    /// Fixed RNG seed; random per page view when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            network: NetworkOptions::default(),
            resize_debounce_ms: 250.0,
            visibility_threshold: 0.1,
            reward_interval_ms: RewardSchedule::DEFAULT_INTERVAL_MS,
            reward_probability: RewardSchedule::DEFAULT_PROBABILITY,
            pulse_decay: crate::entity::PULSE_DECAY,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        fn check(ok: bool, field: &'static str, reason: &str) -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(Error::InvalidConfig {
                    field,
                    reason: reason.to_string(),
                })
            }
        }

        let n = &self.network;
        check(n.particle_count <= 1000, "network.particleCount", "at most 1000")?;
        check(n.speed.is_finite() && n.speed >= 0.0, "network.speed", "must be >= 0")?;
        check(
            n.connection_distance.is_finite() && n.connection_distance > 0.0,
            "network.connectionDistance",
            "must be > 0",
        )?;
        check(
            (0.0..=1.0).contains(&n.particle_opacity),
            "network.particleOpacity",
            "must be in [0, 1]",
        )?;
        check(
            (0.0..=1.0).contains(&n.line_opacity),
            "network.lineOpacity",
            "must be in [0, 1]",
        )?;
        check(
            self.resize_debounce_ms.is_finite() && self.resize_debounce_ms >= 0.0,
            "resizeDebounceMs",
            "must be >= 0",
        )?;
        check(
            (0.0..=1.0).contains(&self.visibility_threshold),
            "visibilityThreshold",
            "must be in [0, 1]",
        )?;
        check(
            self.reward_interval_ms.is_finite() && self.reward_interval_ms > 0.0,
            "rewardIntervalMs",
            "must be > 0",
        )?;
        check(
            (0.0..=1.0).contains(&self.reward_probability),
            "rewardProbability",
            "must be in [0, 1]",
        )?;
        check(
            self.pulse_decay > 0.0 && self.pulse_decay < 1.0,
            "pulseDecay",
            "must be in (0, 1)",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{ "network": { "particleCount": 80 }, "seed": 7 }"#).unwrap();
        assert_eq!(cfg.network.particle_count, 80);
        assert_eq!(cfg.network.connection_distance, 150.0);
        assert_eq!(cfg.resize_debounce_ms, 250.0);
        assert_eq!(cfg.seed, Some(7));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let cfg: EngineConfig = serde_json::from_str(r#"{ "rewardProbability": 1.5 }"#).unwrap();
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { field: "rewardProbability", .. }));

        let cfg = EngineConfig {
            pulse_decay: 1.0,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
