//! Data-driven game balance
//!
//! Defaults are the shipped values from [`crate::consts`]. A balance file is
//! plain JSON; missing fields fall back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors produced while loading a balance file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Game balance and play-field geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Speeds (points/s) ===
    pub player_speed: f32,
    pub enemy_speed: f32,
    pub bullet_speed: f32,

    // === Timing (seconds) ===
    pub bullet_interval: f64,
    pub spawn_interval_start: f64,
    pub spawn_interval_step: f64,
    pub spawn_interval_min: f64,

    // === Scoring ===
    pub max_lives: u8,
    pub kill_reward: u64,
    pub escape_reward: u64,
    pub second_reward: u64,

    // === Spawn mix ===
    pub pickup_chance_two_lives: f32,
    pub pickup_chance_one_life: f32,
    pub tier3_threshold: f32,
    pub tier2_threshold: f32,
    pub tier3_speed_factor: f32,
    pub tier2_speed_factor: f32,

    // === Sizes (fraction of field width) ===
    pub player_width_ratio: f32,
    pub enemy_width_ratio: f32,
    pub bullet_width_ratio: f32,
    pub pickup_width_ratio: f32,
    pub player_y_ratio: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            player_speed: PLAYER_SPEED,
            enemy_speed: ENEMY_SPEED,
            bullet_speed: BULLET_SPEED,

            bullet_interval: BULLET_INTERVAL,
            spawn_interval_start: SPAWN_INTERVAL_START,
            spawn_interval_step: SPAWN_INTERVAL_STEP,
            spawn_interval_min: SPAWN_INTERVAL_MIN,

            max_lives: MAX_LIVES,
            kill_reward: KILL_REWARD,
            escape_reward: ESCAPE_REWARD,
            second_reward: SECOND_REWARD,

            pickup_chance_two_lives: PICKUP_CHANCE_TWO_LIVES,
            pickup_chance_one_life: PICKUP_CHANCE_ONE_LIFE,
            tier3_threshold: TIER3_THRESHOLD,
            tier2_threshold: TIER2_THRESHOLD,
            tier3_speed_factor: TIER3_SPEED_FACTOR,
            tier2_speed_factor: TIER2_SPEED_FACTOR,

            player_width_ratio: PLAYER_WIDTH_RATIO,
            enemy_width_ratio: ENEMY_WIDTH_RATIO,
            bullet_width_ratio: BULLET_WIDTH_RATIO,
            pickup_width_ratio: PICKUP_WIDTH_RATIO,
            player_y_ratio: PLAYER_Y_RATIO,
        }
    }
}

impl Tuning {
    /// Shipped balance on a custom play field
    pub fn with_field(width: f32, height: f32) -> Self {
        Self {
            field_width: width,
            field_height: height,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON balance file
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!(
            "Loaded tuning ({}x{} field)",
            tuning.field_width,
            tuning.field_height
        );
        Ok(tuning)
    }

    /// Load a balance file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize to pretty JSON (for writing a starter balance file)
    pub fn to_json(&self) -> String {
        // Plain data with string keys; serialization cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f64) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive number",
                })
            }
        }
        fn probability(field: &'static str, value: f32) -> Result<(), TuningError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must lie in [0, 1]",
                })
            }
        }

        positive("field_width", self.field_width as f64)?;
        positive("field_height", self.field_height as f64)?;
        positive("player_speed", self.player_speed as f64)?;
        positive("enemy_speed", self.enemy_speed as f64)?;
        positive("bullet_speed", self.bullet_speed as f64)?;
        positive("bullet_interval", self.bullet_interval)?;
        positive("spawn_interval_start", self.spawn_interval_start)?;
        positive("spawn_interval_min", self.spawn_interval_min)?;
        positive("tier3_speed_factor", self.tier3_speed_factor as f64)?;
        positive("tier2_speed_factor", self.tier2_speed_factor as f64)?;
        positive("player_width_ratio", self.player_width_ratio as f64)?;
        positive("enemy_width_ratio", self.enemy_width_ratio as f64)?;
        positive("bullet_width_ratio", self.bullet_width_ratio as f64)?;
        positive("pickup_width_ratio", self.pickup_width_ratio as f64)?;

        if !(self.spawn_interval_step.is_finite() && self.spawn_interval_step >= 0.0) {
            return Err(TuningError::Invalid {
                field: "spawn_interval_step",
                reason: "must be zero or positive",
            });
        }
        if self.spawn_interval_min > self.spawn_interval_start {
            return Err(TuningError::Invalid {
                field: "spawn_interval_min",
                reason: "must not exceed spawn_interval_start",
            });
        }
        if self.max_lives == 0 {
            return Err(TuningError::Invalid {
                field: "max_lives",
                reason: "must be at least 1",
            });
        }

        probability("pickup_chance_two_lives", self.pickup_chance_two_lives)?;
        probability("pickup_chance_one_life", self.pickup_chance_one_life)?;
        probability("tier3_threshold", self.tier3_threshold)?;
        probability("tier2_threshold", self.tier2_threshold)?;
        probability("player_y_ratio", self.player_y_ratio)?;
        if self.tier3_threshold > self.tier2_threshold {
            return Err(TuningError::Invalid {
                field: "tier3_threshold",
                reason: "must not exceed tier2_threshold",
            });
        }

        Ok(())
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.field_width / 2.0
    }

    #[inline]
    pub fn half_height(&self) -> f32 {
        self.field_height / 2.0
    }

    /// Fixed vertical position of the player
    #[inline]
    pub fn player_y(&self) -> f32 {
        -self.field_height * self.player_y_ratio
    }
}
