//! Spawn director
//!
//! Once per frame decides whether an enemy or pickup appears (on a shrinking
//! interval) and whether the player's gun autofires.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::EnemyTier;
use crate::tuning::Tuning;

/// What the enemy/pickup gate produced
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnKind {
    Enemy(EnemyTier),
    Pickup,
}

/// Everything to spawn on this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpawnDecision {
    /// Enemy or pickup with its lateral spawn position
    pub wave: Option<(SpawnKind, f32)>,
    /// Autofire a bullet from the player's current position
    pub bullet: bool,
}

/// True when the draw `r` turns this spawn into a pickup
pub fn pickup_gate(lives: u8, r: f32, tuning: &Tuning) -> bool {
    match lives {
        2 => r < tuning.pickup_chance_two_lives,
        1 => r < tuning.pickup_chance_one_life,
        _ => false,
    }
}

/// Enemy tier for the draw `r2`
pub fn tier_for(r2: f32, tuning: &Tuning) -> EnemyTier {
    if r2 < tuning.tier3_threshold {
        EnemyTier::Three
    } else if r2 < tuning.tier2_threshold {
        EnemyTier::Two
    } else {
        EnemyTier::One
    }
}

/// Pick between a pickup and an enemy (and its tier) from two uniform draws.
///
/// `r` gates the pickup, `r2` picks the tier and is ignored for pickups.
pub fn choose_spawn(lives: u8, r: f32, r2: f32, tuning: &Tuning) -> SpawnKind {
    if pickup_gate(lives, r, tuning) {
        SpawnKind::Pickup
    } else {
        SpawnKind::Enemy(tier_for(r2, tuning))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnDirector {
    /// Current gap between enemy/pickup spawns (seconds)
    spawn_interval: f64,
    last_spawn: f64,
    last_bullet: f64,
}

impl SpawnDirector {
    pub fn new(now: f64, tuning: &Tuning) -> Self {
        Self {
            spawn_interval: tuning.spawn_interval_start,
            last_spawn: now,
            last_bullet: now,
        }
    }

    /// Back to the opening difficulty, timers restarted at `now`
    pub fn reset(&mut self, now: f64, tuning: &Tuning) {
        *self = Self::new(now, tuning);
    }

    pub fn spawn_interval(&self) -> f64 {
        self.spawn_interval
    }

    pub fn tick<R: Rng>(
        &mut self,
        now: f64,
        lives: u8,
        rng: &mut R,
        tuning: &Tuning,
    ) -> SpawnDecision {
        let mut decision = SpawnDecision::default();

        if now - self.last_spawn > self.spawn_interval {
            let r: f32 = rng.random();
            // The tier draw only happens for enemies
            let kind = if pickup_gate(lives, r, tuning) {
                SpawnKind::Pickup
            } else {
                SpawnKind::Enemy(tier_for(rng.random(), tuning))
            };
            let half = tuning.half_width();
            let x = rng.random_range(-half..=half);
            decision.wave = Some((kind, x));

            self.spawn_interval = (self.spawn_interval - tuning.spawn_interval_step)
                .max(tuning.spawn_interval_min);
            self.last_spawn = now;
        }

        if now - self.last_bullet > tuning.bullet_interval {
            decision.bullet = true;
            self.last_bullet = now;
        }

        decision
    }
}
