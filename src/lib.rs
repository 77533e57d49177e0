//! Space Survival - simulation core for a single-screen survival shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, collisions, scoring)
//! - `game`: Frame/pointer driven facade used by the presentation layer
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants (shipped balance)
pub mod consts {
    /// Default play field, in points (portrait phone)
    pub const FIELD_WIDTH: f32 = 390.0;
    pub const FIELD_HEIGHT: f32 = 844.0;

    /// Lateral glide speed of the player ship (points/s)
    pub const PLAYER_SPEED: f32 = 400.0;
    /// Base downward speed of a tier-1 enemy; pickups fall at this speed too
    pub const ENEMY_SPEED: f32 = 150.0;
    pub const BULLET_SPEED: f32 = 300.0;

    /// Seconds between autofired bullets
    pub const BULLET_INTERVAL: f64 = 0.5;

    /// Difficulty ramp: gap between enemy/pickup spawns
    pub const SPAWN_INTERVAL_START: f64 = 1.0;
    pub const SPAWN_INTERVAL_STEP: f64 = 0.02;
    pub const SPAWN_INTERVAL_MIN: f64 = 0.35;

    /// Lives
    pub const MAX_LIVES: u8 = 3;

    /// Score awarded for killing an enemy or letting it escape
    pub const KILL_REWARD: u64 = 5;
    pub const ESCAPE_REWARD: u64 = 5;
    /// Score awarded per whole second survived
    pub const SECOND_REWARD: u64 = 1;

    /// Pickup gates (probability of a pickup instead of an enemy)
    pub const PICKUP_CHANCE_TWO_LIVES: f32 = 0.20;
    pub const PICKUP_CHANCE_ONE_LIFE: f32 = 0.40;

    /// Tier draw thresholds (cumulative)
    pub const TIER3_THRESHOLD: f32 = 0.15;
    pub const TIER2_THRESHOLD: f32 = 0.40;
    pub const TIER3_SPEED_FACTOR: f32 = 0.5;
    pub const TIER2_SPEED_FACTOR: f32 = 0.75;

    /// Entity widths as a fraction of the field width
    pub const PLAYER_WIDTH_RATIO: f32 = 0.12;
    pub const ENEMY_WIDTH_RATIO: f32 = 0.10;
    pub const BULLET_WIDTH_RATIO: f32 = 0.03;
    pub const PICKUP_WIDTH_RATIO: f32 = 0.07;

    /// Player sits this far below the centre, as a fraction of field height
    pub const PLAYER_Y_RATIO: f32 = 0.4;
}

/// Clamp a lateral coordinate to the visible half-width
#[inline]
pub fn clamp_to_half_width(x: f32, width: f32) -> f32 {
    let half = width / 2.0;
    if x.is_nan() {
        return 0.0;
    }
    x.clamp(-half, half)
}

/// Move `current` toward `target` by at most `max_step`
#[inline]
pub fn approach(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = target - current;
    current + delta.clamp(-max_step, max_step)
}
