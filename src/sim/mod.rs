//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame timestamps are the only clock
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod clock;
pub mod collision;
pub mod events;
pub mod motion;
pub mod score;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::{ClockTick, SimulationClock};
pub use collision::{Aabb, Category, CollisionOutcome, Contact, ContactRule, ContactTracker};
pub use events::{EventQueue, GameEvent};
pub use score::{LifeLoss, ScoreAndLives};
pub use spawn::{SpawnDecision, SpawnDirector, SpawnKind, choose_spawn};
pub use state::{
    Bullet, Enemy, EnemyTier, EntityId, EntityKind, EntityRegistry, Pickup, Player, RemovalSet,
    PLAYER_ID,
};
pub use tick::{GamePhase, GameState, TickInput, tick};
