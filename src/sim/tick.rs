//! Frame tick and game lifecycle
//!
//! Core game loop: one call per rendered frame advances the simulation in a
//! fixed order (clock, survival score, spawns, motion and culling, collisions).

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::SimulationClock;
use super::collision::{self, ContactTracker};
use super::events::{EventQueue, GameEvent};
use super::motion;
use super::score::ScoreAndLives;
use super::spawn::{SpawnDirector, SpawnKind};
use super::state::{EntityId, EntityKind, EntityRegistry, PLAYER_ID};
use crate::clamp_to_half_width;
use crate::tuning::Tuning;

/// Current phase of the game lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created, first frame not seen yet
    Initializing,
    /// Active gameplay
    Playing,
    /// Out of lives; simulation frozen until restart
    GameOver,
}

/// Input gathered between two frames, applied at the start of the next one
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// New lateral glide target (unclamped pointer X)
    pub target_x: Option<f32>,
    /// Restart request (only honoured in GameOver)
    pub restart: bool,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub registry: EntityRegistry,
    pub tracker: ScoreAndLives,
    pub clock: SimulationClock,
    pub spawner: SpawnDirector,
    pub contacts: ContactTracker,
    pub events: EventQueue,
    /// Frames simulated while Playing
    pub frames: u64,
    rng: Pcg32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            seed,
            phase: GamePhase::Initializing,
            registry: EntityRegistry::new(&tuning),
            tracker: ScoreAndLives::new(tuning.max_lives),
            clock: SimulationClock::new(0.0),
            spawner: SpawnDirector::new(0.0, &tuning),
            contacts: ContactTracker::default(),
            events: EventQueue::default(),
            frames: 0,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        }
    }

    /// Initializing -> Playing, with timing anchored at `now`
    pub fn setup(&mut self, now: f64) -> bool {
        if self.phase != GamePhase::Initializing {
            return false;
        }
        self.clock.reset(now);
        self.spawner.reset(now, &self.tuning);
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::EntityCreated {
            kind: EntityKind::Player,
            id: PLAYER_ID,
            pos: self.registry.player.pos(),
        });
        self.events.push(GameEvent::LivesChanged {
            lives: self.tracker.lives(),
        });
        self.events.push(GameEvent::ScoreChanged {
            score: self.tracker.score(),
        });
        log::info!("Game started (seed {})", self.seed);
        true
    }

    /// Playing -> GameOver
    pub fn enter_game_over(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOverEntered);
        log::info!(
            "Game over: score {} after {:.1}s",
            self.tracker.score(),
            self.clock.elapsed()
        );
        true
    }

    /// GameOver -> Playing with a fresh field, restarting time at `now`
    pub fn restart(&mut self, now: f64) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        for id in self.registry.clear(&self.tuning) {
            self.events.push(GameEvent::EntityDestroyed { id });
        }
        self.contacts.clear();
        self.tracker.reset(&mut self.events);
        self.spawner.reset(now, &self.tuning);
        self.clock.reset(now);
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::EntityMoved {
            id: PLAYER_ID,
            pos: self.registry.player.pos(),
        });
        self.events.push(GameEvent::GameReset);
        log::info!("Game restarted");
        true
    }

    fn apply_spawns(&mut self, now: f64) {
        let decision = self.spawner.tick(
            now,
            self.tracker.lives(),
            &mut self.rng,
            &self.tuning,
        );

        if let Some((kind, x)) = decision.wave {
            let (id, kind) = match kind {
                SpawnKind::Enemy(tier) => {
                    let id = self.registry.spawn_enemy(x, tier, &self.tuning);
                    log::debug!("spawned {:?} enemy {} at x={:.1}", tier, id, x);
                    (id, EntityKind::Enemy)
                }
                SpawnKind::Pickup => {
                    let id = self.registry.spawn_pickup(x, &self.tuning);
                    log::debug!("spawned pickup {} at x={:.1}", id, x);
                    (id, EntityKind::Pickup)
                }
            };
            self.push_created(id, kind);
        }

        if decision.bullet {
            let id = self.registry.spawn_bullet(&self.tuning);
            self.push_created(id, EntityKind::Bullet);
        }
    }

    fn push_created(&mut self, id: EntityId, kind: EntityKind) {
        let pos = match kind {
            EntityKind::Enemy => self.registry.enemy(id).map(|e| e.pos),
            EntityKind::Pickup => self.registry.pickups.iter().find(|p| p.id == id).map(|p| p.pos),
            EntityKind::Bullet => self.registry.bullets.iter().find(|b| b.id == id).map(|b| b.pos),
            EntityKind::Player => Some(self.registry.player.pos()),
        };
        if let Some(pos) = pos {
            self.events.push(GameEvent::EntityCreated { kind, id, pos });
        }
    }
}

/// Advance the game by one frame at timestamp `now` (seconds)
pub fn tick(state: &mut GameState, input: &TickInput, now: f64) {
    match state.phase {
        GamePhase::Initializing => {
            state.setup(now);
        }
        GamePhase::GameOver => {
            if !input.restart || !state.restart(now) {
                // Frozen: no time, spawns, motion or collisions
                return;
            }
        }
        GamePhase::Playing => {}
    }

    // Pointer input takes effect at the frame boundary
    if let Some(x) = input.target_x {
        let target = clamp_to_half_width(x, state.tuning.field_width);
        state.registry.player.glide_to(target);
    }

    // 1) Time and survival score
    let timing = state.clock.advance(now);
    if timing.second_ticked {
        state
            .tracker
            .tick_second(state.tuning.second_reward, &mut state.events);
    }

    // 2) Spawns (enemy/pickup, autofire)
    state.apply_spawns(now);

    // 3) Motion and offscreen cull
    motion::integrate(
        &mut state.registry,
        timing.dt as f32,
        &state.tuning,
        &mut state.events,
    );
    motion::cull(
        &mut state.registry,
        &state.tuning,
        &mut state.tracker,
        &mut state.events,
    );

    // 4) Collisions
    let began = state.contacts.begin(collision::detect(&state.registry));
    let outcome = collision::resolve(
        &mut state.registry,
        &began,
        &mut state.tracker,
        &state.tuning,
        &mut state.events,
    );

    // 5) Lifecycle
    if outcome.depleted || state.tracker.is_depleted() {
        state.enter_game_over();
    }

    state.frames += 1;
    // Ensure deterministic ordering
    state.registry.normalize_order();
}
