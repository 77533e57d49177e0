//! Frame and pointer driven facade over the simulation
//!
//! The presentation layer calls [`Game::on_frame`] once per rendered frame and
//! forwards pointer events as they arrive. Pointer events are buffered and take
//! effect at the next frame boundary.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clamp_to_half_width;
use crate::sim::{EntityId, EntityKind, GameEvent, GamePhase, GameState, PLAYER_ID, TickInput, tick};
use crate::tuning::Tuning;

/// One live entity, as needed to draw it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub kind: EntityKind,
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
}

/// Read-only view of the whole game for rendering or debugging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub elapsed: f64,
    pub spawn_interval: f64,
    pub entities: Vec<EntitySnapshot>,
}

type Observer = Box<dyn FnMut(&GameEvent)>;

/// Game instance holding all state
pub struct Game {
    state: GameState,
    input: TickInput,
    observers: Vec<Observer>,
}

impl Game {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            state: GameState::new(tuning, seed),
            input: TickInput::default(),
            observers: Vec::new(),
        }
    }

    /// Register an observer. Once any observer is registered, each frame's
    /// events are delivered to all observers and no longer queued.
    pub fn subscribe(&mut self, observer: impl FnMut(&GameEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Run one frame at timestamp `now` (seconds, monotonic)
    pub fn on_frame(&mut self, now: f64) {
        let input = std::mem::take(&mut self.input);
        tick(&mut self.state, &input, now);

        if !self.observers.is_empty() {
            for event in self.state.events.drain() {
                for observer in &mut self.observers {
                    observer(&event);
                }
            }
        }
    }

    /// Pointer dragged: new glide target (ignored while game over)
    pub fn on_pointer_moved(&mut self, x: f32) {
        if self.state.phase != GamePhase::GameOver {
            self.input.target_x = Some(self.clamp(x));
        }
    }

    /// Pointer pressed: glide target, or restart request while game over
    pub fn on_pointer_down(&mut self, x: f32) {
        if self.state.phase == GamePhase::GameOver {
            self.input.restart = true;
        } else {
            self.input.target_x = Some(self.clamp(x));
        }
    }

    fn clamp(&self, x: f32) -> f32 {
        clamp_to_half_width(x, self.state.tuning.field_width)
    }

    /// Events queued since the last drain (empty when observers are registered)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.events.drain()
    }

    pub fn score(&self) -> u64 {
        self.state.tracker.score()
    }

    pub fn lives(&self) -> u8 {
        self.state.tracker.lives()
    }

    pub fn elapsed(&self) -> f64 {
        self.state.clock.elapsed()
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn spawn_interval(&self) -> f64 {
        self.state.spawner.spawn_interval()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.state.tuning
    }

    /// Full simulation state (read-only)
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        let reg = &self.state.registry;
        let mut entities = Vec::with_capacity(reg.len());
        entities.push(EntitySnapshot {
            kind: EntityKind::Player,
            id: PLAYER_ID,
            pos: reg.player.pos(),
            size: reg.player.size,
        });
        entities.extend(reg.enemies.iter().map(|e| EntitySnapshot {
            kind: EntityKind::Enemy,
            id: e.id,
            pos: e.pos,
            size: e.size,
        }));
        entities.extend(reg.bullets.iter().map(|b| EntitySnapshot {
            kind: EntityKind::Bullet,
            id: b.id,
            pos: b.pos,
            size: b.size,
        }));
        entities.extend(reg.pickups.iter().map(|p| EntitySnapshot {
            kind: EntityKind::Pickup,
            id: p.id,
            pos: p.pos,
            size: p.size,
        }));
        entities.sort_by_key(|e| e.id);

        Snapshot {
            phase: self.phase(),
            score: self.score(),
            lives: self.lives(),
            elapsed: self.elapsed(),
            spawn_interval: self.spawn_interval(),
            entities,
        }
    }
}
