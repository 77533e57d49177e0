//! Events emitted by the simulation for the presentation layer

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{EntityId, EntityKind};

/// Discrete change notifications, in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    EntityCreated {
        kind: EntityKind,
        id: EntityId,
        pos: Vec2,
    },
    EntityMoved {
        id: EntityId,
        pos: Vec2,
    },
    EntityDestroyed {
        id: EntityId,
    },
    LivesChanged {
        lives: u8,
    },
    ScoreChanged {
        score: u64,
    },
    GameOverEntered,
    GameReset,
}

/// Buffer of pending events, drained by the presentation layer
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: GameEvent) {
        log::trace!("event: {:?}", event);
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn as_slice(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
