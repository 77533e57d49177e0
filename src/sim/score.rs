//! Score and lives bookkeeping
//!
//! All score and lives changes go through [`ScoreAndLives`], which clamps the
//! values and emits a change event for every actual change.

use serde::{Deserialize, Serialize};

use super::events::{EventQueue, GameEvent};

/// Result of taking a life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeLoss {
    /// Lives went down and some remain
    Survived,
    /// This loss took the last life
    Depleted,
    /// Already at zero; nothing changed
    AlreadyOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreAndLives {
    score: u64,
    lives: u8,
    max_lives: u8,
}

impl ScoreAndLives {
    pub fn new(max_lives: u8) -> Self {
        Self {
            score: 0,
            lives: max_lives,
            max_lives,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn max_lives(&self) -> u8 {
        self.max_lives
    }

    pub fn add_score(&mut self, n: u64, events: &mut EventQueue) {
        if n == 0 {
            return;
        }
        self.score = self.score.saturating_add(n);
        events.push(GameEvent::ScoreChanged { score: self.score });
    }

    /// Survival reward for one whole elapsed second
    pub fn tick_second(&mut self, reward: u64, events: &mut EventQueue) {
        self.add_score(reward, events);
    }

    pub fn lose_life(&mut self, events: &mut EventQueue) -> LifeLoss {
        if self.lives == 0 {
            return LifeLoss::AlreadyOut;
        }
        self.lives -= 1;
        events.push(GameEvent::LivesChanged { lives: self.lives });
        if self.lives == 0 {
            LifeLoss::Depleted
        } else {
            LifeLoss::Survived
        }
    }

    /// Returns false when already at the cap (no change)
    pub fn gain_life(&mut self, events: &mut EventQueue) -> bool {
        if self.lives >= self.max_lives {
            return false;
        }
        self.lives += 1;
        events.push(GameEvent::LivesChanged { lives: self.lives });
        true
    }

    pub fn is_depleted(&self) -> bool {
        self.lives == 0
    }

    /// Score 0, full lives
    pub fn reset(&mut self, events: &mut EventQueue) {
        self.score = 0;
        self.lives = self.max_lives;
        events.push(GameEvent::ScoreChanged { score: self.score });
        events.push(GameEvent::LivesChanged { lives: self.lives });
    }
}
