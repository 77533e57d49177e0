//! Entity records and the registry that owns them
//!
//! Every live entity is stored here and nowhere else. Systems borrow the
//! registry for the duration of one frame.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::tuning::Tuning;

/// Stable identity of an entity (never reused within a run)
pub type EntityId = u32;

/// The player ship always carries this id
pub const PLAYER_ID: EntityId = 0;

/// Kind of an entity, as seen by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    Bullet,
    Pickup,
}

/// Enemy strength class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyTier {
    One,
    Two,
    Three,
}

impl EnemyTier {
    /// Starting hit points (equal to the tier number)
    pub fn hp(self) -> u8 {
        match self {
            EnemyTier::One => 1,
            EnemyTier::Two => 2,
            EnemyTier::Three => 3,
        }
    }

    /// Fall speed relative to the base enemy speed
    pub fn speed_factor(self, tuning: &Tuning) -> f32 {
        match self {
            EnemyTier::One => 1.0,
            EnemyTier::Two => tuning.tier2_speed_factor,
            EnemyTier::Three => tuning.tier3_speed_factor,
        }
    }
}

/// Box size of an entity kind on the given play field
pub fn size_of(kind: EntityKind, tuning: &Tuning) -> Vec2 {
    let w = tuning.field_width;
    match kind {
        EntityKind::Player => Vec2::splat(w * tuning.player_width_ratio),
        EntityKind::Enemy => Vec2::splat(w * tuning.enemy_width_ratio),
        EntityKind::Bullet => {
            let bw = w * tuning.bullet_width_ratio;
            Vec2::new(bw, bw * 2.0)
        }
        EntityKind::Pickup => Vec2::splat(w * tuning.pickup_width_ratio),
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    /// Fixed vertical position
    pub y: f32,
    pub size: Vec2,
    pub alive: bool,
    /// Lateral glide target; `None` when at rest
    pub target_x: Option<f32>,
}

impl Player {
    fn new(tuning: &Tuning) -> Self {
        Self {
            x: 0.0,
            y: tuning.player_y(),
            size: size_of(EntityKind::Player, tuning),
            alive: true,
            target_x: None,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos(), self.size)
    }

    /// Start a new glide, cancelling any glide in flight
    pub fn glide_to(&mut self, target_x: f32) {
        self.target_x = Some(target_x);
    }

    /// Seconds the current glide still needs at `speed`
    pub fn glide_remaining(&self, speed: f32) -> f32 {
        match self.target_x {
            Some(target) if speed > 0.0 => (target - self.x).abs() / speed,
            _ => 0.0,
        }
    }
}

/// A falling enemy ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
    /// Downward speed (points/s)
    pub speed: f32,
    pub tier: EnemyTier,
    pub hp: u8,
    /// Facing angle in radians (π = nose down)
    pub facing: f32,
}

impl Enemy {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    /// Apply one hit; returns true when this hit destroyed the enemy
    pub fn hit(&mut self) -> bool {
        self.hp = self.hp.saturating_sub(1);
        self.hp == 0
    }
}

/// An autofired bullet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
    /// Upward speed (points/s)
    pub speed: f32,
}

impl Bullet {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }
}

/// A falling extra-life pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
    /// Downward speed (points/s)
    pub speed: f32,
}

impl Pickup {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }
}

/// Ids marked for removal during a pass, applied once at the end of it
#[derive(Debug, Clone, Default)]
pub struct RemovalSet {
    ids: BTreeSet<EntityId>,
}

impl RemovalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an id; returns false if it was already marked
    pub fn mark(&mut self, id: EntityId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

/// Owner of every live entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRegistry {
    pub player: Player,
    /// Active enemies (sorted by id for determinism)
    pub enemies: Vec<Enemy>,
    /// Active bullets (sorted by id for determinism)
    pub bullets: Vec<Bullet>,
    /// Active pickups (sorted by id for determinism)
    pub pickups: Vec<Pickup>,
    /// Next entity ID
    next_id: EntityId,
}

impl EntityRegistry {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            player: Player::new(tuning),
            enemies: Vec::new(),
            bullets: Vec::new(),
            pickups: Vec::new(),
            next_id: PLAYER_ID + 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn an enemy just above the top edge, nose down
    pub fn spawn_enemy(&mut self, x: f32, tier: EnemyTier, tuning: &Tuning) -> EntityId {
        let id = self.next_entity_id();
        let size = size_of(EntityKind::Enemy, tuning);
        self.enemies.push(Enemy {
            id,
            pos: Vec2::new(x, tuning.half_height() + size.y),
            size,
            speed: tuning.enemy_speed * tier.speed_factor(tuning),
            tier,
            hp: tier.hp(),
            facing: std::f32::consts::PI,
        });
        id
    }

    /// Spawn a pickup just above the top edge
    pub fn spawn_pickup(&mut self, x: f32, tuning: &Tuning) -> EntityId {
        let id = self.next_entity_id();
        let size = size_of(EntityKind::Pickup, tuning);
        self.pickups.push(Pickup {
            id,
            pos: Vec2::new(x, tuning.half_height() + size.y),
            size,
            speed: tuning.enemy_speed,
        });
        id
    }

    /// Spawn a bullet at the nose of the player ship
    pub fn spawn_bullet(&mut self, tuning: &Tuning) -> EntityId {
        let id = self.next_entity_id();
        let size = size_of(EntityKind::Bullet, tuning);
        let player = &self.player;
        self.bullets.push(Bullet {
            id,
            pos: Vec2::new(player.x, player.y + player.size.y / 2.0 + size.y / 2.0),
            size,
            speed: tuning.bullet_speed,
        });
        id
    }

    /// Kind of a live entity, `None` if it is gone
    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        if id == PLAYER_ID {
            Some(EntityKind::Player)
        } else if self.enemies.iter().any(|e| e.id == id) {
            Some(EntityKind::Enemy)
        } else if self.bullets.iter().any(|b| b.id == id) {
            Some(EntityKind::Bullet)
        } else if self.pickups.iter().any(|p| p.id == id) {
            Some(EntityKind::Pickup)
        } else {
            None
        }
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    /// Remove one entity; removing an absent id (or the player) is a no-op
    pub fn remove(&mut self, id: EntityId) -> Option<EntityKind> {
        if let Some(i) = self.enemies.iter().position(|e| e.id == id) {
            self.enemies.remove(i);
            return Some(EntityKind::Enemy);
        }
        if let Some(i) = self.bullets.iter().position(|b| b.id == id) {
            self.bullets.remove(i);
            return Some(EntityKind::Bullet);
        }
        if let Some(i) = self.pickups.iter().position(|p| p.id == id) {
            self.pickups.remove(i);
            return Some(EntityKind::Pickup);
        }
        None
    }

    /// Apply a pass's removals; returns the ids that were actually present
    pub fn sweep(&mut self, removals: &RemovalSet) -> Vec<EntityId> {
        let mut removed = Vec::with_capacity(removals.len());
        if removals.is_empty() {
            return removed;
        }
        self.enemies.retain(|e| {
            let keep = !removals.contains(e.id);
            if !keep {
                removed.push(e.id);
            }
            keep
        });
        self.bullets.retain(|b| {
            let keep = !removals.contains(b.id);
            if !keep {
                removed.push(b.id);
            }
            keep
        });
        self.pickups.retain(|p| {
            let keep = !removals.contains(p.id);
            if !keep {
                removed.push(p.id);
            }
            keep
        });
        removed.sort_unstable();
        removed
    }

    /// Drop every enemy, bullet and pickup and park the player at centre.
    /// Returns the ids that were cleared.
    pub fn clear(&mut self, tuning: &Tuning) -> Vec<EntityId> {
        let mut cleared: Vec<EntityId> = self
            .enemies
            .drain(..)
            .map(|e| e.id)
            .chain(self.bullets.drain(..).map(|b| b.id))
            .chain(self.pickups.drain(..).map(|p| p.id))
            .collect();
        cleared.sort_unstable();
        self.player = Player::new(tuning);
        cleared
    }

    /// True when no enemy, bullet or pickup is alive
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty() && self.bullets.is_empty() && self.pickups.is_empty()
    }

    /// Number of live entities, the player included
    pub fn len(&self) -> usize {
        1 + self.enemies.len() + self.bullets.len() + self.pickups.len()
    }

    /// Ensure collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.bullets.sort_by_key(|b| b.id);
        self.pickups.sort_by_key(|p| p.id);
    }
}
