//! Collision detection and resolution
//!
//! Every entity carries one [`Category`]. Which categories interact, and how,
//! is a small table keyed on unordered category pairs. Overlaps are plain
//! axis-aligned box tests; a pair is resolved once when it starts touching
//! and ignored until it separates and touches again.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::{EventQueue, GameEvent};
use super::score::{LifeLoss, ScoreAndLives};
use super::state::{EntityId, EntityKind, EntityRegistry, PLAYER_ID, RemovalSet};
use crate::tuning::Tuning;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap: boxes that only share an edge do not touch
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Collision-participation tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Player,
    Enemy,
    Bullet,
    Pickup,
}

impl Category {
    pub fn of(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Player => Category::Player,
            EntityKind::Enemy => Category::Enemy,
            EntityKind::Bullet => Category::Bullet,
            EntityKind::Pickup => Category::Pickup,
        }
    }

    pub fn collides_with(self, other: Category) -> bool {
        contact_rule(self, other).is_some()
    }
}

/// How a touching pair is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactRule {
    PlayerEnemy,
    BulletEnemy,
    PlayerPickup,
}

/// Interacting category pairs, in the role order each rule expects
const CONTACT_TABLE: [(Category, Category, ContactRule); 3] = [
    (Category::Player, Category::Enemy, ContactRule::PlayerEnemy),
    (Category::Bullet, Category::Enemy, ContactRule::BulletEnemy),
    (Category::Player, Category::Pickup, ContactRule::PlayerPickup),
];

/// Look up the rule for an unordered pair.
///
/// The flag is true when `(a, b)` is the reverse of the table's role order.
pub fn contact_rule(a: Category, b: Category) -> Option<(ContactRule, bool)> {
    CONTACT_TABLE.iter().find_map(|&(first, second, rule)| {
        if (a, b) == (first, second) {
            Some((rule, false))
        } else if (b, a) == (first, second) {
            Some((rule, true))
        } else {
            None
        }
    })
}

/// A touching pair, with the participants in role order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    PlayerEnemy { enemy: EntityId },
    BulletEnemy { bullet: EntityId, enemy: EntityId },
    PlayerPickup { pickup: EntityId },
}

/// Unordered pair identity (lower id first)
pub type ContactKey = (EntityId, EntityId);

impl Contact {
    fn from_rule(rule: ContactRule, first: EntityId, second: EntityId) -> Self {
        match rule {
            ContactRule::PlayerEnemy => Contact::PlayerEnemy { enemy: second },
            ContactRule::BulletEnemy => Contact::BulletEnemy {
                bullet: first,
                enemy: second,
            },
            ContactRule::PlayerPickup => Contact::PlayerPickup { pickup: second },
        }
    }

    pub fn key(&self) -> ContactKey {
        let (a, b) = match *self {
            Contact::PlayerEnemy { enemy } => (PLAYER_ID, enemy),
            Contact::BulletEnemy { bullet, enemy } => (bullet, enemy),
            Contact::PlayerPickup { pickup } => (PLAYER_ID, pickup),
        };
        (a.min(b), a.max(b))
    }
}

#[derive(Debug, Clone, Copy)]
struct Collider {
    id: EntityId,
    category: Category,
    bounds: Aabb,
}

fn colliders(registry: &EntityRegistry) -> Vec<Collider> {
    let mut out = Vec::with_capacity(registry.len());
    out.push(Collider {
        id: PLAYER_ID,
        category: Category::Player,
        bounds: registry.player.bounds(),
    });
    out.extend(registry.enemies.iter().map(|e| Collider {
        id: e.id,
        category: Category::Enemy,
        bounds: e.bounds(),
    }));
    out.extend(registry.bullets.iter().map(|b| Collider {
        id: b.id,
        category: Category::Bullet,
        bounds: b.bounds(),
    }));
    out.extend(registry.pickups.iter().map(|p| Collider {
        id: p.id,
        category: Category::Pickup,
        bounds: p.bounds(),
    }));
    out
}

/// Every interacting pair overlapping right now, sorted by key
pub fn detect(registry: &EntityRegistry) -> Vec<Contact> {
    let colliders = colliders(registry);
    let mut contacts = Vec::new();

    for (i, a) in colliders.iter().enumerate() {
        for b in &colliders[i + 1..] {
            let Some((rule, swapped)) = contact_rule(a.category, b.category) else {
                continue;
            };
            if !a.bounds.overlaps(&b.bounds) {
                continue;
            }
            let (first, second) = if swapped { (b.id, a.id) } else { (a.id, b.id) };
            contacts.push(Contact::from_rule(rule, first, second));
        }
    }

    contacts.sort_by_key(Contact::key);
    contacts
}

/// Remembers which pairs were touching on the previous frame
#[derive(Debug, Clone, Default)]
pub struct ContactTracker {
    active: BTreeSet<ContactKey>,
}

impl ContactTracker {
    /// Record this frame's contacts and return only the ones that just began
    pub fn begin(&mut self, current: Vec<Contact>) -> Vec<Contact> {
        let keys: BTreeSet<ContactKey> = current.iter().map(Contact::key).collect();
        let began = current
            .into_iter()
            .filter(|c| !self.active.contains(&c.key()))
            .collect();
        self.active = keys;
        began
    }

    pub fn is_touching(&self, key: ContactKey) -> bool {
        self.active.contains(&key)
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

/// What a resolution pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionOutcome {
    pub kills: usize,
    pub pickups: usize,
    pub lives_lost: usize,
    /// The last life was lost during this pass
    pub depleted: bool,
}

/// Apply the rules for every contact that began this frame.
///
/// Destroyed entities are swept once at the end of the pass. Contacts whose
/// participants were already destroyed earlier in the pass are skipped. Once
/// the last life is lost the pass stops.
pub fn resolve(
    registry: &mut EntityRegistry,
    began: &[Contact],
    tracker: &mut ScoreAndLives,
    tuning: &Tuning,
    events: &mut EventQueue,
) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();
    let mut removals = RemovalSet::new();

    for contact in began {
        match *contact {
            Contact::PlayerEnemy { enemy } => {
                if removals.contains(enemy) {
                    continue;
                }
                let Some(target) = registry.enemy_mut(enemy) else {
                    continue;
                };
                if target.hit() {
                    removals.mark(enemy);
                    outcome.kills += 1;
                    tracker.add_score(tuning.kill_reward, events);
                }
                // Ramming costs a life whether or not the enemy died
                outcome.lives_lost += 1;
                if tracker.lose_life(events) == LifeLoss::Depleted {
                    outcome.depleted = true;
                    break;
                }
            }
            Contact::BulletEnemy { bullet, enemy } => {
                if removals.contains(bullet)
                    || removals.contains(enemy)
                    || registry.kind_of(bullet) != Some(EntityKind::Bullet)
                {
                    continue;
                }
                let Some(target) = registry.enemy_mut(enemy) else {
                    continue;
                };
                removals.mark(bullet);
                if target.hit() {
                    removals.mark(enemy);
                    outcome.kills += 1;
                    tracker.add_score(tuning.kill_reward, events);
                    log::debug!("enemy {} destroyed", enemy);
                }
            }
            Contact::PlayerPickup { pickup } => {
                if registry.kind_of(pickup) != Some(EntityKind::Pickup) || !removals.mark(pickup) {
                    continue;
                }
                outcome.pickups += 1;
                if tracker.gain_life(events) {
                    log::debug!("pickup {} restored a life", pickup);
                }
            }
        }
    }

    for id in registry.sweep(&removals) {
        events.push(GameEvent::EntityDestroyed { id });
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::EnemyTier;

    fn setup() -> (Tuning, EntityRegistry, ScoreAndLives, EventQueue) {
        let tuning = Tuning::default();
        let reg = EntityRegistry::new(&tuning);
        (tuning, reg, ScoreAndLives::new(3), EventQueue::default())
    }

    /// Put an enemy right on top of the player
    fn ram(reg: &mut EntityRegistry, tier: EnemyTier, tuning: &Tuning) -> EntityId {
        let (x, y) = (reg.player.x, reg.player.y);
        let id = reg.spawn_enemy(x, tier, tuning);
        reg.enemy_mut(id).unwrap().pos.y = y;
        id
    }

    /// Put a bullet inside an enemy
    fn shoot(reg: &mut EntityRegistry, enemy: EntityId, tuning: &Tuning) -> EntityId {
        let pos = reg.enemy(enemy).unwrap().pos;
        let id = reg.spawn_bullet(tuning);
        reg.bullets.iter_mut().find(|b| b.id == id).unwrap().pos = pos;
        id
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::from_center(Vec2::new(9.0, 0.0), Vec2::splat(10.0));
        let c = Aabb::from_center(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let d = Aabb::from_center(Vec2::new(0.0, 30.0), Vec2::splat(10.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c)); // edges touching only
        assert!(!a.overlaps(&d));
    }

    #[test]
    fn test_contact_table() {
        use Category::*;
        assert_eq!(contact_rule(Player, Enemy), Some((ContactRule::PlayerEnemy, false)));
        assert_eq!(contact_rule(Enemy, Player), Some((ContactRule::PlayerEnemy, true)));
        assert_eq!(contact_rule(Enemy, Bullet), Some((ContactRule::BulletEnemy, true)));
        assert_eq!(contact_rule(Pickup, Player), Some((ContactRule::PlayerPickup, true)));
        assert!(!Enemy.collides_with(Enemy));
        assert!(!Bullet.collides_with(Bullet));
        assert!(!Bullet.collides_with(Pickup));
        assert!(!Enemy.collides_with(Pickup));
        assert!(!Player.collides_with(Bullet));
        assert_eq!(Category::of(EntityKind::Pickup), Pickup);
    }

    #[test]
    fn test_overlapping_enemies_do_not_collide() {
        let (tuning, mut reg, _, _) = setup();
        reg.spawn_enemy(0.0, EnemyTier::One, &tuning);
        reg.spawn_enemy(0.0, EnemyTier::One, &tuning);
        assert!(detect(&reg).is_empty());
    }

    #[test]
    fn test_tier_three_needs_three_bullets() {
        let (tuning, mut reg, mut tracker, mut events) = setup();
        let enemy = reg.spawn_enemy(0.0, EnemyTier::Three, &tuning);

        for expected_hp in [2, 1] {
            let bullet = shoot(&mut reg, enemy, &tuning);
            let began = vec![Contact::BulletEnemy { bullet, enemy }];
            let out = resolve(&mut reg, &began, &mut tracker, &tuning, &mut events);
            assert_eq!(out.kills, 0);
            assert_eq!(reg.enemy(enemy).unwrap().hp, expected_hp);
            assert_eq!(tracker.score(), 0);
            assert!(reg.bullets.is_empty());
        }

        let bullet = shoot(&mut reg, enemy, &tuning);
        let began = vec![Contact::BulletEnemy { bullet, enemy }];
        let out = resolve(&mut reg, &began, &mut tracker, &tuning, &mut events);
        assert_eq!(out.kills, 1);
        assert!(reg.enemy(enemy).is_none());
        assert_eq!(tracker.score(), 5);
    }

    #[test]
    fn test_bullet_spent_on_first_enemy_only() {
        let (tuning, mut reg, mut tracker, mut events) = setup();
        let e1 = reg.spawn_enemy(0.0, EnemyTier::One, &tuning);
        let e2 = reg.spawn_enemy(0.0, EnemyTier::One, &tuning);
        let bullet = shoot(&mut reg, e1, &tuning);

        let began = ContactTracker::default().begin(detect(&reg));
        assert_eq!(began.len(), 2);
        let out = resolve(&mut reg, &began, &mut tracker, &tuning, &mut events);

        assert_eq!(out.kills, 1);
        assert!(reg.enemy(e1).is_none());
        assert!(reg.enemy(e2).is_some());
        assert!(reg.kind_of(bullet).is_none());
        assert_eq!(tracker.score(), 5);
    }

    #[test]
    fn test_two_bullets_on_tier_two_kill_once() {
        let (tuning, mut reg, mut tracker, mut events) = setup();
        let enemy = reg.spawn_enemy(0.0, EnemyTier::Two, &tuning);
        let b1 = shoot(&mut reg, enemy, &tuning);
        let b2 = shoot(&mut reg, enemy, &tuning);
        let b3 = shoot(&mut reg, enemy, &tuning);

        let began = ContactTracker::default().begin(detect(&reg));
        let out = resolve(&mut reg, &began, &mut tracker, &tuning, &mut events);

        assert_eq!(out.kills, 1);
        assert_eq!(tracker.score(), 5);
        assert!(reg.kind_of(b1).is_none());
        assert!(reg.kind_of(b2).is_none());
        // The enemy was gone before the third bullet resolved
        assert!(reg.kind_of(b3).is_some());
    }

    #[test]
    fn test_ramming_costs_one_life_per_contact() {
        let (tuning, mut reg, mut tracker, mut events) = setup();
        let enemy = ram(&mut reg, EnemyTier::Three, &tuning);

        let began = vec![Contact::PlayerEnemy { enemy }];
        let out = resolve(&mut reg, &began, &mut tracker, &tuning, &mut events);
        assert_eq!(out.lives_lost, 1);
        assert_eq!(tracker.lives(), 2);
        assert_eq!(reg.enemy(enemy).unwrap().hp, 2);
        assert_eq!(tracker.score(), 0);
    }

    #[test]
    fn test_ramming_kill_still_costs_a_life() {
        let (tuning, mut reg, mut tracker, mut events) = setup();
        let enemy = ram(&mut reg, EnemyTier::One, &tuning);

        let began = vec![Contact::PlayerEnemy { enemy }];
        let out = resolve(&mut reg, &began, &mut tracker, &tuning, &mut events);
        assert_eq!(out.kills, 1);
        assert_eq!(out.lives_lost, 1);
        assert_eq!(tracker.lives(), 2);
        assert_eq!(tracker.score(), 5);
        assert!(reg.enemies.is_empty());
        assert!(events.as_slice().contains(&GameEvent::EntityDestroyed { id: enemy }));
    }

    #[test]
    fn test_last_life_depletes_and_stops() {
        let (tuning, mut reg, mut tracker, mut events) = setup();
        tracker.lose_life(&mut events);
        tracker.lose_life(&mut events);
        let e1 = ram(&mut reg, EnemyTier::Two, &tuning);
        let e2 = ram(&mut reg, EnemyTier::Two, &tuning);

        let began = vec![
            Contact::PlayerEnemy { enemy: e1 },
            Contact::PlayerEnemy { enemy: e2 },
        ];
        let out = resolve(&mut reg, &began, &mut tracker, &tuning, &mut events);
        assert!(out.depleted);
        assert_eq!(tracker.lives(), 0);
        assert_eq!(reg.enemy(e2).unwrap().hp, 2);
    }

    #[test]
    fn test_pickup_restores_life_up_to_cap() {
        let (tuning, mut reg, mut tracker, mut events) = setup();
        tracker.lose_life(&mut events);

        let p1 = reg.spawn_pickup(0.0, &tuning);
        let out = resolve(
            &mut reg,
            &[Contact::PlayerPickup { pickup: p1 }],
            &mut tracker,
            &tuning,
            &mut events,
        );
        assert_eq!(out.pickups, 1);
        assert_eq!(tracker.lives(), 3);

        let p2 = reg.spawn_pickup(0.0, &tuning);
        resolve(
            &mut reg,
            &[Contact::PlayerPickup { pickup: p2 }],
            &mut tracker,
            &tuning,
            &mut events,
        );
        assert_eq!(tracker.lives(), 3);
        assert!(reg.pickups.is_empty());
    }

    #[test]
    fn test_contact_begins_once_until_separation() {
        let (tuning, mut reg, _, _) = setup();
        let enemy = ram(&mut reg, EnemyTier::Three, &tuning);
        let mut contacts = ContactTracker::default();

        assert_eq!(contacts.begin(detect(&reg)).len(), 1);
        assert!(contacts.is_touching((PLAYER_ID, enemy)));
        // Still overlapping: nothing new
        assert!(contacts.begin(detect(&reg)).is_empty());

        // Separate, then touch again
        reg.enemy_mut(enemy).unwrap().pos.y += 500.0;
        assert!(contacts.begin(detect(&reg)).is_empty());
        assert!(!contacts.is_touching((PLAYER_ID, enemy)));
        reg.enemy_mut(enemy).unwrap().pos.y -= 500.0;
        assert_eq!(contacts.begin(detect(&reg)).len(), 1);
    }

    #[test]
    fn test_resolving_missing_entities_is_noop() {
        let (tuning, mut reg, mut tracker, mut events) = setup();
        let began = vec![
            Contact::PlayerEnemy { enemy: 77 },
            Contact::PlayerPickup { pickup: 80 },
            Contact::BulletEnemy {
                bullet: 78,
                enemy: 79,
            },
        ];
        let out = resolve(&mut reg, &began, &mut tracker, &tuning, &mut events);
        assert_eq!(out, CollisionOutcome::default());
        assert_eq!(tracker.lives(), 3);
        assert!(events.is_empty());
    }
}
