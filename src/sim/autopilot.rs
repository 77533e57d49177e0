//! Demo steering policy
//!
//! Plays the game hands-free for the headless demo: sidestep an enemy that is
//! about to ram the ship, collect a pickup while hurt, otherwise line up under
//! the lowest enemy so autofire hits it.

use super::state::{EntityKind, EntityRegistry, size_of};
use crate::tuning::Tuning;

/// How far above the ship (points) an enemy counts as an incoming threat
const THREAT_LOOKAHEAD: f32 = 260.0;
/// Extra clearance kept when sidestepping
const DODGE_MARGIN: f32 = 6.0;

/// Pick a lateral target for the ship, `None` to keep still
pub fn steer(registry: &EntityRegistry, lives: u8, tuning: &Tuning) -> Option<f32> {
    let player = &registry.player;
    let half_w = player.size.x / 2.0;
    let top = player.y + player.size.y / 2.0;

    // Closest enemy whose column overlaps the ship and is coming down on it
    let threat = registry
        .enemies
        .iter()
        .filter(|e| {
            let below = e.pos.y - e.size.y / 2.0 - top;
            below > -player.size.y && below < THREAT_LOOKAHEAD
        })
        .filter(|e| (e.pos.x - player.x).abs() < half_w + e.size.x / 2.0 + DODGE_MARGIN)
        .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    if let Some(enemy) = threat {
        let clearance = half_w + enemy.size.x / 2.0 + DODGE_MARGIN;
        let left = enemy.pos.x - clearance;
        let right = enemy.pos.x + clearance;
        let limit = tuning.half_width() - half_w;
        // Prefer the nearer side that stays on the field
        let go_left = if left < -limit {
            false
        } else if right > limit {
            true
        } else {
            (player.x - left).abs() <= (right - player.x).abs()
        };
        return Some(if go_left { left } else { right });
    }

    if lives < tuning.max_lives {
        let pickup_h = size_of(EntityKind::Pickup, tuning).y;
        if let Some(pickup) = registry
            .pickups
            .iter()
            .filter(|p| p.pos.y - pickup_h > player.y)
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        {
            return Some(pickup.pos.x);
        }
    }

    registry
        .enemies
        .iter()
        .filter(|e| e.pos.y < tuning.half_height())
        .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|e| e.pos.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::EnemyTier;

    #[test]
    fn test_idle_when_field_empty() {
        let tuning = Tuning::default();
        let reg = EntityRegistry::new(&tuning);
        assert_eq!(steer(&reg, 3, &tuning), None);
    }

    #[test]
    fn test_dodges_incoming_enemy() {
        let tuning = Tuning::default();
        let mut reg = EntityRegistry::new(&tuning);
        let id = reg.spawn_enemy(5.0, EnemyTier::One, &tuning);
        let y = reg.player.y + 100.0;
        reg.enemy_mut(id).unwrap().pos.y = y;

        let target = steer(&reg, 3, &tuning).unwrap();
        let enemy = reg.enemy(id).unwrap();
        let gap = (target - enemy.pos.x).abs();
        assert!(gap >= (reg.player.size.x + enemy.size.x) / 2.0);
        assert!(target.abs() <= tuning.half_width());
    }

    #[test]
    fn test_goes_for_pickup_when_hurt() {
        let tuning = Tuning::default();
        let mut reg = EntityRegistry::new(&tuning);
        reg.spawn_pickup(-120.0, &tuning);
        reg.spawn_enemy(80.0, EnemyTier::One, &tuning);
        reg.enemies[0].pos.y = 0.0;

        assert_eq!(steer(&reg, 2, &tuning), Some(-120.0));
        // At full lives the pickup is ignored
        assert_eq!(steer(&reg, 3, &tuning), Some(80.0));
    }
}
