//! Motion integration and offscreen culling

use super::events::{EventQueue, GameEvent};
use super::score::ScoreAndLives;
use super::state::{EntityRegistry, PLAYER_ID, RemovalSet};
use crate::approach;
use crate::tuning::Tuning;

/// Advance every entity by `dt` seconds
pub fn integrate(registry: &mut EntityRegistry, dt: f32, tuning: &Tuning, events: &mut EventQueue) {
    if dt <= 0.0 {
        return;
    }

    // Player glides toward its target at a fixed lateral speed
    let player = &mut registry.player;
    if let Some(target) = player.target_x {
        let before = player.x;
        player.x = approach(player.x, target, tuning.player_speed * dt);
        if player.x == target {
            player.target_x = None;
        }
        if player.x != before {
            events.push(GameEvent::EntityMoved {
                id: PLAYER_ID,
                pos: player.pos(),
            });
        }
    }

    for enemy in &mut registry.enemies {
        enemy.pos.y -= enemy.speed * dt;
        events.push(GameEvent::EntityMoved {
            id: enemy.id,
            pos: enemy.pos,
        });
    }

    for pickup in &mut registry.pickups {
        pickup.pos.y -= pickup.speed * dt;
        events.push(GameEvent::EntityMoved {
            id: pickup.id,
            pos: pickup.pos,
        });
    }

    for bullet in &mut registry.bullets {
        bullet.pos.y += bullet.speed * dt;
        events.push(GameEvent::EntityMoved {
            id: bullet.id,
            pos: bullet.pos,
        });
    }
}

/// Remove entities that left the play field.
///
/// Escaped enemies pay the escape reward; bullets and pickups leave quietly.
/// Returns the number of enemies that escaped.
pub fn cull(
    registry: &mut EntityRegistry,
    tuning: &Tuning,
    tracker: &mut ScoreAndLives,
    events: &mut EventQueue,
) -> usize {
    let bottom = -tuning.half_height();
    let top = tuning.half_height();
    let mut removals = RemovalSet::new();
    let mut escaped = 0;

    for enemy in &registry.enemies {
        if enemy.pos.y < bottom - enemy.size.y && removals.mark(enemy.id) {
            escaped += 1;
        }
    }
    for bullet in &registry.bullets {
        if bullet.pos.y > top + bullet.size.y {
            removals.mark(bullet.id);
        }
    }
    for pickup in &registry.pickups {
        if pickup.pos.y < bottom - pickup.size.y {
            removals.mark(pickup.id);
        }
    }

    for id in registry.sweep(&removals) {
        events.push(GameEvent::EntityDestroyed { id });
    }
    for _ in 0..escaped {
        tracker.add_score(tuning.escape_reward, events);
    }
    if escaped > 0 {
        log::debug!("{} enemies escaped", escaped);
    }
    escaped
}
