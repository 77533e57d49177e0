//! Whole-game invariants under random frame timing and pointer input

use proptest::prelude::*;

use space_survival::sim::{EntityKind, GameEvent, GamePhase};
use space_survival::{Game, Tuning};

#[derive(Debug, Clone)]
enum Action {
    Idle,
    Move(f32),
    Press(f32),
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => Just(Action::Idle),
        2 => (-400.0f32..400.0).prop_map(Action::Move),
        1 => (-400.0f32..400.0).prop_map(Action::Press),
    ]
}

/// Frame gaps between 1ms and 250ms, with the occasional stall
fn frame_gap() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => 0.001f64..0.05,
        1 => 0.05f64..0.25,
        1 => 0.5f64..3.0,
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn lives_score_and_interval_stay_in_range(
        seed in any::<u64>(),
        steps in prop::collection::vec((frame_gap(), action()), 1..400),
    ) {
        let tuning = Tuning::default();
        let half_w = tuning.half_width();
        let mut game = Game::new(tuning.clone(), seed);
        let mut now = 0.0;
        let mut last_score = 0;

        for (gap, act) in steps {
            let before = game.phase();
            match act {
                Action::Idle => {}
                Action::Move(x) => game.on_pointer_moved(x),
                Action::Press(x) => game.on_pointer_down(x),
            }
            now += gap;
            game.on_frame(now);

            prop_assert!(game.lives() <= tuning.max_lives);
            let interval = game.spawn_interval();
            prop_assert!(interval >= tuning.spawn_interval_min - 1e-9);
            prop_assert!(interval <= tuning.spawn_interval_start + 1e-9);

            if before == GamePhase::Playing {
                prop_assert!(game.score() >= last_score);
            }
            last_score = game.score();

            if game.phase() == GamePhase::GameOver {
                prop_assert_eq!(game.lives(), 0);
            } else {
                prop_assert!(game.lives() > 0);
            }

            let player = &game.state().registry.player;
            prop_assert!(player.x.abs() <= half_w + 1e-3);
        }
    }

    #[test]
    fn events_reference_live_ids_only_once(
        seed in any::<u64>(),
        frames in 60usize..900,
    ) {
        let mut game = Game::new(Tuning::default(), seed);
        let mut live = std::collections::BTreeSet::new();
        let mut gone = std::collections::BTreeSet::new();

        for frame in 0..frames {
            if game.phase() == GamePhase::GameOver {
                break;
            }
            game.on_frame(frame as f64 / 60.0);
            for event in game.drain_events() {
                match event {
                    GameEvent::EntityCreated { kind, id, .. } => {
                        prop_assert!(live.insert(id), "id {} created twice", id);
                        prop_assert!(!gone.contains(&id), "id {} reused", id);
                        if kind == EntityKind::Player {
                            prop_assert_eq!(id, 0);
                        }
                    }
                    GameEvent::EntityDestroyed { id } => {
                        prop_assert!(live.remove(&id), "id {} destroyed while not live", id);
                        gone.insert(id);
                    }
                    GameEvent::EntityMoved { id, .. } => {
                        prop_assert!(live.contains(&id), "id {} moved while not live", id);
                    }
                    _ => {}
                }
            }
        }

        prop_assert_eq!(live.len(), game.state().registry.len());
    }

    #[test]
    fn same_seed_same_run(seed in any::<u64>(), frames in 1usize..600) {
        let run = || {
            let mut game = Game::new(Tuning::default(), seed);
            for frame in 0..frames {
                game.on_frame(frame as f64 / 60.0);
            }
            game.snapshot()
        };
        prop_assert_eq!(run(), run());
    }
}
