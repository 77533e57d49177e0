//! Space Survival headless runner
//!
//! Drives the simulation core at a fixed frame rate with the demo autopilot
//! steering, the way a renderer would drive it, and reports what happened.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use space_survival::sim::autopilot;
use space_survival::sim::{EntityKind, GameEvent, GamePhase};
use space_survival::{Game, Tuning, TuningError};

#[derive(Debug, Parser)]
#[command(name = "space-survival", about = "Run the survival shooter core headless")]
struct Args {
    /// RNG seed for the run
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Simulated seconds to run for
    #[arg(long, default_value_t = 120.0)]
    seconds: f64,

    /// Frames per simulated second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// JSON balance file (missing fields use the shipped values)
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// How many times to restart after a game over
    #[arg(long, default_value_t = 0)]
    restarts: u32,

    /// Print the final snapshot as JSON
    #[arg(long)]
    dump: bool,

    /// Print the shipped balance as JSON and exit
    #[arg(long)]
    print_tuning: bool,
}

/// Per-run tallies collected from events
#[derive(Debug, Default)]
struct RunStats {
    created: HashMap<EntityKind, u32>,
    destroyed: u32,
    game_overs: u32,
    best_score: u64,
}

fn run(args: &Args) -> Result<(), TuningError> {
    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };

    let fps = args.fps.max(1);
    let frames = (args.seconds * fps as f64).ceil() as u64;
    let mut game = Game::new(tuning, args.seed);
    let mut stats = RunStats::default();
    let mut restarts_left = args.restarts;

    log::info!(
        "Running {} frames at {} fps (seed {})",
        frames,
        fps,
        args.seed
    );

    for frame in 0..frames {
        let now = frame as f64 / fps as f64;

        match game.phase() {
            GamePhase::GameOver => {
                if restarts_left == 0 {
                    break;
                }
                restarts_left -= 1;
                game.on_pointer_down(0.0);
            }
            GamePhase::Playing => {
                let state = game.state();
                if let Some(x) = autopilot::steer(&state.registry, game.lives(), game.tuning()) {
                    game.on_pointer_moved(x);
                }
            }
            GamePhase::Initializing => {}
        }

        game.on_frame(now);

        for event in game.drain_events() {
            match event {
                GameEvent::EntityCreated { kind, .. } => {
                    *stats.created.entry(kind).or_default() += 1;
                }
                GameEvent::EntityDestroyed { .. } => stats.destroyed += 1,
                GameEvent::ScoreChanged { score } => {
                    stats.best_score = stats.best_score.max(score);
                }
                GameEvent::GameOverEntered => stats.game_overs += 1,
                GameEvent::LivesChanged { lives } => log::debug!("lives: {}", lives),
                GameEvent::GameReset => log::debug!("reset at frame {}", frame),
                GameEvent::EntityMoved { .. } => {}
            }
        }
    }

    let created = |kind: EntityKind| stats.created.get(&kind).copied().unwrap_or(0);
    log::info!(
        "Finished: phase {:?}, score {}, lives {}, elapsed {:.1}s",
        game.phase(),
        game.score(),
        game.lives(),
        game.elapsed()
    );
    log::info!(
        "Spawned {} enemies, {} pickups, {} bullets; {} removed; {} game over(s); best score {}",
        created(EntityKind::Enemy),
        created(EntityKind::Pickup),
        created(EntityKind::Bullet),
        stats.destroyed,
        stats.game_overs,
        stats.best_score
    );

    if args.dump {
        match serde_json::to_string_pretty(&game.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(e) => log::warn!("Failed to serialize snapshot: {}", e),
        }
    } else {
        println!(
            "score {} lives {} elapsed {:.1}s phase {:?}",
            game.score(),
            game.lives(),
            game.elapsed(),
            game.phase()
        );
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.print_tuning {
        println!("{}", Tuning::default().to_json());
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
