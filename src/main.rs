//! Hop Survivors headless runner
//!
//! Drives the deterministic sim with a scripted input loop and prints the run
//! summary. Useful for balance iteration and replay debugging; a renderer
//! front-end consumes the same `GameState` + `tick` API.

use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;

use hop_survivors::Tuning;
use hop_survivors::consts::SIM_DT;
use hop_survivors::sim::{GamePhase, GameState, TickInput, tick};

fn main() {
    env_logger::init();

    let mut args = env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => match arg.parse::<u64>() {
            Ok(seed) => seed,
            Err(_) => {
                eprintln!("usage: hop-survivors [seed] [seconds] [tuning.json]");
                std::process::exit(2);
            }
        },
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0),
    };
    let seconds: f32 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(90.0);

    let tuning = match args.next() {
        Some(path) => match load_tuning(&path) {
            Ok(tuning) => tuning,
            Err(err) => {
                eprintln!("failed to load tuning from {path}: {err}");
                std::process::exit(2);
            }
        },
        None => Tuning::default(),
    };

    log::info!("starting run: seed {seed}, {seconds}s");

    let mut state = GameState::new(seed, tuning);
    let ticks = (seconds / SIM_DT).round() as u64;

    for i in 0..ticks {
        let input = scripted_input(i);
        tick(&mut state, &input, SIM_DT);
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    println!("seed:        {seed}");
    println!("survived:    {:.1}s", state.clock.elapsed());
    println!("score:       {}", state.clock.score());
    println!("wave:        {}", state.wave_index);
    println!("enemies out: {}", state.enemies.len());
    println!(
        "outcome:     {}",
        if state.phase == GamePhase::GameOver {
            "died"
        } else {
            "survived"
        }
    );
}

fn load_tuning(path: &str) -> Result<Tuning, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(Tuning::from_json(&json)?)
}

/// Simple orbit-and-dodge script: hold a direction for a while, pause to let
/// hops land, rotate. Exercises charge, chain bounces, and stops.
fn scripted_input(tick_index: u64) -> TickInput {
    let phase = (tick_index / 90) % 5;
    let move_dir = match phase {
        0 => Vec2::new(1.0, 0.0),
        1 => Vec2::new(0.0, 1.0),
        2 => Vec2::ZERO,
        3 => Vec2::new(-1.0, 0.0),
        _ => Vec2::new(0.0, -1.0),
    };
    TickInput { move_dir }
}
