//! Burger Girl headless driver
//!
//! Loads a level, starts play and runs it for a number of simulated seconds
//! with no player input, then prints the final render snapshot as JSON.
//!
//! Usage: burger-girl [LEVEL] [SECONDS] [SETTINGS]

use std::process::ExitCode;

use burger_girl::consts::SIM_DT;
use burger_girl::sim::{Level, SimulationState, SpriteManifest, SpriteTable, TickInput};
use burger_girl::{FixedStepRunner, Settings, SimError};

const DEFAULT_LEVEL: &str = "assets/levels/burger.json";
const SPRITE_MANIFEST: &str = "assets/sprites.json";
const DEFAULT_SECONDS: f32 = 30.0;

fn run(level_path: &str, seconds: f32, settings: Settings) -> Result<String, SimError> {
    let sprites = SpriteTable::checked(&SpriteManifest::load(SPRITE_MANIFEST)?)?;
    let level = Level::load(level_path)?;
    let mut state = SimulationState::new(level, settings, sprites)?;
    log::info!("Playing '{}'", state.level().name);
    let mut runner = FixedStepRunner::new();
    let mut input = TickInput {
        start: true,
        ..Default::default()
    };

    let mut screen = state.screen();
    let mut remaining = seconds;
    while remaining > 0.0 && !state.flags.quit {
        // Feed the runner in display-frame sized slices
        let elapsed = remaining.min(SIM_DT);
        runner.advance(&mut state, &mut input, elapsed)?;
        remaining -= elapsed;

        if state.screen() != screen {
            screen = state.screen();
            log::info!("Frame {}: screen {:?}", state.frame, screen);
        }
    }

    log::info!(
        "Ran {} ticks, {} entities live",
        runner.ticks(),
        state.store.len()
    );
    Ok(serde_json::to_string_pretty(&state.snapshot())?)
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Burger Girl (headless) starting...");

    let mut args = std::env::args().skip(1);
    let level_path = args.next().unwrap_or_else(|| DEFAULT_LEVEL.to_string());
    let seconds = match args.next().map(|s| s.parse::<f32>()) {
        None => DEFAULT_SECONDS,
        Some(Ok(s)) => s,
        Some(Err(e)) => {
            log::error!("Invalid SECONDS argument: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let settings = args
        .next()
        .map(|path| Settings::load_or_default(path))
        .unwrap_or_default();

    match run(&level_path, seconds, settings) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
