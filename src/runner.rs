//! Fixed-timestep runner
//!
//! Turns variable wall-clock frame times into whole simulation ticks.

use crate::consts::{MAX_FRAME_DELTA, MAX_SUBSTEPS, SIM_DT};
use crate::error::SimError;
use crate::sim::{SimulationState, TickInput, tick};

/// Accumulates elapsed time and runs `tick` once per `SIM_DT` of it
#[derive(Debug, Clone, Default)]
pub struct FixedStepRunner {
    accumulator: f32,
    ticks: u64,
}

impl FixedStepRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Time carried over to the next call, as a fraction of a tick
    pub fn alpha(&self) -> f32 {
        self.accumulator / SIM_DT
    }

    /// Account for `elapsed` seconds of wall-clock time and run the ticks it
    /// pays for. Returns how many ran.
    ///
    /// Deltas are clamped to `MAX_FRAME_DELTA` and at most `MAX_SUBSTEPS`
    /// ticks run per call. `start` is a one-shot input and is cleared once a
    /// tick has seen it.
    pub fn advance(
        &mut self,
        state: &mut SimulationState,
        input: &mut TickInput,
        elapsed: f32,
    ) -> Result<u32, SimError> {
        if !elapsed.is_finite() {
            log::warn!("Ignoring non-finite frame time {}", elapsed);
            return Ok(0);
        }
        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_DELTA);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, input, SIM_DT)?;
            self.accumulator -= SIM_DT;
            self.ticks += 1;
            substeps += 1;

            input.start = false;
            if state.flags.quit {
                self.accumulator = 0.0;
                break;
            }
        }
        Ok(substeps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{EntityKind, Level, LevelRecord, Screen, SpriteTable};

    fn state() -> SimulationState {
        let level = Level {
            name: "runner".into(),
            entities: vec![
                LevelRecord::new(0, EntityKind::Player, 100.0, 100.0),
                LevelRecord::new(1, EntityKind::Platform, 160.0, 110.0).sized(320.0, 4.0),
            ],
        };
        SimulationState::new(level, Settings::default(), SpriteTable::default()).unwrap()
    }

    #[test]
    fn test_accumulates_partial_frames() {
        let mut s = state();
        let mut runner = FixedStepRunner::new();
        let mut input = TickInput::default();

        assert_eq!(runner.advance(&mut s, &mut input, SIM_DT * 0.6).unwrap(), 0);
        assert_eq!(runner.advance(&mut s, &mut input, SIM_DT * 0.6).unwrap(), 1);
        assert!((runner.alpha() - 0.2).abs() < 1e-3);
        assert_eq!(s.frame, 1);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut s = state();
        let mut runner = FixedStepRunner::new();
        let mut input = TickInput::default();

        // A 2 s hitch only pays for MAX_FRAME_DELTA
        let ran = runner.advance(&mut s, &mut input, 2.0).unwrap();
        assert!(ran >= 5 && ran < MAX_SUBSTEPS);
        assert!(runner.alpha() < 1.0);
    }

    #[test]
    fn test_non_finite_frame_time_is_ignored() {
        let mut s = state();
        let mut runner = FixedStepRunner::new();
        let mut input = TickInput::default();

        assert_eq!(runner.advance(&mut s, &mut input, f32::NAN).unwrap(), 0);
        assert_eq!(runner.advance(&mut s, &mut input, f32::INFINITY).unwrap(), 0);
        assert_eq!(runner.alpha(), 0.0);

        // Later frames still run
        assert_eq!(runner.advance(&mut s, &mut input, SIM_DT * 1.5).unwrap(), 1);
        assert_eq!(s.frame, 1);
    }

    #[test]
    fn test_start_is_one_shot() {
        let mut s = state();
        let mut runner = FixedStepRunner::new();
        let mut input = TickInput {
            start: true,
            ..Default::default()
        };
        runner.advance(&mut s, &mut input, SIM_DT * 3.5).unwrap();
        assert!(!input.start);
        assert_eq!(s.screen(), Screen::Playing);
        assert_eq!(runner.ticks(), 3);
    }

    #[test]
    fn test_quit_stops_the_batch() {
        let mut s = state();
        let mut runner = FixedStepRunner::new();
        let mut input = TickInput {
            quit: true,
            ..Default::default()
        };
        assert_eq!(runner.advance(&mut s, &mut input, 0.09).unwrap(), 1);
        assert!(s.flags.quit);
    }
}
