//! Burger Girl - a burger-stacking platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, movement modes, game rules)
//! - `runner`: Fixed-timestep accumulator driving the simulation from wall-clock time
//! - `settings`: Data-driven gameplay tuning
//! - `error`: Crate-wide error type

pub mod error;
pub mod runner;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use runner::FixedStepRunner;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per runner call to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest wall-clock delta the runner accepts per call (seconds)
    pub const MAX_FRAME_DELTA: f32 = 0.1;

    /// Hard cap on live entities
    pub const MAX_ENTITIES: usize = 256;
    /// Hard cap on simultaneous contacts per entity
    pub const MAX_CONTACTS: usize = 8;
    /// Memory pool reserved at startup (bytes)
    pub const POOL_BYTES: usize = 1024 * 1024;

    /// Logical display size, used for NPC wander targets
    pub const DISPLAY_WIDTH: f32 = 320.0;
    pub const DISPLAY_HEIGHT: f32 = 270.0;
}
