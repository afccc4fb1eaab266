//! Gameplay settings
//!
//! Tunables for the session rules. Loaded from JSON next to the level, any
//! missing field falls back to its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Gameplay tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Upward velocity added by a jump
    pub jump_impulse: f32,

    // === NPC spawning ===
    /// Seconds between NPC spawns
    pub spawn_interval: f32,
    /// No spawns while this many NPCs are alive
    pub max_npcs: usize,
    /// Only the first doors in the level are spawn points
    pub max_doors: usize,

    /// Dead entities below this y are removed
    pub reap_depth: f32,

    // === Session timers (seconds) ===
    /// Time after a death before NPCs are cleared and the ready screen shows
    pub death_countdown: f32,
    /// Time after a death at which play resumes
    pub ready_end: f32,
    /// Time on the win screen before the level reloads
    pub win_duration: f32,

    /// Seed for NPC spawn doors and wander targets
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jump_impulse: 200.0,
            spawn_interval: 5.0,
            max_npcs: 4,
            max_doors: 4,
            reap_depth: 400.0,
            death_countdown: 3.0,
            ready_end: 6.0,
            win_duration: 5.0,
            seed: 0x5eed,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a file, falling back to defaults if it is missing
    /// or malformed.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path)
            .map_err(SimError::from)
            .and_then(|json| Self::from_json(&json))
        {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = Settings::from_json(r#"{ "max_npcs": 2, "seed": 7 }"#).unwrap();
        assert_eq!(s.max_npcs, 2);
        assert_eq!(s.seed, 7);
        assert_eq!(s.spawn_interval, 5.0);
        assert_eq!(s.jump_impulse, 200.0);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{ max_npcs: }"),
            Err(SimError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let s = Settings::load_or_default("/nonexistent/burger-settings.json");
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let s = Settings {
            reap_depth: 500.0,
            ..Default::default()
        };
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(s, back);
    }
}
