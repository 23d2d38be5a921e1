//! Data-driven gameplay tuning
//!
//! Every value here is balance configuration rather than structure. Missing
//! fields in a JSON override fall back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Heart thresholds that map a final heart count onto an ending tier.
///
/// Counts are saturated at `top_hearts` before classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndingTuning {
    /// Highest count that still lands in the low ("angry") narrative
    pub low_max: u8,
    /// Highest count for the mid narrative
    pub mid_max: u8,
    /// Highest count for the high narrative
    pub high_max: u8,
    /// Saturation point; anything at or above is the top narrative
    pub top_hearts: u8,
}

impl Default for EndingTuning {
    fn default() -> Self {
        Self {
            low_max: 2,
            mid_max: 4,
            high_max: 5,
            top_hearts: 6,
        }
    }
}

/// Gameplay balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Session ===
    /// Countdown budget per session (ms)
    pub time_limit_ms: f32,
    pub start_hearts: u8,
    /// Soft ceiling for the heart count
    pub max_hearts: u8,
    /// Largest dt a single frame may advance (ms)
    pub max_frame_ms: f32,

    // === Player / companion ===
    /// Feet this far above a runner's top edge still count as clearing it (px)
    pub jump_clearance: f32,
    /// Companion stops approaching inside this horizontal gap (px)
    pub approach_gap: f32,
    /// Companion walk speed (px per reference frame)
    pub approach_speed: f32,

    // === Runners ===
    /// Running speed toward the left (px per reference frame)
    pub runner_speed: f32,
    /// Time a fallen runner stays down before respawning (ms)
    pub runner_respawn_ms: f32,
    /// Minimum distance ahead of the player for any respawn (px)
    pub runner_min_runway: f32,
    /// Continuous forward movement required after the greeting before runners start (ms)
    pub runner_gate_ms: f32,

    // === Bubbles ===
    pub bubble_spawn_interval_ms: f32,
    pub max_bubbles: usize,
    /// Minimum world-x distance from the previous spawn (px)
    pub bubble_min_gap_x: f32,
    /// Minimum vertical distance from alive bubbles (px)
    pub bubble_min_y_separation: f32,

    pub ending: EndingTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            time_limit_ms: 60_000.0,
            start_hearts: 3,
            max_hearts: 12,
            max_frame_ms: 50.0,

            jump_clearance: 6.0,
            approach_gap: 60.0,
            approach_speed: 1.6,

            runner_speed: 4.0,
            runner_respawn_ms: 800.0,
            runner_min_runway: 520.0,
            runner_gate_ms: 3000.0,

            bubble_spawn_interval_ms: 6500.0,
            max_bubbles: 4,
            bubble_min_gap_x: 260.0,
            bubble_min_y_separation: 24.0,

            ending: EndingTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load from a JSON file, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning file {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
