// SPDX-License-Identifier: MIT OR Apache-2.0
//! Application configuration.
//!
//! A RON file describing the simulated scene (clip lengths, frame rate),
//! the track topology, where the train starts, and the timed script the
//! demo run executes. Every field has a default, so a missing file or an
//! empty `()` document still yields a runnable demo.

use express_track::Topology;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One timed entry of the demo script.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedAction {
    /// Simulated time at which the action fires, in milliseconds.
    pub at_ms: f32,
    /// What to do.
    pub action: ScriptAction,
}

/// Actions the demo script can drive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScriptAction {
    /// Ramp the train to the given signed speed.
    AccelerateTo(f32),
    /// Ramp the train to a standstill.
    Stop,
    /// Sound the horn.
    BlowHorn,
    /// Flip the junction.
    ToggleJunction,
}

/// Errors raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid RON.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Nominal animation frame rate (frames per second at rate 1.0).
    pub frame_rate: f32,
    /// Simulation timestep in milliseconds.
    pub timestep_ms: f32,
    /// Total simulated run time in milliseconds.
    pub run_for_ms: f32,
    /// Length in frames of every `path.section.*` clip.
    pub section_frames: u32,
    /// Length in frames of the looping wheel clip.
    pub wheel_frames: u32,
    /// Horn sample length in milliseconds.
    pub horn_ms: f32,
    /// Section the train starts on.
    pub initial_section: u32,
    /// Fractional offset of the starting position.
    pub initial_offset: f32,
    /// Track network.
    pub topology: Topology,
    /// Audio files per speaker object name, used by the `audio` feature.
    pub sounds: IndexMap<String, PathBuf>,
    /// Timed actions driving the demo run.
    pub script: Vec<ScriptedAction>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            frame_rate: 24.0,
            timestep_ms: 1000.0 / 60.0,
            run_for_ms: 60_000.0,
            section_frames: 600,
            wheel_frames: 24,
            horn_ms: 2500.0,
            initial_section: 1,
            initial_offset: 0.39,
            topology: Topology::express(),
            sounds: IndexMap::new(),
            script: vec![
                ScriptedAction {
                    at_ms: 500.0,
                    action: ScriptAction::AccelerateTo(2.0),
                },
                ScriptedAction {
                    at_ms: 1_000.0,
                    action: ScriptAction::BlowHorn,
                },
                ScriptedAction {
                    at_ms: 15_000.0,
                    action: ScriptAction::ToggleJunction,
                },
                ScriptedAction {
                    at_ms: 30_000.0,
                    action: ScriptAction::AccelerateTo(-1.5),
                },
                ScriptedAction {
                    at_ms: 50_000.0,
                    action: ScriptAction::Stop,
                },
            ],
        }
    }
}

impl AppConfig {
    /// Load a configuration from a RON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use express_track::TrackGraph;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(TrackGraph::from_topology(&config.topology).is_ok());
        assert!(config.timestep_ms > 0.0);
        assert!(!config.script.is_empty());
    }

    #[test]
    fn test_serialization() {
        let config = AppConfig::default();
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default())
            .unwrap();
        let loaded: AppConfig = ron::from_str(&text).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let loaded: AppConfig = ron::from_str("()").unwrap();
        assert_eq!(loaded, AppConfig::default());
    }
}
