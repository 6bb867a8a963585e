// SPDX-License-Identifier: MIT OR Apache-2.0
//! Player settings.
//!
//! Settings are stored as RON next to the timeline and control the fixed
//! simulation step and the loop/repeat behavior. Command-line flags override
//! individual fields.

use keyline_sequencer::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current player settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Headless playback settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Settings format version
    pub version: u32,
    /// Simulation steps per second
    pub frame_rate: f32,
    /// Upper bound on simulated frames (stops endless loops)
    pub max_frames: u32,
    /// Start playing as soon as the timeline is loaded
    pub play_on_start: bool,
    /// Stop and restore the scene once playback ends
    pub restore_on_finish: bool,
    /// Loop and repeat settings
    pub playback: PlaybackConfig,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            frame_rate: 60.0,
            max_frames: 36_000,
            play_on_start: true,
            restore_on_finish: false,
            playback: PlaybackConfig::default(),
        }
    }
}

impl PlayerSettings {
    /// Load settings from a file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_ron(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;

        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Settings version {} is newer than supported version {}",
                    settings.version, SETTINGS_FORMAT_VERSION
                ),
            ));
        }

        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let content = self.to_ron().map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Serialize to RON format
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize from RON format
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    /// Seconds advanced per simulated frame.
    ///
    /// Non-positive frame rates fall back to the default rate.
    pub fn frame_delta(&self) -> f32 {
        if self.frame_rate.is_finite() && self.frame_rate > 0.0 {
            1.0 / self.frame_rate
        } else {
            tracing::warn!("Invalid frame rate {}, using 60", self.frame_rate);
            1.0 / 60.0
        }
    }
}
