//! Viewer configuration. Loaded from viewer.ron at startup.

use glam::Vec3;
use polyhand::HandConfig;
use serde::{Deserialize, Serialize};
use tracking::SyntheticHandConfig;

/// Run settings. Loaded from `viewer.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Frames to simulate before exiting.
    #[serde(default = "default_frames")]
    pub frames: u32,
    /// Simulated frame rate in Hz.
    #[serde(default = "default_rate_hz")]
    pub rate_hz: f64,
    /// Upload meshes to a GPU device when one is available.
    #[serde(default = "default_true")]
    pub gpu: bool,
    /// Where the tracking device sits in the scene.
    #[serde(default)]
    pub device_position: Vec3,
    /// Device units to scene units.
    #[serde(default = "default_device_scale")]
    pub device_scale: f32,
    #[serde(default)]
    pub hand: HandConfig,
    #[serde(default)]
    pub source: SyntheticHandConfig,
}

fn default_frames() -> u32 {
    600
}
fn default_rate_hz() -> f64 {
    60.0
}
fn default_true() -> bool {
    true
}
fn default_device_scale() -> f32 {
    1.0
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            frames: default_frames(),
            rate_hz: default_rate_hz(),
            gpu: default_true(),
            device_position: Vec3::ZERO,
            device_scale: default_device_scale(),
            hand: HandConfig::default(),
            source: SyntheticHandConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Load config from `viewer.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if let Ok(data) = std::fs::read_to_string(&path) {
            match Self::parse(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    pub fn parse(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from(".")).join("viewer.ron")
}
