//! Cross-section settings per finger, loadable from RON.

use crate::{PolyHandError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracking::FingerType;

/// Fewest sides that still enclose an area.
pub const MIN_SIDES: usize = 3;
/// Most sides a finger tube may have.
pub const MAX_SIDES: usize = 12;
/// Offset scale from the joint axis to the tube surface.
pub const DEFAULT_RADIUS: f32 = 0.2;

/// Placement of ring vertices in the smooth vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RingLayout {
    /// Rings for the first `num_bones` joints, `num_joints` slots apart.
    ///
    /// Rings overlap when `sides > num_joints` and the last joint gets no ring.
    /// This is the geometry existing hand assets were tuned against.
    #[default]
    JointStride,
    /// One ring per joint, packed `sides` slots apart.
    SideStride,
}

/// Shape of a finger tube's cross-section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSectionConfig {
    /// Polygon sides around the tube.
    #[serde(default = "default_sides")]
    pub sides: usize,
    /// Rotation of side 0 about the joint axis, in degrees.
    #[serde(default)]
    pub starting_angle: f32,
    /// Shared rings (smooth) instead of independent quads (faceted).
    #[serde(default)]
    pub smooth_normals: bool,
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default)]
    pub ring_layout: RingLayout,
}

fn default_sides() -> usize {
    4
}
fn default_radius() -> f32 {
    DEFAULT_RADIUS
}

impl Default for CrossSectionConfig {
    fn default() -> Self {
        Self {
            sides: default_sides(),
            starting_angle: 0.0,
            smooth_normals: false,
            radius: default_radius(),
            ring_layout: RingLayout::default(),
        }
    }
}

impl CrossSectionConfig {
    pub fn faceted(sides: usize) -> Self {
        Self {
            sides,
            ..Default::default()
        }
    }

    pub fn smooth(sides: usize) -> Self {
        Self {
            sides,
            smooth_normals: true,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sides < MIN_SIDES || self.sides > MAX_SIDES {
            return Err(PolyHandError::InvalidConfiguration {
                reason: format!("sides must be in {}..={}, got {}", MIN_SIDES, MAX_SIDES, self.sides),
            });
        }
        if !self.radius.is_finite() {
            return Err(PolyHandError::InvalidConfiguration {
                reason: format!("radius must be finite, got {}", self.radius),
            });
        }
        if !self.starting_angle.is_finite() {
            return Err(PolyHandError::InvalidConfiguration {
                reason: format!("starting angle must be finite, got {}", self.starting_angle),
            });
        }
        Ok(())
    }
}

/// Cross-sections for a whole hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandConfig {
    /// Used by every finger without an override.
    #[serde(default)]
    pub default: CrossSectionConfig,
    #[serde(default)]
    pub overrides: HashMap<FingerType, CrossSectionConfig>,
}

impl HandConfig {
    pub fn uniform(section: CrossSectionConfig) -> Self {
        Self {
            default: section,
            overrides: HashMap::new(),
        }
    }

    /// Cross-section for `finger`.
    pub fn section(&self, finger: FingerType) -> &CrossSectionConfig {
        self.overrides.get(&finger).unwrap_or(&self.default)
    }

    /// Parse a RON hand config. `path` only labels errors.
    pub fn from_ron_str(data: &str, path: &Path) -> Result<Self> {
        ron::from_str(data).map_err(|source| PolyHandError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from a RON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|source| PolyHandError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&data, path)
    }

    /// Load from a RON file, falling back to defaults when it is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(PolyHandError::Io { .. }) => Self::default(),
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }
}
