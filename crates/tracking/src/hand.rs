//! One tracked hand for one frame.

use crate::{FingerChain, FingerType};
use glam::Vec3;

/// Hand skeleton for a single frame, in device space.
#[derive(Debug, Clone, PartialEq)]
pub struct HandFrame {
    /// Unit vector out of the palm.
    pub palm_normal: Vec3,
    /// Unit vector from the palm towards the fingers.
    pub direction: Vec3,
    /// Finger chains indexed by [`FingerType::index`]. `None` when not tracked.
    pub fingers: [Option<FingerChain>; 5],
}

impl Default for HandFrame {
    fn default() -> Self {
        Self {
            palm_normal: Vec3::NEG_Y,
            direction: Vec3::NEG_Z,
            fingers: Default::default(),
        }
    }
}

impl HandFrame {
    pub fn finger(&self, finger: FingerType) -> Option<&FingerChain> {
        self.fingers[finger.index()].as_ref()
    }

    pub fn set_finger(&mut self, finger: FingerType, chain: FingerChain) {
        self.fingers[finger.index()] = Some(chain);
    }

    /// Number of fingers tracked this frame.
    pub fn tracked_count(&self) -> usize {
        self.fingers.iter().filter(|f| f.is_some()).count()
    }
}
