//! Finger joint chains.

use crate::TrackingError;
use engine_core::safe_normalize;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Bones per tracked finger: metacarpal, proximal, intermediate, distal.
pub const NUM_BONES: usize = 4;
/// Joints per tracked finger (one more than bones).
pub const NUM_JOINTS: usize = NUM_BONES + 1;

/// Read access to one finger's skeleton in device space.
pub trait FingerSkeleton {
    /// Number of joints in the chain.
    fn num_joints(&self) -> usize;

    /// Number of bones, always `num_joints() - 1`.
    fn num_bones(&self) -> usize {
        self.num_joints().saturating_sub(1)
    }

    /// Position of joint `joint`, or `Vec3::ZERO` past the end of the chain.
    fn joint_position(&self, joint: usize) -> Vec3;

    /// Unit direction of bone `bone` (joint `bone` to joint `bone + 1`).
    ///
    /// Indices outside `0..num_bones()` (including `-1`) yield `Vec3::ZERO`.
    fn bone_direction(&self, bone: isize) -> Vec3;
}

/// Which finger a chain belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FingerType {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl FingerType {
    pub const ALL: [FingerType; 5] = [
        FingerType::Thumb,
        FingerType::Index,
        FingerType::Middle,
        FingerType::Ring,
        FingerType::Pinky,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            FingerType::Thumb => "thumb",
            FingerType::Index => "index",
            FingerType::Middle => "middle",
            FingerType::Ring => "ring",
            FingerType::Pinky => "pinky",
        }
    }
}

/// An owned joint chain with one direction per bone.
#[derive(Debug, Clone, PartialEq)]
pub struct FingerChain {
    joints: Vec<Vec3>,
    directions: Vec<Vec3>,
}

impl FingerChain {
    /// Build a chain from joint positions, deriving each bone direction from
    /// consecutive joints. Coincident joints give a zero direction.
    pub fn from_joints(joints: Vec<Vec3>) -> Result<Self, TrackingError> {
        if joints.len() < 2 {
            return Err(TrackingError::TooFewJoints(joints.len()));
        }
        let directions = joints
            .windows(2)
            .map(|pair| safe_normalize(pair[1] - pair[0]))
            .collect();
        Ok(Self { joints, directions })
    }

    /// Build a chain from joint positions and device-reported bone directions.
    pub fn with_directions(joints: Vec<Vec3>, directions: Vec<Vec3>) -> Result<Self, TrackingError> {
        if joints.len() < 2 {
            return Err(TrackingError::TooFewJoints(joints.len()));
        }
        if directions.len() != joints.len() - 1 {
            return Err(TrackingError::DirectionCount {
                expected: joints.len() - 1,
                actual: directions.len(),
            });
        }
        Ok(Self { joints, directions })
    }

    pub fn joints(&self) -> &[Vec3] {
        &self.joints
    }

    pub fn directions(&self) -> &[Vec3] {
        &self.directions
    }

    /// Total length of the chain.
    pub fn length(&self) -> f32 {
        self.joints.windows(2).map(|pair| pair[0].distance(pair[1])).sum()
    }
}

impl FingerSkeleton for FingerChain {
    fn num_joints(&self) -> usize {
        self.joints.len()
    }

    fn joint_position(&self, joint: usize) -> Vec3 {
        self.joints.get(joint).copied().unwrap_or(Vec3::ZERO)
    }

    fn bone_direction(&self, bone: isize) -> Vec3 {
        usize::try_from(bone)
            .ok()
            .and_then(|b| self.directions.get(b))
            .copied()
            .unwrap_or(Vec3::ZERO)
    }
}
