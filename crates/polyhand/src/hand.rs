//! Hand assembler: one tube finger per tracked finger, rebuilt every frame.

use crate::{FingerModel, HandConfig, MeshBuffer, PolyFinger, Result};
use engine_core::Transform;
use tracking::{FingerType, HandFrame};

/// A hand that can rebuild all of its fingers from a tracking frame.
pub trait HandModel {
    fn init_hand(&mut self, frame: &HandFrame, device: &Transform) -> Result<()>;

    /// Same as [`HandModel::init_hand`]: there is no first-build state.
    fn update_hand(&mut self, frame: &HandFrame, device: &Transform) -> Result<()> {
        self.init_hand(frame, device)
    }
}

/// Deforming low-poly hand.
#[derive(Debug, Clone, Default)]
pub struct PolyHand {
    /// Indexed by [`FingerType::index`].
    fingers: [Option<PolyFinger>; 5],
}

impl PolyHand {
    /// Hand with all five fingers, shaped per `config`.
    pub fn new(config: &HandConfig) -> Result<Self> {
        let mut hand = Self::default();
        for finger in FingerType::ALL {
            hand.fingers[finger.index()] = Some(PolyFinger::new(config.section(finger).clone())?);
        }
        Ok(hand)
    }

    pub fn finger(&self, finger: FingerType) -> Option<&PolyFinger> {
        self.fingers[finger.index()].as_ref()
    }

    pub fn finger_mut(&mut self, finger: FingerType) -> Option<&mut PolyFinger> {
        self.fingers[finger.index()].as_mut()
    }

    /// Install or remove the model for one finger.
    pub fn set_finger(&mut self, finger: FingerType, model: Option<PolyFinger>) {
        self.fingers[finger.index()] = model;
    }

    /// Meshes of every finger that has a model, for upload.
    pub fn finger_meshes(&self) -> impl Iterator<Item = (FingerType, &MeshBuffer)> + '_ {
        FingerType::ALL
            .into_iter()
            .filter_map(move |f| self.finger(f).map(|model| (f, model.mesh())))
    }
}

impl HandModel for PolyHand {
    /// Fingers missing from `frame` keep the mesh from their last build.
    fn init_hand(&mut self, frame: &HandFrame, device: &Transform) -> Result<()> {
        let palm_normal = device.transform_direction(frame.palm_normal);
        let palm_direction = device.transform_direction(frame.direction);

        let mut built = 0;
        for finger in FingerType::ALL {
            let (Some(model), Some(chain)) = (self.fingers[finger.index()].as_mut(), frame.finger(finger)) else {
                continue;
            };
            model.init_finger(chain, device, palm_normal, palm_direction)?;
            built += 1;
        }
        log::debug!("Rebuilt {} of {} fingers", built, frame.tracked_count());
        Ok(())
    }
}
