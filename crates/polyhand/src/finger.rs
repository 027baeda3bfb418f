//! Per-finger mesh model.

use crate::{CrossSectionConfig, MeshBuffer, MeshSink, Result, TubeMeshBuilder, TubeStyle};
use engine_core::Transform;
use glam::Vec3;
use tracking::FingerSkeleton;

/// A finger that can rebuild its mesh from a skeleton.
pub trait FingerModel {
    /// Build the finger's mesh for this frame.
    fn init_finger(
        &mut self,
        skeleton: &dyn FingerSkeleton,
        device: &Transform,
        palm_normal: Vec3,
        palm_direction: Vec3,
    ) -> Result<()>;

    /// Same as [`FingerModel::init_finger`]: every frame is a full rebuild.
    fn update_finger(
        &mut self,
        skeleton: &dyn FingerSkeleton,
        device: &Transform,
        palm_normal: Vec3,
        palm_direction: Vec3,
    ) -> Result<()> {
        self.init_finger(skeleton, device, palm_normal, palm_direction)
    }
}

/// Low-poly tube finger.
#[derive(Debug, Clone)]
pub struct PolyFinger {
    builder: TubeMeshBuilder,
    mesh: MeshBuffer,
}

impl PolyFinger {
    pub fn new(config: CrossSectionConfig) -> Result<Self> {
        Ok(Self {
            builder: TubeMeshBuilder::new(config)?,
            mesh: MeshBuffer::new(),
        })
    }

    pub fn config(&self) -> &CrossSectionConfig {
        self.builder.config()
    }

    pub fn style(&self) -> TubeStyle {
        self.builder.style()
    }

    /// Change the cross-section; takes effect on the next build.
    pub fn set_config(&mut self, config: CrossSectionConfig) -> Result<()> {
        self.builder.set_config(config)
    }

    pub fn builder(&self) -> &TubeMeshBuilder {
        &self.builder
    }

    /// Mesh ready for upload, with bounds and normals from the last build.
    pub fn mesh(&self) -> &MeshBuffer {
        &self.mesh
    }
}

impl FingerModel for PolyFinger {
    /// Palm normal and direction are accepted for interface parity; the tube
    /// shape depends only on the skeleton and the device transform.
    fn init_finger(
        &mut self,
        skeleton: &dyn FingerSkeleton,
        device: &Transform,
        _palm_normal: Vec3,
        _palm_direction: Vec3,
    ) -> Result<()> {
        let tube = self.builder.build(skeleton, device)?;
        self.mesh.upload_tube(tube);
        self.mesh.recalculate_bounds();
        self.mesh.recalculate_normals();
        Ok(())
    }
}
