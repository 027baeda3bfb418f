//! Procedural tube mesh around a finger's joint chain.
//!
//! Each joint gets a ring of `sides` points: the joint normal rotated about the
//! averaged bone axis in steps of `360 / sides` degrees, scaled by the radius.
//! Faceted tubes emit four fresh vertices per side per segment so no two quads
//! share a vertex; smooth tubes share one ring between adjacent segments.

use crate::{CrossSectionConfig, Result, RingLayout};
use engine_core::{angle_axis, safe_normalize, Transform};
use glam::Vec3;
use tracking::FingerSkeleton;

pub const TRIANGLE_INDICES_PER_QUAD: usize = 6;
pub const VERTICES_PER_QUAD: usize = 4;

/// Tube topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TubeStyle {
    /// Independent quads per side per segment (flat shading).
    Faceted,
    /// Rings shared between segments (smooth shading).
    Smooth,
}

impl From<&CrossSectionConfig> for TubeStyle {
    fn from(config: &CrossSectionConfig) -> Self {
        if config.smooth_normals {
            TubeStyle::Smooth
        } else {
            TubeStyle::Faceted
        }
    }
}

/// Vertex and index buffers for one finger tube.
///
/// `vertices` and `triangles` have their full allocated length; slots a build
/// does not write stay zero. `live_vertices` / `live_indices` give the extent
/// of the written prefix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TubeMesh {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<u32>,
    live_vertices: usize,
    live_indices: usize,
}

impl TubeMesh {
    pub fn live_vertices(&self) -> usize {
        self.live_vertices
    }

    pub fn live_indices(&self) -> usize {
        self.live_indices
    }

    /// The written part of the index buffer.
    pub fn live_triangles(&self) -> &[u32] {
        &self.triangles[..self.live_indices]
    }

    /// Zero both buffers at the requested sizes, keeping their allocations.
    fn reset(&mut self, vertex_slots: usize, index_slots: usize) {
        self.vertices.clear();
        self.vertices.resize(vertex_slots, Vec3::ZERO);
        self.triangles.clear();
        self.triangles.resize(index_slots, 0);
        self.live_vertices = 0;
        self.live_indices = 0;
    }
}

/// Normal at `joint`: the normalized average of the reversed incoming bone and
/// the outgoing bone. Zero at the root, and zero wherever the chain is straight.
pub fn joint_normal<S: FingerSkeleton + ?Sized>(chain: &S, joint: usize) -> Vec3 {
    if joint == 0 {
        return Vec3::ZERO;
    }
    let bone = joint as isize;
    let prev = -chain.bone_direction(bone - 1);
    let next = chain.bone_direction(bone);
    safe_normalize((prev + next) / 2.0)
}

/// Axis at `joint`: the average of the incoming and outgoing bone directions.
fn joint_axis<S: FingerSkeleton + ?Sized>(chain: &S, device: &Transform, joint: usize) -> Vec3 {
    let bone = joint as isize;
    0.5 * (device.transform_direction(chain.bone_direction(bone - 1))
        + device.transform_direction(chain.bone_direction(bone)))
}

/// Rebuilds a finger tube every frame into buffers it keeps between calls.
#[derive(Debug, Clone)]
pub struct TubeMeshBuilder {
    config: CrossSectionConfig,
    mesh: TubeMesh,
}

impl TubeMeshBuilder {
    pub fn new(config: CrossSectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            mesh: TubeMesh::default(),
        })
    }

    pub fn config(&self) -> &CrossSectionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: CrossSectionConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn style(&self) -> TubeStyle {
        TubeStyle::from(&self.config)
    }

    /// Mesh from the most recent build.
    pub fn mesh(&self) -> &TubeMesh {
        &self.mesh
    }

    /// Rebuild the tube for `chain`, mapping device space through `device`.
    pub fn build<S: FingerSkeleton + ?Sized>(&mut self, chain: &S, device: &Transform) -> Result<&TubeMesh> {
        self.config.validate()?;
        match self.style() {
            TubeStyle::Faceted => self.build_faceted(chain, device),
            TubeStyle::Smooth => self.build_smooth(chain, device),
        }
        log::trace!(
            "Rebuilt {:?} tube: {}/{} vertices, {}/{} indices",
            self.style(),
            self.mesh.live_vertices,
            self.mesh.vertices.len(),
            self.mesh.live_indices,
            self.mesh.triangles.len()
        );
        Ok(&self.mesh)
    }

    fn build_smooth<S: FingerSkeleton + ?Sized>(&mut self, chain: &S, device: &Transform) {
        let sides = self.config.sides;
        let num_joints = chain.num_joints();
        let (rings, stride) = match self.config.ring_layout {
            RingLayout::JointStride => (chain.num_bones(), num_joints),
            RingLayout::SideStride => (num_joints, sides),
        };

        // With a joint stride the last ring can reach past sides * num_joints.
        let ring_extent = match rings {
            0 => 0,
            n => stride * (n - 1) + sides,
        };
        let vertex_slots = (sides * num_joints).max(ring_extent);
        self.mesh
            .reset(vertex_slots, TRIANGLE_INDICES_PER_QUAD * sides * num_joints);

        let radius = self.config.radius;
        let step = 360.0 / sides as f32;
        let mesh = &mut self.mesh;
        let mut triangle_index = 0;

        for i in 0..rings {
            let joint_position = device.transform_point(chain.joint_position(i));
            let joint_direction = joint_axis(chain, device, i);
            let normal = device.transform_direction(joint_normal(chain, i));

            for s in 0..sides {
                let angle = self.config.starting_angle + s as f32 * step;
                let offset = angle_axis(angle, joint_direction) * normal;
                mesh.vertices[s + stride * i] = joint_position + radius * offset;

                if i != rings - 1 {
                    let here = (s + stride * i) as u32;
                    let around = ((s + 1) % sides + stride * i) as u32;
                    let next = (s + stride * (i + 1)) as u32;
                    let next_around = ((s + 1) % sides + stride * (i + 1)) as u32;
                    mesh.triangles[triangle_index..triangle_index + TRIANGLE_INDICES_PER_QUAD]
                        .copy_from_slice(&[here, around, next, next_around, next, around]);
                    triangle_index += TRIANGLE_INDICES_PER_QUAD;
                }
            }
        }

        mesh.live_vertices = ring_extent;
        mesh.live_indices = triangle_index;
    }

    fn build_faceted<S: FingerSkeleton + ?Sized>(&mut self, chain: &S, device: &Transform) {
        let sides = self.config.sides;
        let num_joints = chain.num_joints();
        self.mesh.reset(
            VERTICES_PER_QUAD * sides * num_joints,
            TRIANGLE_INDICES_PER_QUAD * sides * num_joints,
        );

        let radius = self.config.radius;
        let step = 360.0 / sides as f32;
        let mesh = &mut self.mesh;
        let mut vertex_index = 0;
        let mut triangle_index = 0;

        // The last joint only closes the previous segment.
        for i in 0..num_joints.saturating_sub(1) {
            let joint_position = device.transform_point(chain.joint_position(i));
            let next_joint_position = device.transform_point(chain.joint_position(i + 1));
            let joint_direction = joint_axis(chain, device, i);
            let next_joint_direction = joint_axis(chain, device, i + 1);
            let bone_normal = device.transform_direction(joint_normal(chain, i));
            let next_bone_normal = device.transform_direction(joint_normal(chain, i + 1));

            for s in 0..sides {
                let from_angle = self.config.starting_angle + s as f32 * step;
                let to_angle = self.config.starting_angle + (s + 1) as f32 * step;
                let from_offset1 = angle_axis(from_angle, joint_direction) * bone_normal;
                let to_offset1 = angle_axis(to_angle, joint_direction) * bone_normal;
                let from_offset2 = angle_axis(from_angle, next_joint_direction) * next_bone_normal;
                let to_offset2 = angle_axis(to_angle, next_joint_direction) * next_bone_normal;

                let v = vertex_index as u32;
                mesh.triangles[triangle_index..triangle_index + TRIANGLE_INDICES_PER_QUAD]
                    .copy_from_slice(&[v, v + 1, v + 2, v + 3, v + 2, v + 1]);
                triangle_index += TRIANGLE_INDICES_PER_QUAD;

                mesh.vertices[vertex_index..vertex_index + VERTICES_PER_QUAD].copy_from_slice(&[
                    joint_position + radius * from_offset1,
                    joint_position + radius * to_offset1,
                    next_joint_position + radius * from_offset2,
                    next_joint_position + radius * to_offset2,
                ]);
                vertex_index += VERTICES_PER_QUAD;
            }
        }

        mesh.live_vertices = vertex_index;
        mesh.live_indices = triangle_index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_RADIUS;
    use glam::Quat;
    use std::collections::HashSet;
    use tracking::FingerChain;

    fn straight_chain(joints: usize) -> FingerChain {
        FingerChain::from_joints((0..joints).map(|i| Vec3::X * i as f32).collect()).unwrap()
    }

    /// Right-angle bend at joint 1.
    fn elbow_chain() -> FingerChain {
        FingerChain::from_joints(vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0)]).unwrap()
    }

    /// Unit-length bones curving gently upward.
    fn curved_chain() -> FingerChain {
        let mut joints = vec![Vec3::ZERO];
        let mut dir = Vec3::X;
        for _ in 0..4 {
            let next = *joints.last().unwrap() + dir;
            joints.push(next);
            dir = Quat::from_rotation_z(0.25) * dir;
        }
        FingerChain::from_joints(joints).unwrap()
    }

    fn builder(config: CrossSectionConfig) -> TubeMeshBuilder {
        TubeMeshBuilder::new(config).unwrap()
    }

    fn closest_on_chain(chain: &FingerChain, p: Vec3) -> Vec3 {
        chain
            .joints()
            .windows(2)
            .map(|seg| {
                let ab = seg[1] - seg[0];
                let t = ((p - seg[0]).dot(ab) / ab.length_squared()).clamp(0.0, 1.0);
                seg[0] + ab * t
            })
            .min_by(|a, b| a.distance(p).total_cmp(&b.distance(p)))
            .unwrap()
    }

    /// Every non-degenerate live triangle faces away from the chain.
    fn assert_outward(mesh: &TubeMesh, chain: &FingerChain) {
        let mut checked = 0;
        for tri in mesh.live_triangles().chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| mesh.vertices[tri[k] as usize]);
            let normal = (b - a).cross(c - a);
            if normal.length() < 1e-6 {
                continue;
            }
            let centroid = (a + b + c) / 3.0;
            let outward = centroid - closest_on_chain(chain, centroid);
            assert!(normal.dot(outward) > 0.0, "triangle {:?} faces inward", tri);
            checked += 1;
        }
        assert!(checked > 0);
    }

    #[test]
    fn faceted_three_joint_buffer_sizes() {
        let mut b = builder(CrossSectionConfig::faceted(4));
        let mesh = b.build(&straight_chain(3), &Transform::IDENTITY).unwrap();
        assert_eq!(mesh.vertices.len(), 48);
        assert_eq!(mesh.live_vertices(), 32);
        assert_eq!(mesh.triangles.len(), 72);
        assert_eq!(mesh.live_indices(), 48);
        assert!(mesh.vertices[32..].iter().all(|v| *v == Vec3::ZERO));
        assert!(mesh.triangles[48..].iter().all(|&i| i == 0));
    }

    #[test]
    fn faceted_quads_share_no_vertices() {
        let mut b = builder(CrossSectionConfig::faceted(5));
        let mesh = b.build(&curved_chain(), &Transform::IDENTITY).unwrap();
        for (q, quad) in mesh.live_triangles().chunks(TRIANGLE_INDICES_PER_QUAD).enumerate() {
            let base = (q * VERTICES_PER_QUAD) as u32;
            assert_eq!(quad, &[base, base + 1, base + 2, base + 3, base + 2, base + 1]);
        }
    }

    #[test]
    fn smooth_joint_stride_sizes_and_first_quad() {
        let mut b = builder(CrossSectionConfig::smooth(4));
        let mesh = b.build(&elbow_chain(), &Transform::IDENTITY).unwrap();
        assert_eq!(mesh.vertices.len(), 4 * 3);
        assert_eq!(mesh.triangles.len(), 6 * 4 * 3);
        // Two rings (num_bones), only the first pair of rings is stitched.
        assert_eq!(mesh.live_indices(), 6 * 4);
        assert_eq!(&mesh.triangles[..6], &[0, 1, 3, 4, 3, 1]);
    }

    #[test]
    fn smooth_ring_sits_at_radius() {
        let chain = elbow_chain();
        let mut b = builder(CrossSectionConfig::smooth(4));
        let mesh = b.build(&chain, &Transform::IDENTITY).unwrap();
        // Ring 1 starts at 1 * num_joints and overwrites the tail of ring 0.
        for v in &mesh.vertices[3..7] {
            assert!((v.distance(Vec3::X) - DEFAULT_RADIUS).abs() < 1e-5);
        }
        // The root ring collapses onto the root joint.
        for v in &mesh.vertices[0..3] {
            assert!(v.length() < 1e-6);
        }
    }

    #[test]
    fn joint_stride_grows_buffer_for_narrow_rings() {
        let mut b = builder(CrossSectionConfig::smooth(3));
        let mesh = b.build(&curved_chain(), &Transform::IDENTITY).unwrap();
        // Last ring starts at 5 * 3 and needs 3 slots.
        assert_eq!(mesh.vertices.len(), 18);
        assert!(mesh
            .live_triangles()
            .iter()
            .all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn joint_stride_matches_side_stride_when_sides_equal_joints() {
        let chain = curved_chain();
        let legacy = builder(CrossSectionConfig::smooth(5))
            .build(&chain, &Transform::IDENTITY)
            .unwrap()
            .clone();
        let packed = builder(CrossSectionConfig {
            ring_layout: RingLayout::SideStride,
            ..CrossSectionConfig::smooth(5)
        })
        .build(&chain, &Transform::IDENTITY)
        .unwrap()
        .clone();

        let ring_slots = 5 * chain.num_bones();
        assert_eq!(&legacy.vertices[..ring_slots], &packed.vertices[..ring_slots]);
        assert_eq!(legacy.live_triangles(), &packed.live_triangles()[..legacy.live_indices()]);
        assert_eq!(packed.live_indices(), 6 * 5 * chain.num_bones());
    }

    #[test]
    fn side_stride_rings_are_rotationally_symmetric() {
        let chain = curved_chain();
        let sides = 6;
        let mut b = builder(CrossSectionConfig {
            starting_angle: 15.0,
            ring_layout: RingLayout::SideStride,
            ..CrossSectionConfig::smooth(sides)
        });
        let mesh = b.build(&chain, &Transform::IDENTITY).unwrap();
        assert_eq!(mesh.vertices.len(), sides * 5);

        // Interior joints only: the root ring and the tip ring collapse to points.
        for joint in 1..chain.num_joints() - 1 {
            let centre = chain.joint_position(joint);
            let ring = &mesh.vertices[joint * sides..(joint + 1) * sides];
            let offsets: Vec<Vec3> = ring.iter().map(|v| *v - centre).collect();
            let sum: Vec3 = offsets.iter().copied().sum();
            assert!(sum.length() < 1e-5, "ring {} not centred: {:?}", joint, sum);

            let expected_dot = DEFAULT_RADIUS.powi(2) * (360.0_f32 / sides as f32).to_radians().cos();
            for s in 0..sides {
                assert!((offsets[s].length() - DEFAULT_RADIUS).abs() < 1e-5);
                let dot = offsets[s].dot(offsets[(s + 1) % sides]);
                assert!((dot - expected_dot).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn starting_angle_rotates_side_zero() {
        let chain = elbow_chain();
        let mut b = builder(CrossSectionConfig {
            starting_angle: 90.0,
            ring_layout: RingLayout::SideStride,
            ..CrossSectionConfig::smooth(4)
        });
        let mesh = b.build(&chain, &Transform::IDENTITY).unwrap();
        let axis = 0.5 * (Vec3::X + Vec3::Y);
        let normal = joint_normal(&chain, 1);
        let expected = Vec3::X + DEFAULT_RADIUS * (angle_axis(90.0, axis) * normal);
        assert!((mesh.vertices[4] - expected).length() < 1e-5);
    }

    #[test]
    fn root_joint_normal_is_zero() {
        for chain in [straight_chain(4), elbow_chain(), curved_chain()] {
            assert_eq!(joint_normal(&chain, 0), Vec3::ZERO);
        }
    }

    #[test]
    fn straight_chain_normals_are_zero_not_nan() {
        let chain = straight_chain(5);
        assert_eq!(joint_normal(&chain, 2), Vec3::ZERO);
        for config in [CrossSectionConfig::faceted(4), CrossSectionConfig::smooth(4)] {
            let mut b = builder(config);
            let mesh = b.build(&chain, &Transform::IDENTITY).unwrap();
            assert!(mesh.vertices.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn joint_normal_is_perpendicular_to_axis() {
        let chain = curved_chain();
        for joint in 1..chain.num_joints() - 1 {
            let axis = joint_axis(&chain, &Transform::IDENTITY, joint);
            assert!(joint_normal(&chain, joint).dot(axis).abs() < 1e-5);
        }
    }

    #[test]
    fn rebuild_is_idempotent() {
        let chain = curved_chain();
        for config in [CrossSectionConfig::faceted(7), CrossSectionConfig::smooth(7)] {
            let mut b = builder(config);
            let first = b.build(&chain, &Transform::IDENTITY).unwrap().clone();
            let second = b.build(&chain, &Transform::IDENTITY).unwrap();
            assert_eq!(&first, second);
        }
    }

    #[test]
    fn rebuild_clears_slots_left_by_larger_frames() {
        let mut b = builder(CrossSectionConfig::smooth(4));
        b.build(&curved_chain(), &Transform::IDENTITY).unwrap();
        let fresh = builder(CrossSectionConfig::smooth(4))
            .build(&elbow_chain(), &Transform::IDENTITY)
            .unwrap()
            .clone();
        let reused = b.build(&elbow_chain(), &Transform::IDENTITY).unwrap();
        assert_eq!(&fresh, reused);
    }

    #[test]
    fn buffers_keep_capacity_across_frames() {
        let chain = curved_chain();
        let mut b = builder(CrossSectionConfig::faceted(12));
        let big = b.build(&chain, &Transform::IDENTITY).unwrap().vertices.capacity();
        b.set_config(CrossSectionConfig::faceted(4)).unwrap();
        let mesh = b.build(&chain, &Transform::IDENTITY).unwrap();
        assert_eq!(mesh.vertices.len(), 4 * 4 * 5);
        assert!(mesh.vertices.capacity() >= big);
    }

    #[test]
    fn degenerate_sides_are_rejected() {
        for sides in [0, 1, 2] {
            assert!(TubeMeshBuilder::new(CrossSectionConfig::faceted(sides)).is_err());
            let mut b = builder(CrossSectionConfig::smooth(4));
            let mut config = CrossSectionConfig::smooth(4);
            config.sides = sides;
            assert!(b.set_config(config).is_err());
            assert_eq!(b.config().sides, 4);
        }
    }

    #[test]
    fn faceted_winding_faces_outward() {
        let chain = curved_chain();
        let mut b = builder(CrossSectionConfig {
            starting_angle: 10.0,
            ..CrossSectionConfig::faceted(5)
        });
        let mesh = b.build(&chain, &Transform::IDENTITY).unwrap();
        assert_outward(mesh, &chain);
    }

    #[test]
    fn smooth_winding_faces_outward() {
        let chain = curved_chain();
        let mut b = builder(CrossSectionConfig {
            starting_angle: 10.0,
            ring_layout: RingLayout::SideStride,
            ..CrossSectionConfig::smooth(5)
        });
        let mesh = b.build(&chain, &Transform::IDENTITY).unwrap();
        assert_outward(mesh, &chain);
    }

    #[test]
    fn smooth_directed_edges_are_unique() {
        let mut b = builder(CrossSectionConfig {
            ring_layout: RingLayout::SideStride,
            ..CrossSectionConfig::smooth(6)
        });
        let mesh = b.build(&curved_chain(), &Transform::IDENTITY).unwrap();
        let mut edges = HashSet::new();
        for tri in mesh.live_triangles().chunks(3) {
            for k in 0..3 {
                assert!(edges.insert((tri[k], tri[(k + 1) % 3])), "edge repeated in {:?}", tri);
            }
        }
    }

    #[test]
    fn device_transform_moves_whole_tube() {
        let chain = curved_chain();
        let config = CrossSectionConfig {
            ring_layout: RingLayout::SideStride,
            ..CrossSectionConfig::smooth(5)
        };
        let device = Transform::from_position_rotation(Vec3::new(0.0, 2.0, -1.0), Quat::from_rotation_y(0.8));
        let local = builder(config.clone()).build(&chain, &Transform::IDENTITY).unwrap().clone();
        let world = builder(config).build(&chain, &device).unwrap().clone();
        for (l, w) in local.vertices.iter().zip(&world.vertices) {
            assert!((device.transform_point(*l) - *w).length() < 1e-4);
        }
    }

    #[test]
    fn device_scale_leaves_radius_unscaled() {
        let chain = curved_chain();
        let device = Transform::IDENTITY.with_uniform_scale(3.0);
        let mut b = builder(CrossSectionConfig {
            ring_layout: RingLayout::SideStride,
            ..CrossSectionConfig::smooth(4)
        });
        let mesh = b.build(&chain, &device).unwrap();
        let centre = device.transform_point(chain.joint_position(2));
        for v in &mesh.vertices[8..12] {
            assert!((v.distance(centre) - DEFAULT_RADIUS).abs() < 1e-4);
        }
    }

    #[test]
    fn single_joint_chain_builds_nothing() {
        struct Stub;
        impl FingerSkeleton for Stub {
            fn num_joints(&self) -> usize {
                1
            }
            fn joint_position(&self, _: usize) -> Vec3 {
                Vec3::ONE
            }
            fn bone_direction(&self, _: isize) -> Vec3 {
                Vec3::ZERO
            }
        }
        for config in [CrossSectionConfig::faceted(4), CrossSectionConfig::smooth(4)] {
            let mut b = builder(config);
            let mesh = b.build(&Stub, &Transform::IDENTITY).unwrap();
            assert_eq!(mesh.live_indices(), 0);
            assert_eq!(mesh.live_vertices(), 0);
        }
    }
}
