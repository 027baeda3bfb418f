//! Vertex types and layouts for rendering.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use polyhand::MeshBuffer;

/// Finger vertex with position and normal.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.into(),
            normal: normal.into(),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Normal
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Interleave a mesh's positions and normals into `out`, reusing its allocation.
/// Vertices without a computed normal get a zero normal.
pub fn interleave(mesh: &MeshBuffer, out: &mut Vec<Vertex>) {
    out.clear();
    out.extend(mesh.vertices().iter().enumerate().map(|(i, p)| {
        let n = mesh.normals().get(i).copied().unwrap_or(Vec3::ZERO);
        Vertex::new(*p, n)
    }));
}
