//! Finger mesh on the GPU. Buffers are rewritten in place each frame and only
//! reallocated when a frame outgrows them.

use crate::vertex::{interleave, Vertex};
use polyhand::MeshBuffer;

/// Smallest buffer allocation in bytes.
const MIN_BUFFER_BYTES: u64 = 256;

/// Allocation to use for `needed` bytes given the `current` allocation.
pub fn grow_capacity(current: u64, needed: u64) -> u64 {
    if needed <= current {
        current
    } else {
        needed.next_power_of_two().max(MIN_BUFFER_BYTES)
    }
}

/// A GPU mesh with vertex and index buffers.
pub struct GpuMesh {
    label: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
    staging: Vec<Vertex>,
    reallocations: u32,
}

impl GpuMesh {
    pub fn new(device: &wgpu::Device, label: &str) -> Self {
        Self {
            label: label.to_string(),
            vertex_buffer: create_buffer(device, &format!("{} Vertices", label), MIN_BUFFER_BYTES, wgpu::BufferUsages::VERTEX),
            index_buffer: create_buffer(device, &format!("{} Indices", label), MIN_BUFFER_BYTES, wgpu::BufferUsages::INDEX),
            num_indices: 0,
            staging: Vec::new(),
            reallocations: 0,
        }
    }

    /// Times either buffer had to be reallocated.
    pub fn reallocations(&self) -> u32 {
        self.reallocations
    }

    /// Copy `mesh` into the GPU buffers.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, mesh: &MeshBuffer) {
        interleave(mesh, &mut self.staging);
        let vertex_bytes: &[u8] = bytemuck::cast_slice(&self.staging);
        let index_bytes: &[u8] = bytemuck::cast_slice(mesh.triangles());

        let vertex_size = grow_capacity(self.vertex_buffer.size(), vertex_bytes.len() as u64);
        if vertex_size != self.vertex_buffer.size() {
            log::debug!("{}: growing vertex buffer to {} bytes", self.label, vertex_size);
            self.vertex_buffer = create_buffer(
                device,
                &format!("{} Vertices", self.label),
                vertex_size,
                wgpu::BufferUsages::VERTEX,
            );
            self.reallocations += 1;
        }
        let index_size = grow_capacity(self.index_buffer.size(), index_bytes.len() as u64);
        if index_size != self.index_buffer.size() {
            log::debug!("{}: growing index buffer to {} bytes", self.label, index_size);
            self.index_buffer = create_buffer(
                device,
                &format!("{} Indices", self.label),
                index_size,
                wgpu::BufferUsages::INDEX,
            );
            self.reallocations += 1;
        }

        if !vertex_bytes.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, vertex_bytes);
        }
        if !index_bytes.is_empty() {
            queue.write_buffer(&self.index_buffer, 0, index_bytes);
        }
        self.num_indices = mesh.triangles().len() as u32;
    }
}

fn create_buffer(device: &wgpu::Device, label: &str, size: u64, usage: wgpu::BufferUsages) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
