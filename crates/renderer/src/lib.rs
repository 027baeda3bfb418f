//! GPU upload of finger meshes using wgpu.

pub mod context;
pub mod mesh;
pub mod vertex;

pub use context::*;
pub use mesh::*;
pub use vertex::*;
