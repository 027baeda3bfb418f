//! Mutable mesh buffers that finger tubes are uploaded into.

use crate::TubeMesh;
use engine_core::safe_normalize;
use glam::Vec3;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Smallest box around `points`; the zero box when there are none.
    pub fn from_points(points: &[Vec3]) -> Self {
        let Some((first, rest)) = points.split_first() else {
            return Self::default();
        };
        rest.iter().fold(Self { min: *first, max: *first }, |b, p| Self {
            min: b.min.min(*p),
            max: b.max.max(*p),
        })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Destination for a rebuilt mesh, owned by the rendering side.
pub trait MeshSink {
    fn set_vertices(&mut self, vertices: &[Vec3]);
    fn set_triangles(&mut self, triangles: &[u32]);
    fn recalculate_bounds(&mut self);
    fn recalculate_normals(&mut self);

    /// Replace vertices then triangles with the full allocated buffers of `mesh`.
    fn upload_tube(&mut self, mesh: &TubeMesh) {
        self.set_vertices(&mesh.vertices);
        self.set_triangles(&mesh.triangles);
    }
}

/// CPU-side mesh with derived normals and bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffer {
    vertices: Vec<Vec3>,
    triangles: Vec<u32>,
    normals: Vec<Vec3>,
    bounds: Aabb,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[u32] {
        &self.triangles
    }

    /// Per-vertex normals from the last [`MeshSink::recalculate_normals`].
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl MeshSink for MeshBuffer {
    fn set_vertices(&mut self, vertices: &[Vec3]) {
        self.vertices.clear();
        self.vertices.extend_from_slice(vertices);
    }

    fn set_triangles(&mut self, triangles: &[u32]) {
        self.triangles.clear();
        self.triangles.extend_from_slice(triangles);
    }

    fn recalculate_bounds(&mut self) {
        self.bounds = Aabb::from_points(&self.vertices);
    }

    /// Area-weighted average of adjacent face normals. Triangles that index
    /// past the vertex buffer are skipped.
    fn recalculate_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.vertices.len(), Vec3::ZERO);

        let mut skipped = 0usize;
        for tri in self.triangles.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let (Some(&pa), Some(&pb), Some(&pc)) =
                (self.vertices.get(a), self.vertices.get(b), self.vertices.get(c))
            else {
                skipped += 1;
                continue;
            };
            let face = (pb - pa).cross(pc - pa);
            self.normals[a] += face;
            self.normals[b] += face;
            self.normals[c] += face;
        }
        if skipped > 0 {
            log::warn!("Skipped {} triangles indexing past {} vertices", skipped, self.vertices.len());
        }

        for n in &mut self.normals {
            *n = safe_normalize(*n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshBuffer {
        let mut m = MeshBuffer::new();
        m.set_vertices(&[Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0)]);
        m.set_triangles(&[0, 1, 2, 3, 2, 1]);
        m
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let mut m = quad();
        m.recalculate_bounds();
        assert_eq!(m.bounds().min, Vec3::ZERO);
        assert_eq!(m.bounds().max, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(m.bounds().center(), Vec3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn empty_bounds_are_zero() {
        let mut m = MeshBuffer::new();
        m.recalculate_bounds();
        assert_eq!(m.bounds(), Aabb::default());
    }

    #[test]
    fn ccw_quad_normals_point_up_z() {
        let mut m = quad();
        m.recalculate_normals();
        assert_eq!(m.normals().len(), 4);
        for n in m.normals() {
            assert!((*n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn unreferenced_vertex_gets_zero_normal() {
        let mut m = quad();
        m.set_vertices(&[Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0), Vec3::splat(5.0)]);
        m.recalculate_normals();
        assert_eq!(m.normals()[4], Vec3::ZERO);
    }

    #[test]
    fn out_of_range_triangles_are_skipped() {
        let mut m = quad();
        m.set_triangles(&[0, 1, 2, 0, 1, 9]);
        m.recalculate_normals();
        assert!((m.normals()[0] - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn upload_tube_copies_full_buffers() {
        let mut mesh = TubeMesh::default();
        mesh.vertices = vec![Vec3::X; 8];
        mesh.triangles = vec![0; 12];
        let mut m = MeshBuffer::new();
        m.upload_tube(&mesh);
        assert_eq!(m.vertices().len(), 8);
        assert_eq!(m.triangles().len(), 12);
    }
}
