//! Indexed triangle meshes and the procedural primitives.
//!
//! [`MeshData`] is the CPU-side form every drawable starts from, whether it
//! was parsed from an OBJ file or generated by [`primitives`]. Upload to the
//! GPU goes through [`MeshData::vertices`], which interleaves positions and
//! normals into [`Vertex`].

pub mod primitives;

use glam::Vec3;

/// Interleaved vertex as consumed by the matcap pipeline.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space unit normal.
    pub normal: [f32; 3],
}

/// Indexed triangle list with per-vertex normals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// One normal per position.
    pub normals: Vec<Vec3>,
    /// Triangle list indices into `positions`.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Build a mesh from positions and indices, deriving smooth normals.
    #[must_use]
    pub fn from_positions(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let normals = compute_vertex_normals(&positions, &indices);
        Self {
            positions,
            normals,
            indices,
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// `true` if there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty() || self.positions.is_empty()
    }

    /// Interleave positions and normals for GPU upload.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .map(|(p, n)| Vertex {
                position: p.to_array(),
                normal: n.to_array(),
            })
            .collect()
    }

}

/// Area-weighted smooth vertex normals.
///
/// Each triangle adds its unnormalized face normal (cross product, so larger
/// faces weigh more) to its three corners. Vertices touched by no triangle,
/// or only by degenerate ones, fall back to +Z.
pub fn compute_vertex_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (Some(&pa), Some(&pb), Some(&pc)) =
            (positions.get(a), positions.get(b), positions.get(c))
        else {
            continue;
        };
        let face = (pb - pa).cross(pc - pa);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }

    for n in &mut normals {
        *n = n.try_normalize().unwrap_or(Vec3::Z);
    }
    normals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshData {
        MeshData::from_positions(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn ccw_quad_faces_positive_z() {
        let mesh = quad();
        for n in &mesh.normals {
            assert!((*n - Vec3::Z).length() < 1e-6);
        }
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn unreferenced_vertex_gets_fallback_normal() {
        let normals = compute_vertex_normals(
            &[Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::splat(5.0)],
            &[0, 1, 2],
        );
        assert_eq!(normals[3], Vec3::Z);
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let normals =
            compute_vertex_normals(&[Vec3::ZERO, Vec3::X, Vec3::Y], &[0, 1, 9]);
        assert_eq!(normals, vec![Vec3::Z; 3]);
    }

    #[test]
    fn interleaved_vertices_match_positions() {
        let mesh = quad();
        let verts = mesh.vertices();
        assert_eq!(verts.len(), 4);
        assert_eq!(verts[2].position, [1.0, 1.0, 0.0]);
        assert_eq!(size_of::<Vertex>(), 24);
    }
}
