//! Procedural centerpiece meshes: UV sphere and torus knot.
//!
//! Vertex layout and winding follow the usual parametric constructions
//! (counter-clockwise front faces, seams duplicated so each grid vertex has
//! its own normal).

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::MeshData;

/// UV sphere of `radius` with `width_segments` around and `height_segments`
/// pole to pole.
pub fn sphere_mesh(
    radius: f32,
    width_segments: u32,
    height_segments: u32,
) -> MeshData {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let mut mesh = MeshData::default();
    let row = width_segments + 1;

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let p = Vec3::new(
                -radius * (u * TAU).cos() * (v * PI).sin(),
                radius * (v * PI).cos(),
                radius * (u * TAU).sin() * (v * PI).sin(),
            );
            mesh.positions.push(p);
            mesh.normals.push(p.try_normalize().unwrap_or(Vec3::Y));
        }
    }

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            // Pole rows collapse to a single triangle per quad
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

/// Torus knot parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorusKnot {
    /// Radius of the knot's center curve.
    pub radius: f32,
    /// Radius of the tube swept along the curve.
    pub tube: f32,
    /// Segments along the curve.
    pub tubular_segments: u32,
    /// Segments around the tube.
    pub radial_segments: u32,
    /// Winds around the axis of rotational symmetry.
    pub p: u32,
    /// Winds around the interior circle.
    pub q: u32,
}

impl TorusKnot {
    fn curve_point(&self, u: f32) -> Vec3 {
        let q_over_p = self.q as f32 / self.p as f32 * u;
        let cs = q_over_p.cos();
        Vec3::new(
            self.radius * (2.0 + cs) * 0.5 * u.cos(),
            self.radius * (2.0 + cs) * 0.5 * u.sin(),
            self.radius * q_over_p.sin() * 0.5,
        )
    }

    /// Sweep the tube along the knot curve.
    pub fn mesh(&self) -> MeshData {
        let tubular = self.tubular_segments.max(3);
        let radial = self.radial_segments.max(3);
        let p = self.p.max(1);
        let mut mesh = MeshData::default();

        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * p as f32 * TAU;
            let p1 = self.curve_point(u);
            let p2 = self.curve_point(u + 0.01);

            // Frenet-like frame from the curve tangent
            let t = p2 - p1;
            let n = p2 + p1;
            let b = t.cross(n);
            let n = b.cross(t).normalize_or_zero();
            let b = b.normalize_or_zero();

            for j in 0..=radial {
                let v = j as f32 / radial as f32 * TAU;
                let cx = -self.tube * v.cos();
                let cy = self.tube * v.sin();
                let vertex = p1 + n * cx + b * cy;
                mesh.positions.push(vertex);
                mesh.normals
                    .push((vertex - p1).try_normalize().unwrap_or(Vec3::Z));
            }
        }

        let row = radial + 1;
        for j in 1..=tubular {
            for i in 1..=radial {
                let a = row * (j - 1) + (i - 1);
                let b = row * j + (i - 1);
                let c = row * j + i;
                let d = row * (j - 1) + i;
                mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
        mesh
    }
}
