//! Random selection helpers and the primitive kinds they choose between.

use std::fmt;

use rand::Rng;

use crate::geometry::primitives::{sphere_mesh, TorusKnot};
use crate::geometry::MeshData;

/// Uniformly pick one element of `pool`, with replacement.
///
/// Returns `None` for an empty pool. The random source is explicit so a
/// seeded generator gives reproducible picks.
pub fn pick_one<'a, T, R>(pool: &'a [T], rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    if pool.is_empty() {
        return None;
    }
    pool.get(rng.random_range(0..pool.len()))
}

/// The four primitive slots a ring can draw. Each slot selects a loaded
/// pool entry by position; no mesh is generated for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Unit cube.
    Cube,
    /// UV sphere.
    Sphere,
    /// (2, 3) torus knot.
    TorusKnot,
    /// Four-sided cone.
    Cone,
}

impl PrimitiveKind {
    /// Every kind, in slot order.
    pub const ALL: [Self; 4] =
        [Self::Cube, Self::Sphere, Self::TorusKnot, Self::Cone];

    /// Slot position within [`PrimitiveKind::ALL`].
    pub fn ordinal(self) -> usize {
        match self {
            Self::Cube => 0,
            Self::Sphere => 1,
            Self::TorusKnot => 2,
            Self::Cone => 3,
        }
    }

    /// Short lowercase label, also used as the generated asset name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cube => "cube",
            Self::Sphere => "sphere",
            Self::TorusKnot => "torus_knot",
            Self::Cone => "cone",
        }
    }

}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shapes generated for the object at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CenterpieceKind {
    /// UV sphere, radius 0.66.
    Sphere,
    /// (2, 3) torus knot.
    TorusKnot,
}

impl CenterpieceKind {
    /// Every centerpiece kind.
    pub const ALL: [Self; 2] = [Self::Sphere, Self::TorusKnot];

    /// Short lowercase label, also used as the generated asset name.
    pub fn label(self) -> &'static str {
        self.primitive().label()
    }

    /// The matching primitive slot.
    pub fn primitive(self) -> PrimitiveKind {
        match self {
            Self::Sphere => PrimitiveKind::Sphere,
            Self::TorusKnot => PrimitiveKind::TorusKnot,
        }
    }

    /// Generate this centerpiece's mesh.
    pub fn mesh(self) -> MeshData {
        match self {
            Self::Sphere => sphere_mesh(0.66, 16, 16),
            Self::TorusKnot => TorusKnot {
                radius: 0.5,
                tube: 0.2,
                tubular_segments: 100,
                radial_segments: 16,
                p: 2,
                q: 3,
            }
            .mesh(),
        }
    }
}

impl fmt::Display for CenterpieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
