//! One-shot scene composition from a loaded geometry pool.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::select::{pick_one, CenterpieceKind, PrimitiveKind};
use crate::assets::{GeometryAsset, GeometryPool};
use crate::error::RingfieldError;
use crate::layout::{
    InstanceTransform, RingSpec, LIGHTNESS, RING_COUNT, SATURATION,
};
use crate::util::color::hsl_to_linear;

/// Lower bound (inclusive) of the session base hue.
pub const BASE_HUE_MIN: f32 = 0.5;
/// Upper bound (exclusive) of the session base hue.
pub const BASE_HUE_MAX: f32 = 1.0;

/// One ring of instanced copies sharing a geometry and material.
#[derive(Debug, Clone)]
pub struct RenderableRing {
    /// Derived ring parameters.
    pub spec: RingSpec,
    /// Slot that was drawn for this ring.
    pub kind: PrimitiveKind,
    /// Shared mesh for every instance.
    pub geometry: Arc<GeometryAsset>,
    /// Linear RGB material color.
    pub color: [f32; 3],
    /// One placement per instance, in orbital order.
    pub instances: Vec<InstanceTransform>,
}

/// The single non-instanced object at the origin.
#[derive(Debug, Clone)]
pub struct Centerpiece {
    /// Sphere or torus knot.
    pub kind: CenterpieceKind,
    /// Generated primitive mesh.
    pub geometry: Arc<GeometryAsset>,
    /// Linear RGB material color (base hue).
    pub color: [f32; 3],
    /// Placement; always the identity.
    pub transform: InstanceTransform,
}

/// Everything the renderer needs, fixed for the rest of the session.
#[derive(Debug, Clone)]
pub struct ComposedScene {
    /// Session hue offset in `[0.5, 1.0)`.
    pub base_hue: f32,
    /// Rings, innermost first.
    pub rings: Vec<RenderableRing>,
    /// Object at the origin.
    pub centerpiece: Centerpiece,
}

impl ComposedScene {
    /// Rings plus the centerpiece.
    pub fn drawable_count(&self) -> usize {
        self.rings.len() + 1
    }

    /// Instances across all rings plus the centerpiece.
    pub fn instance_count(&self) -> usize {
        self.rings.iter().map(|r| r.instances.len()).sum::<usize>() + 1
    }
}

/// Draws the random choices of a session and lays out the rings.
pub struct SceneComposer<R: Rng> {
    rng: R,
}

impl SceneComposer<StdRng> {
    /// Composer seeded with `seed`, or from OS entropy when `None`.
    pub fn seeded(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self { rng }
    }
}

impl<R: Rng> SceneComposer<R> {
    /// Composer drawing from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Draw the session base hue, uniform in `[0.5, 1.0)`.
    pub fn draw_base_hue(&mut self) -> f32 {
        self.rng.random_range(BASE_HUE_MIN..BASE_HUE_MAX)
    }

    /// Compose the full scene: ten rings and one centerpiece.
    ///
    /// Each ring draws one of the four primitive slots; the slot picks the
    /// pool entry at that position (wrapping for short pools). The
    /// centerpiece is a generated sphere or torus knot.
    ///
    /// # Errors
    ///
    /// Returns [`RingfieldError::EmptyGeometryPool`] when the pool is empty.
    pub fn compose(
        &mut self,
        pool: &GeometryPool,
    ) -> Result<ComposedScene, RingfieldError> {
        if pool.is_empty() {
            return Err(RingfieldError::EmptyGeometryPool);
        }

        let base_hue = self.draw_base_hue();
        let centerpiece_kind = self.pick_kind(&CenterpieceKind::ALL)?;

        let rings = (0..RING_COUNT as u32)
            .map(|index| {
                let kind = self.pick_kind(&PrimitiveKind::ALL)?;
                let geometry = resolve_slot(pool, kind)?;
                Ok(build_ring(index, base_hue, kind, geometry))
            })
            .collect::<Result<Vec<_>, RingfieldError>>()?;

        let centerpiece = Centerpiece {
            kind: centerpiece_kind,
            geometry: Arc::new(GeometryAsset {
                name: centerpiece_kind.label().to_owned(),
                mesh: centerpiece_kind.mesh(),
            }),
            color: hsl_to_linear(base_hue, SATURATION, LIGHTNESS),
            transform: InstanceTransform::IDENTITY,
        };

        log::info!(
            "composed scene: base hue {base_hue:.3}, centerpiece {}, rings [{}]",
            centerpiece.kind,
            rings
                .iter()
                .map(|r| format!("{}:{}", r.kind, r.geometry.name))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(ComposedScene {
            base_hue,
            rings,
            centerpiece,
        })
    }

    fn pick_kind<K: Copy>(&mut self, kinds: &[K]) -> Result<K, RingfieldError> {
        pick_one(kinds, &mut self.rng)
            .copied()
            .ok_or(RingfieldError::EmptyGeometryPool)
    }
}

/// Pool entry for a primitive slot, wrapping when the pool is shorter than
/// the slot list.
fn resolve_slot(
    pool: &GeometryPool,
    kind: PrimitiveKind,
) -> Result<Arc<GeometryAsset>, RingfieldError> {
    if pool.is_empty() {
        return Err(RingfieldError::EmptyGeometryPool);
    }
    pool.get(kind.ordinal() % pool.len())
        .cloned()
        .ok_or(RingfieldError::EmptyGeometryPool)
}

/// Lay out ring `index` over `geometry`.
pub fn build_ring(
    index: u32,
    base_hue: f32,
    kind: PrimitiveKind,
    geometry: Arc<GeometryAsset>,
) -> RenderableRing {
    let spec = RingSpec::new(index, base_hue);
    RenderableRing {
        spec,
        kind,
        geometry,
        color: spec.color(),
        instances: spec.instances(),
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::geometry::MeshData;

    fn asset(name: &str) -> GeometryAsset {
        GeometryAsset {
            name: name.to_owned(),
            mesh: MeshData::from_positions(
                vec![Vec3::ZERO, Vec3::X, Vec3::Y],
                vec![0, 1, 2],
            ),
        }
    }

    fn pool_of(n: usize) -> GeometryPool {
        GeometryPool::new((0..n).map(|i| asset(&format!("g{i}"))).collect())
    }

    fn composer(seed: u64) -> SceneComposer<StdRng> {
        SceneComposer::seeded(Some(seed))
    }

    #[test]
    fn ten_rings_and_one_centerpiece_for_any_nonempty_pool() {
        for n in 1..=8 {
            let scene = composer(n as u64).compose(&pool_of(n)).unwrap();
            assert_eq!(scene.rings.len(), RING_COUNT);
            assert_eq!(scene.drawable_count(), RING_COUNT + 1);
        }
    }

    #[test]
    fn empty_pool_is_an_explicit_error() {
        let err = composer(0).compose(&GeometryPool::default()).unwrap_err();
        assert!(matches!(err, RingfieldError::EmptyGeometryPool));
    }

    #[test]
    fn base_hue_in_range() {
        for seed in 0..200 {
            let hue = composer(seed).draw_base_hue();
            assert!((BASE_HUE_MIN..BASE_HUE_MAX).contains(&hue));
        }
    }

    #[test]
    fn centerpiece_is_sphere_or_knot() {
        let pool = pool_of(8);
        let mut seen = Vec::new();
        for seed in 0..100 {
            let scene = composer(seed).compose(&pool).unwrap();
            let kind = scene.centerpiece.kind;
            assert!(CenterpieceKind::ALL.contains(&kind));
            assert_eq!(scene.centerpiece.transform, InstanceTransform::IDENTITY);
            if !seen.contains(&kind) {
                seen.push(kind);
            }
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn ring_geometry_follows_slot() {
        let pool = pool_of(8);
        let scene = composer(5).compose(&pool).unwrap();
        for ring in &scene.rings {
            assert_eq!(ring.geometry.name, format!("g{}", ring.kind.ordinal()));
        }
    }

    #[test]
    fn short_pool_wraps_slots() {
        let pool = pool_of(3);
        for seed in 0..50 {
            let scene = composer(seed).compose(&pool).unwrap();
            for ring in &scene.rings {
                let expected = format!("g{}", ring.kind.ordinal() % 3);
                assert_eq!(ring.geometry.name, expected);
            }
        }
    }

    #[test]
    fn rings_follow_layout_and_hue_offsets() {
        let scene = composer(11).compose(&pool_of(4)).unwrap();
        for (i, ring) in scene.rings.iter().enumerate() {
            assert_eq!(ring.spec, RingSpec::new(i as u32, scene.base_hue));
            assert_eq!(ring.instances.len(), 8 + 4 * i);
            assert_eq!(ring.color, ring.spec.color());
        }
        assert_eq!(
            scene.centerpiece.color,
            hsl_to_linear(scene.base_hue, 1.0, 0.5)
        );
    }

    #[test]
    fn seeded_compositions_are_reproducible() {
        let pool = pool_of(8);
        let a = composer(42).compose(&pool).unwrap();
        let b = composer(42).compose(&pool).unwrap();
        assert_eq!(a.base_hue, b.base_hue);
        assert_eq!(a.centerpiece.kind, b.centerpiece.kind);
        let kinds = |s: &ComposedScene| {
            s.rings.iter().map(|r| r.kind).collect::<Vec<_>>()
        };
        assert_eq!(kinds(&a), kinds(&b));
    }

    #[test]
    fn rings_share_one_geometry_allocation() {
        let pool = pool_of(1);
        let scene = composer(9).compose(&pool).unwrap();
        let first = &scene.rings[0].geometry;
        assert!(scene.rings.iter().all(|r| Arc::ptr_eq(&r.geometry, first)));
    }
}
