//! Scene composition and the per-session render state.
//!
//! [`SceneComposer`] turns a loaded [`GeometryPool`](crate::assets::GeometryPool)
//! into a [`ComposedScene`] exactly once; [`SceneSession`] then owns that
//! scene together with the GPU resources that draw it.

mod composer;
mod select;
mod session;

pub use composer::{
    build_ring, Centerpiece, ComposedScene, RenderableRing, SceneComposer,
    BASE_HUE_MAX, BASE_HUE_MIN,
};
pub use select::{pick_one, CenterpieceKind, PrimitiveKind};
pub use session::SceneSession;
