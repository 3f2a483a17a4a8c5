//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, depth and matcap textures,
//! and bind-group layout helpers.

/// Shared wgpu bind-group layout and sampler helpers.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Depth attachment and sampled matcap textures.
pub mod texture;
