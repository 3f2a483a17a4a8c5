//! Shared utilities: color conversion and frame timing.

pub mod color;
/// Frame delta and smoothed FPS tracking.
pub mod frame_timing;
