//! Camera system for viewing the rings.
//!
//! Provides a perspective camera with its GPU uniform, damped orbit
//! controls, and (with the `viewer` feature) a window-event input adapter.

/// Core camera struct and GPU uniform types.
pub mod core;
/// Window-event-based camera input handler.
#[cfg(feature = "viewer")]
pub mod input;
/// Damped orbit controls driving the camera pose.
pub mod orbit;
