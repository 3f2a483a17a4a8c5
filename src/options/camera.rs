use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Camera projection and orbit-control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Initial eye distance from the origin along +Z.
    pub distance: f32,
    /// Fraction of pending rotation applied (and removed) per frame.
    pub damping_factor: f32,
    /// Rotation sensitivity multiplier.
    pub rotate_speed: f32,
    /// Zoom sensitivity multiplier.
    pub zoom_speed: f32,
    /// Closest allowed eye distance.
    pub min_distance: f32,
    /// Farthest allowed eye distance.
    pub max_distance: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 75.0,
            znear: 0.1,
            zfar: 1000.0,
            distance: 8.0,
            damping_factor: 0.03,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.5,
            max_distance: 100.0,
        }
    }
}
