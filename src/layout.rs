//! Ring layout: how many instances each ring holds and where they sit.
//!
//! Every quantity is a pure function of the ring index (plus the session's
//! base hue for color). Ring `i` holds `8 + 4i` instances evenly spaced on a
//! circle of radius `1 + 0.6i`, pushed back to `z = -0.5 - 0.25i`. Each
//! instance is rotated about +Z by the same angle that places it on the
//! circle, so the shapes turn with their orbital position.

use std::f32::consts::TAU;

use glam::{Mat4, Quat, Vec3};

use crate::util::color::{hsl_to_linear, wrap_hue};

/// Number of rings in a composed scene.
pub const RING_COUNT: usize = 10;

/// Instances on the innermost ring.
const BASE_INSTANCES: u32 = 8;
/// Additional instances per ring step outward.
const INSTANCES_PER_RING: u32 = 4;
/// Radius of the innermost ring.
const BASE_RADIUS: f32 = 1.0;
/// Radius increase per ring step.
const RADIUS_STEP: f32 = 0.6;
/// Depth of the innermost ring.
const BASE_DEPTH: f32 = -0.5;
/// Depth change per ring step (negative: away from the default camera).
const DEPTH_STEP: f32 = -0.25;
/// Hue offset per ring step.
const HUE_STEP: f32 = 0.1;
/// Uniform scale applied to every ring instance.
pub const INSTANCE_SCALE: f32 = 0.5;
/// HSL saturation of every material.
pub const SATURATION: f32 = 1.0;
/// HSL lightness of every material.
pub const LIGHTNESS: f32 = 0.5;

/// Instances on ring `index`.
#[inline]
pub fn instance_count(index: u32) -> u32 {
    BASE_INSTANCES + index * INSTANCES_PER_RING
}

/// Angle between consecutive instances on ring `index`, in radians.
#[inline]
pub fn angular_step(index: u32) -> f32 {
    TAU / instance_count(index) as f32
}

/// Circle radius of ring `index`.
#[inline]
pub fn radius(index: u32) -> f32 {
    BASE_RADIUS + index as f32 * RADIUS_STEP
}

/// Z offset of ring `index`.
#[inline]
pub fn depth(index: u32) -> f32 {
    BASE_DEPTH + index as f32 * DEPTH_STEP
}

/// Hue of ring `index`, wrapped to `[0, 1)`.
#[inline]
pub fn hue(base_hue: f32, index: u32) -> f32 {
    wrap_hue(base_hue + index as f32 * HUE_STEP)
}

/// Everything derived from a ring index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingSpec {
    /// 0-based ring index, innermost first.
    pub index: u32,
    /// Number of instances on the ring.
    pub instance_count: u32,
    /// Angle between consecutive instances (radians).
    pub angular_step: f32,
    /// Circle radius.
    pub radius: f32,
    /// Z offset of the whole ring.
    pub depth: f32,
    /// Material hue in `[0, 1)`.
    pub hue: f32,
}

impl RingSpec {
    /// Derive the spec for ring `index` under the session's `base_hue`.
    pub fn new(index: u32, base_hue: f32) -> Self {
        Self {
            index,
            instance_count: instance_count(index),
            angular_step: angular_step(index),
            radius: radius(index),
            depth: depth(index),
            hue: hue(base_hue, index),
        }
    }

    /// Orbital angle of instance `j`.
    #[inline]
    pub fn angle(&self, j: u32) -> f32 {
        self.angular_step * j as f32
    }

    /// Linear RGB material color.
    pub fn color(&self) -> [f32; 3] {
        hsl_to_linear(self.hue, SATURATION, LIGHTNESS)
    }

    /// Placement of instance `j`.
    pub fn instance(&self, j: u32) -> InstanceTransform {
        let angle = self.angle(j);
        let (sin, cos) = angle.sin_cos();
        InstanceTransform {
            position: Vec3::new(cos * self.radius, sin * self.radius, self.depth),
            rotation: Quat::from_axis_angle(Vec3::Z, j as f32 * self.angular_step),
            scale: INSTANCE_SCALE,
        }
    }

    /// Placements of every instance, in orbital order.
    pub fn instances(&self) -> Vec<InstanceTransform> {
        (0..self.instance_count).map(|j| self.instance(j)).collect()
    }
}

/// Per-instance placement: translation, rotation about +Z, uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceTransform {
    /// World-space translation.
    pub position: Vec3,
    /// Rotation (always about +Z for ring instances).
    pub rotation: Quat,
    /// Uniform scale factor.
    pub scale: f32,
}

impl InstanceTransform {
    /// Identity placement at the origin.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: 1.0,
    };

    /// Model matrix (scale, then rotate, then translate).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.rotation,
            self.position,
        )
    }

    /// Angle of the position around +Z, in `[0, 2π)`.
    pub fn orbital_angle(&self) -> f32 {
        self.position.y.atan2(self.position.x).rem_euclid(TAU)
    }

    /// Rotation angle about +Z, in `[0, 2π)`.
    pub fn rotation_angle(&self) -> f32 {
        let (axis, angle) = self.rotation.to_axis_angle();
        let signed = if axis.z < 0.0 { -angle } else { angle };
        signed.rem_euclid(TAU)
    }
}
