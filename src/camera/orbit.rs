//! Damped orbit controls.
//!
//! The eye sits on a sphere around `target`, described by a polar angle
//! `phi` measured from +Y and an azimuth `theta` measured from +Z toward +X.
//! Pointer input does not move the camera directly; it accumulates pending
//! rotation and pan, and each [`OrbitControls::update`] applies a
//! `damping_factor` share of what is pending and keeps the rest, so motion
//! eases out over following frames.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::core::{Camera, CameraUniform};
use crate::options::CameraOptions;

/// Keeps `phi` off the poles so the view basis never degenerates.
const POLE_EPSILON: f32 = 1e-6;
/// Zoom factor per wheel notch at `zoom_speed = 1`.
const ZOOM_BASE: f32 = 0.95;
/// Pending motion below this is dropped.
const REST_THRESHOLD: f32 = 1e-6;

/// Spherical coordinates of the eye relative to the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    /// Distance from the target.
    pub radius: f32,
    /// Polar angle from +Y.
    pub phi: f32,
    /// Azimuth around +Y, from +Z toward +X.
    pub theta: f32,
}

impl Spherical {
    /// Spherical coordinates of an offset vector.
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    /// Offset vector for these coordinates.
    pub fn to_offset(self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Orbit camera with damped rotation, pan and wheel zoom.
pub struct OrbitControls {
    /// Current projection and pose.
    pub camera: Camera,
    target: Vec3,
    spherical: Spherical,
    pending_rotation: Spherical,
    pending_pan: Vec3,
    pending_scale: f32,
    viewport_height: f32,
    damping_factor: f32,
    rotate_speed: f32,
    zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitControls {
    /// Controls looking at the origin from `+Z * options.distance`.
    pub fn new(options: &CameraOptions, width: u32, height: u32) -> Self {
        let target = Vec3::ZERO;
        let eye = Vec3::new(0.0, 0.0, options.distance);
        let camera = Camera {
            eye,
            target,
            up: Vec3::Y,
            aspect: aspect_ratio(width, height),
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        };

        Self {
            camera,
            target,
            spherical: Spherical::from_offset(eye - target),
            pending_rotation: Spherical {
                radius: 0.0,
                phi: 0.0,
                theta: 0.0,
            },
            pending_pan: Vec3::ZERO,
            pending_scale: 1.0,
            viewport_height: height.max(1) as f32,
            damping_factor: options.damping_factor.clamp(0.0, 1.0),
            rotate_speed: options.rotate_speed,
            zoom_speed: options.zoom_speed,
            min_distance: options.min_distance,
            max_distance: options.max_distance.max(options.min_distance),
        }
    }

    /// Update the projection for a new viewport size. Zero sizes are
    /// ignored (minimized windows).
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera.aspect = aspect_ratio(width, height);
        self.viewport_height = height as f32;
    }

    /// Queue rotation for a pointer drag of `delta` pixels.
    ///
    /// A drag across the full viewport height turns the camera a full
    /// revolution.
    pub fn rotate(&mut self, delta: Vec2) {
        let scale = TAU / self.viewport_height * self.rotate_speed;
        self.pending_rotation.theta -= delta.x * scale;
        self.pending_rotation.phi -= delta.y * scale;
    }

    /// Queue a pan for a pointer drag of `delta` pixels; the point under
    /// the cursor follows it at the target's depth.
    pub fn pan(&mut self, delta: Vec2) {
        let distance = (self.camera.eye - self.target).length()
            * (self.camera.fovy.to_radians() / 2.0).tan();
        let world_per_pixel = 2.0 * distance / self.viewport_height;

        let forward = (self.target - self.camera.eye).normalize_or_zero();
        let right = forward.cross(self.camera.up).normalize_or_zero();
        let up = right.cross(forward);

        self.pending_pan += right * (-delta.x * world_per_pixel)
            + up * (delta.y * world_per_pixel);
    }

    /// Zoom by `notches` wheel steps; positive moves closer.
    pub fn zoom(&mut self, notches: f32) {
        self.pending_scale *= ZOOM_BASE.powf(notches * self.zoom_speed);
    }

    /// Advance damping by one frame and move the camera.
    ///
    /// Returns `true` while motion is still pending.
    pub fn update(&mut self) -> bool {
        let d = self.damping_factor;

        self.spherical.theta =
            wrap_angle(self.spherical.theta + self.pending_rotation.theta * d);
        self.spherical.phi = (self.spherical.phi
            + self.pending_rotation.phi * d)
            .clamp(POLE_EPSILON, PI - POLE_EPSILON);
        self.spherical.radius = (self.spherical.radius * self.pending_scale)
            .clamp(self.min_distance, self.max_distance);
        self.pending_scale = 1.0;

        self.target += self.pending_pan * d;

        self.camera.target = self.target;
        self.camera.eye = self.target + self.spherical.to_offset();

        self.pending_rotation.theta *= 1.0 - d;
        self.pending_rotation.phi *= 1.0 - d;
        self.pending_pan *= 1.0 - d;

        if self.pending_rotation.theta.abs() < REST_THRESHOLD {
            self.pending_rotation.theta = 0.0;
        }
        if self.pending_rotation.phi.abs() < REST_THRESHOLD {
            self.pending_rotation.phi = 0.0;
        }
        if self.pending_pan.length_squared() < REST_THRESHOLD {
            self.pending_pan = Vec3::ZERO;
        }

        self.is_moving()
    }

    /// `true` while rotation or pan is still easing out.
    pub fn is_moving(&self) -> bool {
        self.pending_rotation.theta != 0.0
            || self.pending_rotation.phi != 0.0
            || self.pending_pan != Vec3::ZERO
    }

    /// Current eye coordinates around the target.
    pub fn spherical(&self) -> Spherical {
        self.spherical
    }

    /// Orbit center.
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Uniform contents for the current pose.
    pub fn uniform(&self) -> CameraUniform {
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&self.camera);
        uniform
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls() -> OrbitControls {
        OrbitControls::new(&CameraOptions::default(), 800, 600)
    }

    #[test]
    fn starts_on_positive_z() {
        let mut c = controls();
        assert_eq!(c.camera.eye, Vec3::new(0.0, 0.0, 8.0));
        assert!(!c.update());
        assert!((c.camera.eye - Vec3::new(0.0, 0.0, 8.0)).length() < 1e-4);
        assert!((c.camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn spherical_round_trip() {
        let offset = Vec3::new(1.0, 2.0, -3.0);
        let back = Spherical::from_offset(offset).to_offset();
        assert!((back - offset).length() < 1e-5);
    }

    #[test]
    fn damped_rotation_eases_toward_full_drag() {
        let mut c = controls();
        c.rotate(Vec2::new(-60.0, 0.0));
        let expected = 60.0 * TAU / 600.0;

        assert!(c.update());
        let first = c.spherical().theta;
        assert!((first - expected * 0.03).abs() < 1e-5);

        for _ in 0..2000 {
            let _ = c.update();
        }
        assert!(!c.is_moving());
        assert!((c.spherical().theta - expected).abs() < 1e-3);
        // Distance is preserved while orbiting
        assert!((c.camera.eye.length() - 8.0).abs() < 1e-3);
    }

    #[test]
    fn polar_angle_is_clamped_off_the_poles() {
        let mut c = controls();
        c.rotate(Vec2::new(0.0, 10_000.0));
        for _ in 0..2000 {
            let _ = c.update();
        }
        let phi = c.spherical().phi;
        assert!(phi > 0.0 && phi < PI);
        assert!(c.camera.eye.is_finite());
    }

    #[test]
    fn zoom_respects_distance_limits() {
        let mut c = controls();
        c.zoom(1.0);
        let _ = c.update();
        assert!((c.spherical().radius - 8.0 * 0.95).abs() < 1e-4);

        c.zoom(1000.0);
        let _ = c.update();
        assert_eq!(c.spherical().radius, CameraOptions::default().min_distance);

        c.zoom(-1000.0);
        let _ = c.update();
        assert_eq!(c.spherical().radius, CameraOptions::default().max_distance);
    }

    #[test]
    fn pan_moves_target_and_eye_together() {
        let mut c = controls();
        c.pan(Vec2::new(-100.0, 0.0));
        for _ in 0..2000 {
            let _ = c.update();
        }
        assert!(c.target().x > 0.0);
        assert!((c.camera.eye - c.target() - Vec3::new(0.0, 0.0, 8.0)).length() < 1e-3);
    }

    #[test]
    fn resize_only_touches_aspect() {
        let mut c = controls();
        let before = c.camera.clone();
        c.resize(1920, 1080);
        assert!((c.camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
        assert_eq!(c.camera.eye, before.eye);
        assert_eq!(c.camera.fovy, before.fovy);

        c.resize(0, 1080);
        assert!((c.camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn uniform_matches_camera() {
        let c = controls();
        let u = c.uniform();
        assert_eq!(u.position, [0.0, 0.0, 8.0]);
        assert_eq!(u.view, c.camera.build_view().to_cols_array_2d());
    }
}
