//! Damped orbit camera.
//!
//! Dragging and scrolling feed angular and zoom velocities; [`Camera::update`]
//! applies them once per frame and lets them decay, which gives the eased
//! motion of a damped orbit control.

use glam::{Mat4, Vec3};

use crate::patterns::PatternKind;

/// Fraction of the remaining motion applied (and removed) each frame.
pub const DAMPING_FACTOR: f32 = 0.05;

const ORBIT_SENSITIVITY: f32 = 0.005;
const ZOOM_SENSITIVITY: f32 = 0.05;
const PITCH_LIMIT: f32 = 1.5;
const MIN_DISTANCE: f32 = 1.0;
const MAX_DISTANCE: f32 = 2000.0;

/// Default eye position for a pattern, looking at the origin.
///
/// The star patterns are viewed head-on from far away; the galaxy is small
/// and viewed from above.
pub fn canonical_position(kind: PatternKind) -> Vec3 {
    match kind {
        PatternKind::Galaxy => Vec3::new(0.0, 10.0, 5.0),
        _ => Vec3::new(0.0, 0.0, 400.0),
    }
}

/// Orbit camera for viewing the star field.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    zoom_velocity: f32,
}

impl Camera {
    pub fn new() -> Self {
        let mut camera = Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 1.0,
            target: Vec3::ZERO,
            fov_y: 75.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            zoom_velocity: 0.0,
        };
        camera.reset_to(canonical_position(PatternKind::default()));
        camera
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Place the camera at `position`, looking at the origin, and stop any motion.
    pub fn reset_to(&mut self, position: Vec3) {
        self.target = Vec3::ZERO;
        self.distance = position.length().max(MIN_DISTANCE);
        self.pitch = (position.y / self.distance).clamp(-1.0, 1.0).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.yaw = position.x.atan2(position.z);
        self.yaw_velocity = 0.0;
        self.pitch_velocity = 0.0;
        self.zoom_velocity = 0.0;
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Feed a pointer drag in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw_velocity -= dx * ORBIT_SENSITIVITY;
        self.pitch_velocity += dy * ORBIT_SENSITIVITY;
    }

    /// Feed a scroll amount in lines; positive zooms in.
    pub fn zoom(&mut self, scroll: f32) {
        self.zoom_velocity -= scroll * ZOOM_SENSITIVITY;
    }

    /// Apply a damped step of the pending motion. Call once per frame.
    pub fn update(&mut self) {
        self.yaw += self.yaw_velocity * DAMPING_FACTOR;
        self.pitch = (self.pitch + self.pitch_velocity * DAMPING_FACTOR).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.distance = (self.distance * (self.zoom_velocity * DAMPING_FACTOR).exp())
            .clamp(MIN_DISTANCE, MAX_DISTANCE);

        let decay = 1.0 - DAMPING_FACTOR;
        self.yaw_velocity *= decay;
        self.pitch_velocity *= decay;
        self.zoom_velocity *= decay;
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_round_trips_position() {
        let mut camera = Camera::new();
        for kind in PatternKind::ALL {
            let expected = canonical_position(kind);
            camera.reset_to(expected);
            assert!((camera.position() - expected).length() < 1e-3, "{:?}", kind);
        }
    }

    #[test]
    fn test_galaxy_viewpoint_is_elevated() {
        let galaxy = canonical_position(PatternKind::Galaxy);
        let stars = canonical_position(PatternKind::Spiral);
        assert!(galaxy.y > 0.0);
        assert_eq!(stars.y, 0.0);
        assert_ne!(galaxy, stars);
    }

    #[test]
    fn test_damping_eases_and_settles() {
        let mut camera = Camera::new();
        camera.orbit(100.0, 0.0);

        let start = camera.yaw;
        camera.update();
        let first_step = (camera.yaw - start).abs();
        let mid = camera.yaw;
        camera.update();
        let second_step = (camera.yaw - mid).abs();
        assert!(first_step > 0.0);
        assert!(second_step < first_step);

        for _ in 0..1000 {
            camera.update();
        }
        let settled = camera.yaw;
        camera.update();
        assert!((camera.yaw - settled).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = Camera::new();
        for _ in 0..200 {
            camera.zoom(100.0);
            camera.update();
        }
        assert!(camera.distance >= MIN_DISTANCE);

        for _ in 0..200 {
            camera.zoom(-100.0);
            camera.update();
        }
        assert!(camera.distance <= MAX_DISTANCE);
    }

    #[test]
    fn test_viewport_ignores_zero_size() {
        let mut camera = Camera::new();
        camera.set_viewport(1600, 800);
        assert_eq!(camera.aspect, 2.0);
        camera.set_viewport(0, 800);
        assert_eq!(camera.aspect, 2.0);
    }
}
