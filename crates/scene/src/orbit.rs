//! Orbit camera controller.
//!
//! Rotates and zooms the camera around a fixed target point. The caller
//! feeds in mouse drag and scroll deltas; [`OrbitController::update_camera`]
//! writes the resulting position into the camera and aims it at the target.

use glam::Vec3;

use crate::camera::Camera;

/// Radians of yaw/pitch per pixel of mouse drag.
const ROTATE_SPEED: f32 = 0.005;
/// Distance change per scroll step.
const ZOOM_SPEED: f32 = 0.5;
/// Pitch stays this far short of the poles.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Spherical-coordinate camera controller around a fixed target.
#[derive(Clone, Debug)]
pub struct OrbitController {
    /// Point the camera orbits and looks at.
    pub target: Vec3,
    /// Rotation around the vertical axis, in radians.
    pub yaw: f32,
    /// Elevation angle above the horizontal plane, in radians.
    pub pitch: f32,
    /// Distance from the target.
    pub distance: f32,
    /// Minimum zoom distance.
    pub min_distance: f32,
    /// Maximum zoom distance.
    pub max_distance: f32,
}

impl OrbitController {
    /// Create a controller at the given spherical coordinates.
    pub fn new(target: Vec3, yaw: f32, pitch: f32, distance: f32) -> Self {
        Self {
            target,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            distance,
            min_distance: 1.0,
            max_distance: 20.0,
        }
    }

    /// Derive the spherical coordinates from a camera position and target.
    pub fn from_camera(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().max(1e-4);
        let yaw = offset.x.atan2(offset.z);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        Self::new(target, yaw, pitch, distance)
    }

    /// Apply a mouse drag of `(dx, dy)` pixels. Dragging right orbits the
    /// camera right around the target; dragging up looks down onto it.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * ROTATE_SPEED;
        self.pitch = (self.pitch + dy * ROTATE_SPEED).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Apply a scroll of `delta` steps; positive zooms in.
    pub fn zoom(&mut self, delta: f32) {
        self.distance =
            (self.distance - delta * ZOOM_SPEED).clamp(self.min_distance, self.max_distance);
    }

    /// Camera position for the current spherical coordinates.
    pub fn position(&self) -> Vec3 {
        let horizontal = self.distance * self.pitch.cos();
        self.target
            + Vec3::new(
                horizontal * self.yaw.sin(),
                self.distance * self.pitch.sin(),
                horizontal * self.yaw.cos(),
            )
    }

    /// Write the orbit position into the camera and aim it at the target.
    pub fn update_camera(&self, camera: &mut Camera) {
        camera.position = self.position();
        camera.look_at(self.target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_camera_recovers_position() {
        let position = Vec3::new(0.0, 3.0, 4.5);
        let controller = OrbitController::from_camera(position, Vec3::ZERO);

        assert!((controller.position() - position).length() < 1e-4);
        assert!((controller.distance - position.length()).abs() < 1e-4);
        assert!(controller.yaw.abs() < 1e-5);
    }

    #[test]
    fn test_pitch_clamps_short_of_poles() {
        let mut controller = OrbitController::new(Vec3::ZERO, 0.0, 0.0, 5.0);
        controller.rotate(0.0, 10_000.0);
        assert!(controller.pitch <= PITCH_LIMIT);

        controller.rotate(0.0, -20_000.0);
        assert!(controller.pitch >= -PITCH_LIMIT);
    }

    #[test]
    fn test_zoom_clamps_distance() {
        let mut controller = OrbitController::new(Vec3::ZERO, 0.0, 0.0, 5.0);
        controller.zoom(1_000.0);
        assert_eq!(controller.distance, controller.min_distance);

        controller.zoom(-1_000.0);
        assert_eq!(controller.distance, controller.max_distance);
    }

    #[test]
    fn test_position_distance_is_preserved() {
        let controller = OrbitController::new(Vec3::new(1.0, 2.0, 3.0), 0.7, 0.3, 5.0);
        let offset = controller.position() - controller.target;
        assert!((offset.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_yaw_zero_is_positive_z() {
        let controller = OrbitController::new(Vec3::ZERO, 0.0, 0.0, 4.0);
        let position = controller.position();
        assert!((position - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-5);
    }

    #[test]
    fn test_update_camera_aims_at_target() {
        let controller = OrbitController::new(Vec3::ZERO, 0.4, 0.6, 5.0);
        let mut camera = Camera::default();
        controller.update_camera(&mut camera);

        let expected = (controller.target - camera.position).normalize();
        assert!((camera.forward() - expected).length() < 1e-4);
    }
}
