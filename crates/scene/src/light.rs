//! Light definitions.
//!
//! Plain scene-side descriptions; the renderer packs them into the GPU
//! uniform layout.

use glam::Vec3;

/// Uniform ambient term applied to every surface.
#[derive(Clone, Copy, Debug)]
pub struct AmbientLight {
    /// Light color.
    pub color: Vec3,
    /// Light intensity.
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 0.05,
        }
    }
}

/// A directional light (sun-like).
#[derive(Clone, Copy, Debug)]
pub struct DirectionalLight {
    /// Direction the light travels, normalized.
    pub direction: Vec3,
    /// Light color.
    pub color: Vec3,
    /// Light intensity.
    pub intensity: f32,
    /// Whether this light renders into the shadow map.
    pub cast_shadow: bool,
}

impl DirectionalLight {
    /// A light positioned at `position` shining toward `target`.
    pub fn from_position(position: Vec3, target: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            direction: (target - position).normalize(),
            color,
            intensity,
            cast_shadow: false,
        }
    }

    /// Enable shadow casting for this light.
    pub fn with_shadow(mut self) -> Self {
        self.cast_shadow = true;
        self
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::NEG_Y,
            color: Vec3::ONE,
            intensity: 1.0,
            cast_shadow: false,
        }
    }
}

/// A point light with a finite range.
#[derive(Clone, Copy, Debug)]
pub struct PointLight {
    /// Position in world space.
    pub position: Vec3,
    /// Light color.
    pub color: Vec3,
    /// Light intensity.
    pub intensity: f32,
    /// Distance at which the contribution falls to zero.
    pub range: f32,
}

impl PointLight {
    /// Create a point light.
    pub fn new(position: Vec3, color: Vec3, intensity: f32, range: f32) -> Self {
        Self {
            position,
            color,
            intensity,
            range,
        }
    }
}

/// A cone-shaped spot light aimed at a target point.
#[derive(Clone, Copy, Debug)]
pub struct SpotLight {
    /// Position in world space.
    pub position: Vec3,
    /// Point the cone is aimed at.
    pub target: Vec3,
    /// Light color.
    pub color: Vec3,
    /// Light intensity.
    pub intensity: f32,
    /// Distance at which the contribution falls to zero.
    pub range: f32,
    /// Half-angle of full brightness, in radians.
    pub inner_angle: f32,
    /// Half-angle beyond which the light is zero, in radians.
    pub outer_angle: f32,
}

impl SpotLight {
    /// Normalized direction from position to target.
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directional_from_position() {
        let light =
            DirectionalLight::from_position(Vec3::new(0.0, 10.0, 8.0), Vec3::ZERO, Vec3::ONE, 1.0);
        let expected = (Vec3::ZERO - Vec3::new(0.0, 10.0, 8.0)).normalize();
        assert!((light.direction - expected).length() < 1e-5);
        assert!(!light.cast_shadow);
        assert!(light.with_shadow().cast_shadow);
    }

    #[test]
    fn test_directional_direction_is_normalized() {
        let light =
            DirectionalLight::from_position(Vec3::new(3.0, 7.0, -2.0), Vec3::ZERO, Vec3::ONE, 1.0);
        assert!((light.direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_spot_direction() {
        let light = SpotLight {
            position: Vec3::new(0.0, 2.0, 0.0),
            target: Vec3::ZERO,
            color: Vec3::new(0.0, 0.0, 1.0),
            intensity: 1.0,
            range: 100.0,
            inner_angle: std::f32::consts::FRAC_PI_8,
            outer_angle: std::f32::consts::FRAC_PI_4,
        };
        assert!((light.direction() - Vec3::NEG_Y).length() < 1e-5);
        assert!(light.inner_angle < light.outer_angle);
    }
}
