//! Surface materials.
//!
//! A single material type covers the three flavors the room uses: textured
//! surfaces with an emissive tint, matte (diffuse-only) surfaces, and shiny
//! surfaces with specular highlights.

use glam::Vec3;

/// Converts a `0xRRGGBB` color to a linear-ish [0, 1] RGB vector.
pub fn rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    )
}

/// Surface appearance of a scene object.
#[derive(Clone, Debug)]
pub struct Material {
    /// Base color, multiplied with the albedo texture when one is set.
    pub base_color: Vec3,
    /// Emissive color.
    pub emissive: Vec3,
    /// Emissive intensity.
    pub emissive_intensity: f32,
    /// Specular strength; zero for matte surfaces.
    pub specular_strength: f32,
    /// Specular exponent.
    pub shininess: f32,
    /// Key of the albedo texture, if any.
    pub texture: Option<String>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: Vec3::ONE,
            emissive: Vec3::ZERO,
            emissive_intensity: 0.0,
            specular_strength: 0.5,
            shininess: 32.0,
            texture: None,
        }
    }
}

impl Material {
    /// Textured surface with moderate specular response.
    pub fn standard(texture: &str) -> Self {
        Self {
            texture: Some(texture.to_string()),
            ..Self::default()
        }
    }

    /// Textured matte surface with no specular response.
    pub fn lambert(texture: &str) -> Self {
        Self {
            texture: Some(texture.to_string()),
            specular_strength: 0.0,
            ..Self::default()
        }
    }

    /// Textured shiny surface with strong highlights.
    pub fn phong(texture: &str) -> Self {
        Self {
            texture: Some(texture.to_string()),
            specular_strength: 1.0,
            ..Self::default()
        }
    }

    /// Untextured shiny surface of a solid color.
    pub fn phong_color(color: Vec3) -> Self {
        Self {
            base_color: color,
            specular_strength: 1.0,
            ..Self::default()
        }
    }

    /// Untextured surface with moderate specular response.
    pub fn standard_color(color: Vec3) -> Self {
        Self {
            base_color: color,
            ..Self::default()
        }
    }

    /// Add an emissive tint.
    pub fn with_emissive(mut self, color: Vec3, intensity: f32) -> Self {
        self.emissive = color;
        self.emissive_intensity = intensity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_conversion() {
        assert_eq!(rgb(0x000000), Vec3::ZERO);
        assert_eq!(rgb(0xFFFFFF), Vec3::ONE);

        let brown = rgb(0x8B4513);
        assert!((brown.x - 139.0 / 255.0).abs() < 1e-6);
        assert!((brown.y - 69.0 / 255.0).abs() < 1e-6);
        assert!((brown.z - 19.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_lambert_has_no_specular() {
        let material = Material::lambert("cheese");
        assert_eq!(material.specular_strength, 0.0);
        assert_eq!(material.texture.as_deref(), Some("cheese"));
    }

    #[test]
    fn test_phong_color_is_untextured() {
        let material = Material::phong_color(rgb(0x8B4513));
        assert!(material.texture.is_none());
        assert_eq!(material.specular_strength, 1.0);
    }

    #[test]
    fn test_with_emissive() {
        let material = Material::standard("lava").with_emissive(rgb(0xFF4500), 0.2);
        assert_eq!(material.emissive, rgb(0xFF4500));
        assert_eq!(material.emissive_intensity, 0.2);
    }
}
