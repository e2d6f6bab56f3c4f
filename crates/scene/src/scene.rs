//! Scene container.

use glam::Vec3;

use crate::light::{AmbientLight, DirectionalLight, PointLight, SpotLight};
use crate::material::Material;
use crate::primitive::MeshData;
use crate::transform::Transform;

/// A renderable object: mesh, material, and placement.
#[derive(Clone, Debug)]
pub struct SceneObject {
    /// Name for logging and lookup.
    pub name: String,
    /// Mesh geometry.
    pub mesh: MeshData,
    /// Surface material.
    pub material: Material,
    /// Placement in the world.
    pub transform: Transform,
    /// Whether this object renders into the shadow map.
    pub cast_shadow: bool,
    /// Whether shadows darken this object's surface.
    pub receive_shadow: bool,
}

impl SceneObject {
    /// Create an object with shadow casting and receiving disabled.
    pub fn new(name: &str, mesh: MeshData, material: Material, transform: Transform) -> Self {
        Self {
            name: name.to_string(),
            mesh,
            material,
            transform,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    /// Render this object into the shadow map.
    pub fn casting_shadow(mut self) -> Self {
        self.cast_shadow = true;
        self
    }

    /// Let shadows darken this object's surface.
    pub fn receiving_shadow(mut self) -> Self {
        self.receive_shadow = true;
        self
    }
}

/// The complete scene: background, lights, and objects.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Clear color behind all geometry.
    pub background: Vec3,
    /// Uniform ambient term.
    pub ambient: AmbientLight,
    /// The single directional light.
    pub directional: DirectionalLight,
    /// Point lights.
    pub point_lights: Vec<PointLight>,
    /// Spot lights.
    pub spot_lights: Vec<SpotLight>,
    /// Renderable objects.
    pub objects: Vec<SceneObject>,
}

impl Scene {
    /// Create an empty scene with the given background color.
    pub fn new(background: Vec3) -> Self {
        Self {
            background,
            ambient: AmbientLight::default(),
            directional: DirectionalLight::default(),
            point_lights: Vec::new(),
            spot_lights: Vec::new(),
            objects: Vec::new(),
        }
    }

    /// Add an object to the scene.
    pub fn add_object(&mut self, object: SceneObject) -> &mut Self {
        self.objects.push(object);
        self
    }

    /// Add a point light to the scene.
    pub fn add_point_light(&mut self, light: PointLight) -> &mut Self {
        self.point_lights.push(light);
        self
    }

    /// Add a spot light to the scene.
    pub fn add_spot_light(&mut self, light: SpotLight) -> &mut Self {
        self.spot_lights.push(light);
        self
    }

    /// Names of the textures the scene's materials reference, deduplicated
    /// in first-use order.
    pub fn texture_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for object in &self.objects {
            if let Some(texture) = object.material.texture.as_deref()
                && !keys.contains(&texture)
            {
                keys.push(texture);
            }
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::cuboid;

    #[test]
    fn test_scene_starts_empty() {
        let scene = Scene::new(Vec3::ONE);
        assert!(scene.objects.is_empty());
        assert!(scene.point_lights.is_empty());
        assert!(scene.spot_lights.is_empty());
    }

    #[test]
    fn test_add_object() {
        let mut scene = Scene::new(Vec3::ONE);
        scene.add_object(SceneObject::new(
            "cube",
            cuboid(1.0, 1.0, 1.0),
            Material::default(),
            Transform::new(),
        ));
        assert_eq!(scene.objects.len(), 1);
        assert_eq!(scene.objects[0].name, "cube");
    }

    #[test]
    fn test_shadow_flags() {
        let object = SceneObject::new(
            "cube",
            cuboid(1.0, 1.0, 1.0),
            Material::default(),
            Transform::new(),
        )
        .casting_shadow()
        .receiving_shadow();

        assert!(object.cast_shadow);
        assert!(object.receive_shadow);
    }

    #[test]
    fn test_texture_keys_dedup_in_order() {
        let mut scene = Scene::new(Vec3::ONE);
        for texture in ["lava", "cheese", "lava", "bricks"] {
            scene.add_object(SceneObject::new(
                texture,
                cuboid(1.0, 1.0, 1.0),
                Material::lambert(texture),
                Transform::new(),
            ));
        }
        scene.add_object(SceneObject::new(
            "plain",
            cuboid(1.0, 1.0, 1.0),
            Material::default(),
            Transform::new(),
        ));

        assert_eq!(scene.texture_keys(), vec!["lava", "cheese", "bricks"]);
    }
}
