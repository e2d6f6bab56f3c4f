//! GPU uniform and push constant layouts.
//!
//! These structures match the shader-side std140 declarations byte for
//! byte; every field group is 16-byte aligned, with `Vec3` fields packing
//! a trailing scalar into the same slot.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use tracing::warn;

use roomview_scene::{Material, Scene};

/// Point light slots in the lights uniform.
pub const MAX_POINT_LIGHTS: usize = 4;
/// Spot light slots in the lights uniform.
pub const MAX_SPOT_LIGHTS: usize = 2;

/// Camera uniform, bound to set 0 binding 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct CameraUbo {
    /// View matrix (world to view space).
    pub view: Mat4,
    /// Projection matrix (view to clip space).
    pub projection: Mat4,
    /// Combined view-projection matrix.
    pub view_projection: Mat4,
    /// Camera world position.
    pub camera_position: Vec3,
    pub _pad: f32,
}

impl CameraUbo {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Build from view and projection matrices plus the camera position.
    pub fn new(view: Mat4, projection: Mat4, camera_position: Vec3) -> Self {
        Self {
            view,
            projection,
            view_projection: projection * view,
            camera_position,
            _pad: 0.0,
        }
    }
}

/// Directional light as the shader sees it.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct GpuDirectionalLight {
    /// Normalized travel direction.
    pub direction: Vec3,
    pub _pad0: f32,
    /// Light color.
    pub color: Vec3,
    /// Light intensity.
    pub intensity: f32,
}

/// Point light as the shader sees it.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct GpuPointLight {
    /// World position.
    pub position: Vec3,
    /// Falloff range.
    pub range: f32,
    /// Light color.
    pub color: Vec3,
    /// Light intensity.
    pub intensity: f32,
}

/// Spot light as the shader sees it.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct GpuSpotLight {
    /// World position.
    pub position: Vec3,
    /// Falloff range.
    pub range: f32,
    /// Normalized cone direction.
    pub direction: Vec3,
    /// Light intensity.
    pub intensity: f32,
    /// Light color.
    pub color: Vec3,
    /// Cosine of the inner (full brightness) cone half-angle.
    pub inner_cos: f32,
    /// Cosine of the outer (zero) cone half-angle.
    pub outer_cos: f32,
    pub _pad: [f32; 3],
}

/// All lights plus the shadow matrix, bound to set 0 binding 1.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct LightsUbo {
    /// Directional light view-projection for shadow lookups.
    pub light_view_proj: Mat4,
    /// The single directional light.
    pub directional: GpuDirectionalLight,
    /// Ambient color in rgb, intensity in w.
    pub ambient: Vec4,
    /// Point light slots.
    pub point: [GpuPointLight; MAX_POINT_LIGHTS],
    /// Spot light slots.
    pub spot: [GpuSpotLight; MAX_SPOT_LIGHTS],
    /// x = point count, y = spot count, z = shadows enabled, w unused.
    pub counts: [u32; 4],
}

impl LightsUbo {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Pack the scene's lights, dropping any beyond the slot counts with a
    /// warning.
    pub fn from_scene(scene: &Scene, light_view_proj: Mat4) -> Self {
        let mut ubo = Self {
            light_view_proj,
            directional: GpuDirectionalLight {
                direction: scene.directional.direction,
                _pad0: 0.0,
                color: scene.directional.color,
                intensity: scene.directional.intensity,
            },
            ambient: Vec4::from((scene.ambient.color, scene.ambient.intensity)),
            ..Self::default()
        };

        if scene.point_lights.len() > MAX_POINT_LIGHTS {
            warn!(
                "Scene has {} point lights, rendering the first {}",
                scene.point_lights.len(),
                MAX_POINT_LIGHTS
            );
        }
        let point_count = scene.point_lights.len().min(MAX_POINT_LIGHTS);
        for (slot, light) in ubo.point.iter_mut().zip(&scene.point_lights) {
            *slot = GpuPointLight {
                position: light.position,
                range: light.range,
                color: light.color,
                intensity: light.intensity,
            };
        }

        if scene.spot_lights.len() > MAX_SPOT_LIGHTS {
            warn!(
                "Scene has {} spot lights, rendering the first {}",
                scene.spot_lights.len(),
                MAX_SPOT_LIGHTS
            );
        }
        let spot_count = scene.spot_lights.len().min(MAX_SPOT_LIGHTS);
        for (slot, light) in ubo.spot.iter_mut().zip(&scene.spot_lights) {
            *slot = GpuSpotLight {
                position: light.position,
                range: light.range,
                direction: light.direction(),
                intensity: light.intensity,
                color: light.color,
                inner_cos: light.inner_angle.cos(),
                outer_cos: light.outer_angle.cos(),
                _pad: [0.0; 3],
            };
        }

        ubo.counts = [
            point_count as u32,
            spot_count as u32,
            scene.directional.cast_shadow as u32,
            0,
        ];

        ubo
    }
}

/// Per-object push constants for the scene pass.
///
/// Must stay within the 128 bytes of push constant space every Vulkan
/// implementation guarantees.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct ObjectPush {
    /// Model matrix.
    pub model: Mat4,
    /// Base color in rgb; w is unused.
    pub base_color: Vec4,
    /// Emissive color in rgb, intensity in w.
    pub emissive: Vec4,
    /// x = specular strength, y = shininess, z = receives shadows.
    pub params: Vec4,
}

impl ObjectPush {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Build from an object's placement and material.
    pub fn new(model: Mat4, material: &Material, receive_shadow: bool) -> Self {
        Self {
            model,
            base_color: Vec4::from((material.base_color, 1.0)),
            emissive: Vec4::from((material.emissive, material.emissive_intensity)),
            params: Vec4::new(
                material.specular_strength,
                material.shininess,
                receive_shadow as u32 as f32,
                0.0,
            ),
        }
    }
}

/// Per-object push constants for the shadow pass.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct ShadowPush {
    /// Model matrix.
    pub model: Mat4,
}

impl ShadowPush {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomview_scene::room::living_room;

    #[test]
    fn test_camera_ubo_layout() {
        // 3 Mat4 (192) + Vec3 (12) + pad (4)
        assert_eq!(CameraUbo::SIZE, 208);
        assert_eq!(std::mem::align_of::<CameraUbo>(), 16);
    }

    #[test]
    fn test_light_struct_layouts() {
        assert_eq!(std::mem::size_of::<GpuDirectionalLight>(), 32);
        assert_eq!(std::mem::size_of::<GpuPointLight>(), 32);
        assert_eq!(std::mem::size_of::<GpuSpotLight>(), 64);
    }

    #[test]
    fn test_lights_ubo_layout() {
        // mat4 (64) + directional (32) + ambient (16)
        //   + 4 point (128) + 2 spot (128) + counts (16)
        assert_eq!(LightsUbo::SIZE, 384);
        assert_eq!(std::mem::align_of::<LightsUbo>(), 16);
    }

    #[test]
    fn test_object_push_fits_guaranteed_limit() {
        // mat4 (64) + 3 vec4 (48)
        assert_eq!(ObjectPush::SIZE, 112);
        assert!(ObjectPush::SIZE <= 128);
        assert_eq!(ShadowPush::SIZE, 64);
    }

    #[test]
    fn test_camera_ubo_view_projection() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 3.0, 4.5), Vec3::ZERO, Vec3::Y);
        let projection = Mat4::perspective_rh(1.0, 16.0 / 9.0, 0.1, 1000.0);
        let ubo = CameraUbo::new(view, projection, Vec3::new(0.0, 3.0, 4.5));
        assert_eq!(ubo.view_projection, projection * view);
    }

    #[test]
    fn test_lights_from_living_room() {
        let scene = living_room();
        let ubo = LightsUbo::from_scene(&scene, Mat4::IDENTITY);

        assert_eq!(ubo.counts[0], 3);
        assert_eq!(ubo.counts[1], 1);
        assert_eq!(ubo.counts[2], 1);

        assert_eq!(ubo.directional.intensity, 1.0);
        assert_eq!(ubo.point[0].intensity, 1.2);
        assert_eq!(ubo.point[0].range, 10.0);
        // Unused slots stay zeroed.
        assert_eq!(ubo.point[3].intensity, 0.0);

        let spot = &ubo.spot[0];
        assert!((spot.direction - Vec3::NEG_Y).length() < 1e-5);
        assert!(spot.inner_cos > spot.outer_cos);
    }

    #[test]
    fn test_lights_clamp_to_slots() {
        let mut scene = living_room();
        for _ in 0..4 {
            let extra = scene.point_lights[0];
            scene.add_point_light(extra);
        }
        let ubo = LightsUbo::from_scene(&scene, Mat4::IDENTITY);
        assert_eq!(ubo.counts[0], MAX_POINT_LIGHTS as u32);
    }

    #[test]
    fn test_object_push_packs_material() {
        let scene = living_room();
        let floor = &scene.objects[0];
        let push = ObjectPush::new(
            floor.transform.local_matrix(),
            &floor.material,
            floor.receive_shadow,
        );

        assert_eq!(push.emissive.w, 0.2);
        assert_eq!(push.params.z, 1.0);
        assert_eq!(push.base_color.w, 1.0);
    }
}
