//! Directional light shadow map.

use std::sync::Arc;

use ash::vk;
use glam::{Mat4, Vec3};

use roomview_rhi::RhiResult;
use roomview_rhi::device::Device;
use roomview_rhi::image::Image;

use crate::depth_buffer::DEPTH_FORMAT;

/// Shadow map resolution, matching the original scene's shadow settings.
pub const SHADOW_MAP_SIZE: u32 = 1024;

/// Center of the room the light frustum is fitted around.
const ROOM_CENTER: Vec3 = Vec3::new(0.0, 1.5, 0.0);
/// Half-extent of the orthographic frustum; covers the 5 x 3 x 4 room with
/// margin for the furniture.
const ORTHO_HALF_EXTENT: f32 = 4.0;
/// Distance the virtual light eye is pulled back from the room center.
const LIGHT_DISTANCE: f32 = 12.0;
/// Near and far planes of the light frustum.
const LIGHT_NEAR: f32 = 0.1;
const LIGHT_FAR: f32 = 24.0;

/// Depth image rendered from the directional light, sampled by the scene
/// pass through a comparison sampler.
pub struct ShadowMap {
    image: Image,
}

impl ShadowMap {
    /// Creates the shadow map image.
    pub fn new(device: Arc<Device>) -> RhiResult<Self> {
        let image = Image::new(
            device,
            "shadow_map",
            SHADOW_MAP_SIZE,
            SHADOW_MAP_SIZE,
            DEPTH_FORMAT,
            vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT | vk::ImageUsageFlags::SAMPLED,
            vk::ImageAspectFlags::DEPTH,
        )?;

        Ok(Self { image })
    }

    /// Vulkan image handle.
    #[inline]
    pub fn image(&self) -> vk::Image {
        self.image.handle()
    }

    /// Depth image view, used both as attachment and sampled texture.
    #[inline]
    pub fn view(&self) -> vk::ImageView {
        self.image.view()
    }

    /// Shadow map extent.
    #[inline]
    pub fn extent(&self) -> vk::Extent2D {
        self.image.extent()
    }

    /// The light's orthographic view-projection matrix for a directional
    /// light traveling along `direction`, fitted around the room.
    pub fn light_view_projection(direction: Vec3) -> Mat4 {
        let direction = direction.normalize();
        let eye = ROOM_CENTER - direction * LIGHT_DISTANCE;

        // A light shining straight down would be parallel to the Y up
        // vector; fall back to Z.
        let up = if direction.cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            Vec3::Y
        };

        let view = Mat4::look_at_rh(eye, ROOM_CENTER, up);
        let mut projection = Mat4::orthographic_rh(
            -ORTHO_HALF_EXTENT,
            ORTHO_HALF_EXTENT,
            -ORTHO_HALF_EXTENT,
            ORTHO_HALF_EXTENT,
            LIGHT_NEAR,
            LIGHT_FAR,
        );
        // Same Vulkan Y-flip as the camera projection
        projection.y_axis.y *= -1.0;

        projection * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_shadow_map_size() {
        assert_eq!(SHADOW_MAP_SIZE, 1024);
    }

    #[test]
    fn test_room_corners_inside_light_frustum() {
        // The original's light shines from (0, 10, 8) toward the origin.
        let direction = (Vec3::ZERO - Vec3::new(0.0, 10.0, 8.0)).normalize();
        let light = ShadowMap::light_view_projection(direction);

        let corners = [
            Vec3::new(-2.5, 0.0, -2.0),
            Vec3::new(2.5, 0.0, -2.0),
            Vec3::new(-2.5, 3.0, 2.0),
            Vec3::new(2.5, 3.0, 2.0),
        ];

        for corner in corners {
            let clip = light * Vec4::from((corner, 1.0));
            // Orthographic: w is 1, clip coordinates are NDC directly.
            assert!(clip.x.abs() <= 1.0, "corner {:?} outside x range", corner);
            assert!(clip.y.abs() <= 1.0, "corner {:?} outside y range", corner);
            assert!(
                clip.z >= 0.0 && clip.z <= 1.0,
                "corner {:?} outside depth range",
                corner
            );
        }
    }

    #[test]
    fn test_straight_down_light_has_valid_matrix() {
        let light = ShadowMap::light_view_projection(Vec3::NEG_Y);
        // No NaN from a degenerate up vector.
        assert!(light.is_finite());
    }
}
