//! The hand-authored living-room scene.
//!
//! A small furnished room: textured floor, walls, and ceiling, a couch
//! built from boxes, a desk lamp with a cone shade, and a nightstand,
//! lit by one shadow-casting directional light, three point lights, and
//! a blue spot light. All positions, dimensions, and colors are literal;
//! nothing here is computed or configurable.

use glam::{Quat, Vec3};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_8};

use crate::light::{DirectionalLight, PointLight, SpotLight};
use crate::material::{Material, rgb};
use crate::primitive::{cone, cuboid, cylinder};
use crate::scene::{Scene, SceneObject};
use crate::transform::Transform;

/// Starting camera position, looking at [`CAMERA_TARGET`].
pub const CAMERA_START: Vec3 = Vec3::new(0.0, 3.0, 4.5);
/// Point the camera orbits around.
pub const CAMERA_TARGET: Vec3 = Vec3::ZERO;

/// Radial segments for the lamp's cylinder and cone.
const LAMP_SEGMENTS: u32 = 32;

/// Builds the living-room scene.
pub fn living_room() -> Scene {
    let mut scene = Scene::new(rgb(0xF5F5DC));

    scene.directional = DirectionalLight::from_position(
        Vec3::new(0.0, 10.0, 8.0),
        Vec3::ZERO,
        rgb(0xFFFFFF),
        1.0,
    )
    .with_shadow();

    // Glow rising from the lava floor
    scene.add_point_light(PointLight::new(
        Vec3::new(0.0, 1.1, 0.0),
        rgb(0xFF4500),
        1.2,
        10.0,
    ));

    // Warm fill light in the middle of the room
    scene.add_point_light(PointLight::new(
        Vec3::new(0.0, 2.0, 0.0),
        rgb(0xFFFF99),
        0.8,
        15.0,
    ));

    scene.add_spot_light(SpotLight {
        position: Vec3::new(0.0, 2.0, 0.0),
        target: Vec3::ZERO,
        color: rgb(0x0000FF),
        intensity: 1.0,
        range: 100.0,
        inner_angle: FRAC_PI_8,
        outer_angle: FRAC_PI_4,
    });

    scene.add_object(
        SceneObject::new(
            "floor",
            cuboid(5.0, 0.125, 4.0),
            Material::standard("lava").with_emissive(rgb(0xFF4500), 0.2),
            Transform::at(0.0, 0.0, 0.0),
        )
        .receiving_shadow(),
    );

    scene.add_object(
        SceneObject::new(
            "left-wall",
            cuboid(0.1, 3.0, 4.0),
            Material::lambert("cheese").with_emissive(rgb(0xF4D942), 0.1),
            Transform::at(-2.45, 1.5, 0.0),
        )
        .receiving_shadow(),
    );

    scene.add_object(
        SceneObject::new(
            "right-wall",
            cuboid(0.1, 3.0, 4.0),
            Material::lambert("cheese").with_emissive(rgb(0xF4D942), 0.1),
            Transform::at(2.45, 1.5, 0.0),
        )
        .receiving_shadow(),
    );

    scene.add_object(
        SceneObject::new(
            "back-wall",
            cuboid(5.0, 3.0, 0.1),
            Material::lambert("bricks"),
            Transform::at(0.0, 1.5, -2.0),
        )
        .receiving_shadow(),
    );

    scene.add_object(
        SceneObject::new(
            "ceiling",
            cuboid(5.0, 0.125, 4.0),
            Material::phong("pizza"),
            Transform::at(0.0, 3.0, 0.0),
        )
        .receiving_shadow(),
    );

    // Couch, assembled from boxes
    let couch = Material::phong_color(rgb(0x8B4513));

    scene.add_object(SceneObject::new(
        "couch-base",
        cuboid(2.5, 0.5, 1.0),
        couch.clone(),
        Transform::at(-0.2, 0.25, -1.0),
    ));

    scene.add_object(SceneObject::new(
        "couch-backrest",
        cuboid(2.5, 1.0, 0.3),
        couch.clone(),
        Transform::at(-0.2, 0.5, -1.23),
    ));

    scene.add_object(SceneObject::new(
        "couch-armrest-left",
        cuboid(0.6, 0.3, 0.6),
        couch.clone(),
        Transform::at(-1.35, 0.5, -0.95),
    ));

    scene.add_object(SceneObject::new(
        "couch-armrest-right",
        cuboid(0.6, 0.3, 0.6),
        couch,
        Transform::at(0.95, 0.5, -0.95),
    ));

    // Desk lamp with a green shade and its own point light
    scene.add_object(SceneObject::new(
        "lamp-base",
        cylinder(0.1, 0.1, 1.0, LAMP_SEGMENTS),
        Material::phong_color(rgb(0x000000)),
        Transform::at(1.8, 1.0, -1.0),
    ));

    scene.add_object(SceneObject::new(
        "lamp-shade",
        cone(0.5, 1.0, LAMP_SEGMENTS),
        Material::phong_color(rgb(0x32CD32)),
        Transform::at(1.8, 1.5, -1.0).with_rotation(Quat::from_rotation_y(FRAC_PI_2)),
    ));

    scene.add_point_light(PointLight::new(
        Vec3::new(1.8, 1.8, -1.0),
        rgb(0x32CD32),
        1.0,
        10.0,
    ));

    scene.add_object(
        SceneObject::new(
            "nightstand",
            cuboid(0.5, 0.5, 0.5),
            Material::standard_color(rgb(0x8B4513)),
            Transform::at(1.8, 0.32, -1.0),
        )
        .casting_shadow(),
    );

    scene
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(scene: &'a Scene, name: &str) -> &'a SceneObject {
        scene
            .objects
            .iter()
            .find(|o| o.name == name)
            .unwrap_or_else(|| panic!("missing object {:?}", name))
    }

    #[test]
    fn test_room_object_roster() {
        let scene = living_room();
        let names: Vec<&str> = scene.objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "floor",
                "left-wall",
                "right-wall",
                "back-wall",
                "ceiling",
                "couch-base",
                "couch-backrest",
                "couch-armrest-left",
                "couch-armrest-right",
                "lamp-base",
                "lamp-shade",
                "nightstand",
            ]
        );
    }

    #[test]
    fn test_room_surfaces() {
        let scene = living_room();

        let floor = find(&scene, "floor");
        assert_eq!(floor.transform.position, Vec3::ZERO);
        assert_eq!(floor.material.texture.as_deref(), Some("lava"));
        assert_eq!(floor.material.emissive, rgb(0xFF4500));
        assert_eq!(floor.material.emissive_intensity, 0.2);
        assert!(floor.receive_shadow);
        assert!(!floor.cast_shadow);

        let left = find(&scene, "left-wall");
        let right = find(&scene, "right-wall");
        assert_eq!(left.transform.position, Vec3::new(-2.45, 1.5, 0.0));
        assert_eq!(right.transform.position, Vec3::new(2.45, 1.5, 0.0));
        // Walls are matte
        assert_eq!(left.material.specular_strength, 0.0);
        assert_eq!(left.material.texture.as_deref(), Some("cheese"));

        let back = find(&scene, "back-wall");
        assert_eq!(back.transform.position, Vec3::new(0.0, 1.5, -2.0));
        assert_eq!(back.material.texture.as_deref(), Some("bricks"));

        let ceiling = find(&scene, "ceiling");
        assert_eq!(ceiling.transform.position, Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(ceiling.material.texture.as_deref(), Some("pizza"));
    }

    #[test]
    fn test_room_furniture() {
        let scene = living_room();

        let base = find(&scene, "couch-base");
        assert_eq!(base.transform.position, Vec3::new(-0.2, 0.25, -1.0));
        assert_eq!(base.material.base_color, rgb(0x8B4513));

        let backrest = find(&scene, "couch-backrest");
        assert_eq!(backrest.transform.position, Vec3::new(-0.2, 0.5, -1.23));

        assert_eq!(
            find(&scene, "couch-armrest-left").transform.position,
            Vec3::new(-1.35, 0.5, -0.95)
        );
        assert_eq!(
            find(&scene, "couch-armrest-right").transform.position,
            Vec3::new(0.95, 0.5, -0.95)
        );

        let shade = find(&scene, "lamp-shade");
        assert_eq!(shade.transform.position, Vec3::new(1.8, 1.5, -1.0));
        assert_eq!(shade.material.base_color, rgb(0x32CD32));
        let expected = Quat::from_rotation_y(FRAC_PI_2);
        assert!(shade.transform.rotation.angle_between(expected) < 1e-5);

        let nightstand = find(&scene, "nightstand");
        assert_eq!(nightstand.transform.position, Vec3::new(1.8, 0.32, -1.0));
        assert!(nightstand.cast_shadow);
    }

    #[test]
    fn test_room_lights() {
        let scene = living_room();

        assert!(scene.directional.cast_shadow);
        assert_eq!(scene.directional.color, Vec3::ONE);
        assert_eq!(scene.directional.intensity, 1.0);
        let expected = (Vec3::ZERO - Vec3::new(0.0, 10.0, 8.0)).normalize();
        assert!((scene.directional.direction - expected).length() < 1e-5);

        assert_eq!(scene.point_lights.len(), 3);

        let lava = &scene.point_lights[0];
        assert_eq!(lava.position, Vec3::new(0.0, 1.1, 0.0));
        assert_eq!(lava.color, rgb(0xFF4500));
        assert_eq!(lava.intensity, 1.2);
        assert_eq!(lava.range, 10.0);

        let warm = &scene.point_lights[1];
        assert_eq!(warm.position, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(warm.color, rgb(0xFFFF99));
        assert_eq!(warm.intensity, 0.8);
        assert_eq!(warm.range, 15.0);

        let lamp = &scene.point_lights[2];
        assert_eq!(lamp.position, Vec3::new(1.8, 1.8, -1.0));
        assert_eq!(lamp.color, rgb(0x32CD32));
        assert_eq!(lamp.range, 10.0);

        assert_eq!(scene.spot_lights.len(), 1);
        let spot = &scene.spot_lights[0];
        assert_eq!(spot.position, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(spot.target, Vec3::ZERO);
        assert_eq!(spot.color, rgb(0x0000FF));
        assert_eq!(spot.range, 100.0);
        assert_eq!(spot.outer_angle, FRAC_PI_4);
        assert_eq!(spot.inner_angle, FRAC_PI_8);
    }

    #[test]
    fn test_room_background_and_textures() {
        let scene = living_room();
        assert_eq!(scene.background, rgb(0xF5F5DC));
        assert_eq!(
            scene.texture_keys(),
            vec!["lava", "cheese", "bricks", "pizza"]
        );
    }

    #[test]
    fn test_camera_start_matches_room() {
        assert_eq!(CAMERA_START, Vec3::new(0.0, 3.0, 4.5));
        assert_eq!(CAMERA_TARGET, Vec3::ZERO);
    }
}
