//! Flag scene composition
//!
//! Builds the whole scene CPU-side: geometry, materials, transforms, shadow
//! flags, lights, starfield, and the starting camera pose. GPU uploads
//! happen later through `Scene::init_gpu_resources`.

use std::f32::consts::PI;

use cgmath::{Rad, Vector3, Zero};

use crate::{
    assets::AssetLibrary,
    gfx::{
        camera::{CameraRig, OrbitCamera, OrbitController},
        geometry::{generate_cylinder, generate_plane, StarDensity, Starfield},
        resources::material::Material,
        scene::{light::AmbientLight, light::DirectionalLight, Object, Scene},
    },
};

/// Keeps the orbit above the horizon: max polar angle = pi/2 - 0.2.
const MIN_PITCH: f32 = 0.2;

/// Assembles the flag scene for the given viewport.
pub fn build_scene(assets: &AssetLibrary, density: StarDensity, width: u32, height: u32) -> Scene {
    let mut scene = Scene::new(camera_rig(width, height));

    scene.ambient = AmbientLight {
        color: [1.0, 1.0, 1.0],
        intensity: 0.1,
    };
    scene.sun = DirectionalLight {
        position: [4.0, 4.0, 4.0],
        target: [0.0, 0.0, 0.0],
        color: [1.0, 1.0, 1.0],
        intensity: 1.0,
        cast_shadow: true,
        shadow_map_size: 1024,
    };

    scene.add_material(
        Material::new("ground", [1.0, 1.0, 1.0, 1.0], 0.0, 0.9)
            .with_base_color_map(assets.ground.clone())
            .with_double_sided(true),
    );
    // One concrete material, shared by the base and the base top
    scene.add_material(
        Material::new("concrete", [1.0, 1.0, 1.0, 1.0], 0.0, 0.8)
            .with_base_color_map(assets.base_color.clone())
            .with_normal_map(assets.base_normal.clone()),
    );
    scene.add_material(
        Material::new("flag", [1.0, 1.0, 1.0, 1.0], 0.0, 0.6)
            .with_base_color_map(assets.flag.clone())
            .with_double_sided(true),
    );

    let mut ground = Object::from_geometry("ground", &generate_plane(10.0, 10.0, 1, 1))
        .with_material("ground")
        .with_receive_shadow(true)
        .with_double_sided(true);
    ground.rotate_x(Rad(PI / 2.0));
    scene.add_object(ground);

    let mut base = Object::from_geometry("base", &generate_cylinder(1.0, 0.3, 32))
        .with_material("concrete")
        .with_cast_shadow(true)
        .with_receive_shadow(true);
    base.set_translation(Vector3::new(0.0, 0.15, 0.0));
    scene.add_object(base);

    let mut base_top = Object::from_geometry("base_top", &generate_cylinder(0.7, 0.3, 32))
        .with_material("concrete")
        .with_cast_shadow(true)
        .with_receive_shadow(true);
    base_top.set_translation(Vector3::new(0.0, 0.4, 0.0));
    scene.add_object(base_top);

    // Plain default material, like the untextured pole in the scene mockup
    let mut pole =
        Object::from_geometry("pole", &generate_cylinder(0.05, 4.0, 16)).with_cast_shadow(true);
    pole.set_translation(Vector3::new(0.0, 2.0, 0.0));
    scene.add_object(pole);

    let mut flag = Object::from_geometry("flag", &generate_plane(2.0, 1.0, 1, 1))
        .with_material("flag")
        .with_cast_shadow(true)
        .with_double_sided(true);
    flag.set_translation(Vector3::new(1.0, 3.5, 0.0));
    scene.add_object(flag);

    scene.starfield = Starfield::generate(density);

    scene
}

/// Orbit rig with the starting pose of eye (0, 5, 10) looking at the origin.
fn camera_rig(width: u32, height: u32) -> CameraRig {
    let distance = 125.0_f32.sqrt();
    let pitch = (5.0 / distance).asin();
    let aspect = width as f32 / height as f32;

    let mut camera = OrbitCamera::new(distance, pitch, 0.0, Vector3::zero(), aspect);
    camera.bounds.min_pitch = MIN_PITCH;

    let controller = OrbitController::new(0.005, 0.1)
        .with_damping(0.1)
        .with_zoom_enabled(false);

    CameraRig::new(camera, controller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetKind, ImageData};

    fn placeholder_assets() -> AssetLibrary {
        AssetLibrary {
            flag: ImageData::placeholder(AssetKind::FlagFace),
            ground: ImageData::placeholder(AssetKind::Ground),
            base_color: ImageData::placeholder(AssetKind::BaseColor),
            base_normal: ImageData::placeholder(AssetKind::BaseNormal),
            star_mask: ImageData::placeholder(AssetKind::StarMask),
        }
    }

    #[test]
    fn scene_contains_the_five_nodes_and_the_starfield() {
        let scene = build_scene(&placeholder_assets(), StarDensity::Sparse, 800, 600);
        assert_eq!(scene.object_count(), 5);
        for name in ["ground", "base", "base_top", "pole", "flag"] {
            assert!(scene.object_by_name(name).is_some(), "missing {name}");
        }
        assert_eq!(scene.starfield.stars.len(), 200);
    }

    #[test]
    fn base_and_base_top_share_one_material() {
        let scene = build_scene(&placeholder_assets(), StarDensity::Sparse, 800, 600);
        let base = scene.object_by_name("base").unwrap();
        let base_top = scene.object_by_name("base_top").unwrap();
        assert_eq!(base.material_id(), base_top.material_id());
        assert_eq!(base.material_id().map(String::as_str), Some("concrete"));
    }

    #[test]
    fn shadow_flags_follow_the_layout() {
        let scene = build_scene(&placeholder_assets(), StarDensity::Sparse, 800, 600);
        let ground = scene.object_by_name("ground").unwrap();
        assert!(ground.receive_shadow && !ground.cast_shadow);
        let pole = scene.object_by_name("pole").unwrap();
        assert!(pole.cast_shadow && !pole.receive_shadow);
        let flag = scene.object_by_name("flag").unwrap();
        assert!(flag.cast_shadow && flag.double_sided);
    }

    #[test]
    fn flag_hangs_beside_the_pole_top() {
        let scene = build_scene(&placeholder_assets(), StarDensity::Sparse, 800, 600);
        let flag = scene.object_by_name("flag").unwrap();
        assert_eq!(flag.transform.w.x, 1.0);
        assert_eq!(flag.transform.w.y, 3.5);
        assert_eq!(flag.transform.w.z, 0.0);
    }

    #[test]
    fn initial_aspect_matches_the_viewport() {
        let scene = build_scene(&placeholder_assets(), StarDensity::Sparse, 800, 600);
        assert!((scene.camera_rig.camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn resize_to_the_same_ratio_keeps_the_aspect() {
        let mut scene = build_scene(&placeholder_assets(), StarDensity::Sparse, 800, 600);
        let before = scene.camera_rig.camera.aspect;
        scene.camera_rig.camera.resize_projection(400, 300);
        assert_eq!(scene.camera_rig.camera.aspect, before);
    }

    #[test]
    fn camera_cannot_sink_below_the_horizon_clamp() {
        let mut scene = build_scene(&placeholder_assets(), StarDensity::Sparse, 800, 600);
        scene.camera_rig.camera.set_pitch(-2.0);
        assert!((scene.camera_rig.camera.pitch - MIN_PITCH).abs() < 1e-6);
    }

    #[test]
    fn zoom_is_disabled_for_this_scene() {
        let scene = build_scene(&placeholder_assets(), StarDensity::Sparse, 800, 600);
        assert!(!scene.camera_rig.controller.enable_zoom);
    }
}
