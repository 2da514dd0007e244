//! The fixed Cornell box scene.

use crate::material::{Color, Material};
use crate::rect::AxisRect;
use crate::scene::{AreaLight, Scene};
use crate::sphere::Sphere;
use cbox_math::DVec3;

/// Material ids in the Cornell material table.
pub const WHITE: usize = 0;
pub const RED: usize = 1;
pub const GREEN: usize = 2;
pub const LIGHT: usize = 3;

/// Edge length of the box.
pub const BOX_SIZE: f64 = 555.0;

/// Build the Cornell box.
///
/// Walls span [0, 555] on every axis with the side facing -z left open for
/// the camera. Seen from the default camera the green wall (x = 555) is on
/// the left and the red wall (x = 0) on the right. The light is a 130 x 105
/// rectangle one unit below the ceiling, emitting downwards.
pub fn cornell_box() -> Scene {
    let materials = vec![
        Material::diffuse(Color::new(0.73, 0.73, 0.73)),
        Material::diffuse(Color::new(0.65, 0.05, 0.05)),
        Material::diffuse(Color::new(0.12, 0.45, 0.15)),
        Material::emitter(Color::new(15.0, 15.0, 15.0)),
    ];

    let s = BOX_SIZE;
    let primitives = vec![
        AxisRect::yz(0.0, s, 0.0, s, s, GREEN).into(),
        AxisRect::yz(0.0, s, 0.0, s, 0.0, RED).into(),
        AxisRect::xz(213.0, 343.0, 227.0, 332.0, 554.0, LIGHT).into(),
        AxisRect::xz(0.0, s, 0.0, s, 0.0, WHITE).into(),
        AxisRect::xz(0.0, s, 0.0, s, s, WHITE).into(),
        AxisRect::xy(0.0, s, 0.0, s, s, WHITE).into(),
        Sphere::new(DVec3::new(190.0, 90.0, 190.0), 90.0, WHITE).into(),
        Sphere::new(DVec3::new(370.0, 100.0, 370.0), 100.0, WHITE).into(),
    ];

    let light = AreaLight::new(
        DVec3::new(213.0, 554.0, 227.0),
        DVec3::new(130.0, 0.0, 0.0),
        DVec3::new(0.0, 0.0, 105.0),
        -DVec3::Y,
        LIGHT,
    );

    Scene::new(primitives, materials, light).expect("Cornell fixture only references its own materials")
}
