//! Pinhole camera for ray generation.

use crate::gen_f64;
use cbox_math::{unit_vector, DVec3, Ray};
use rand::RngCore;

/// Camera mapping normalized screen coordinates to rays from the eye.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    origin: DVec3,
    lower_left_corner: DVec3,
    horizontal: DVec3,
    vertical: DVec3,
    u: DVec3,
    v: DVec3,
    w: DVec3,
}

impl Camera {
    /// Build a camera.
    ///
    /// - `look_from`: eye position
    /// - `look_at`: point the camera faces
    /// - `vup`: approximate up direction
    /// - `vfov`: vertical field of view in degrees
    /// - `aspect_ratio`: viewport width over height
    pub fn new(look_from: DVec3, look_at: DVec3, vup: DVec3, vfov: f64, aspect_ratio: f64) -> Self {
        // Calculate viewport dimensions
        let theta = vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = aspect_ratio * viewport_height;

        // Calculate camera basis vectors
        let w = unit_vector(look_from - look_at);
        let u = unit_vector(vup.cross(w));
        let v = w.cross(u);

        let horizontal = viewport_width * u;
        let vertical = viewport_height * v;
        let lower_left_corner = look_from - horizontal / 2.0 - vertical / 2.0 - w;

        Self {
            origin: look_from,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            w,
        }
    }

    /// The standard view into the Cornell box: eye at (278, 278, -800)
    /// looking at the middle of the open front with a 40 degree field of view.
    pub fn cornell(aspect_ratio: f64) -> Self {
        Self::new(
            DVec3::new(278.0, 278.0, -800.0),
            DVec3::new(278.0, 278.0, 0.0),
            DVec3::Y,
            40.0,
            aspect_ratio,
        )
    }

    /// Ray through normalized screen coordinates `(s, t)` in [0, 1] x [0, 1],
    /// with `t = 0` at the bottom of the viewport.
    pub fn get_ray(&self, s: f64, t: f64) -> Ray {
        Ray::new(
            self.origin,
            self.lower_left_corner + s * self.horizontal + t * self.vertical - self.origin,
        )
    }

    /// Jittered ray for pixel (i, j) of a `width` x `height` image.
    ///
    /// Row 0 is the top of the image.
    pub fn get_pixel_ray(&self, i: u32, j: u32, width: u32, height: u32, rng: &mut dyn RngCore) -> Ray {
        let s = (i as f64 + gen_f64(rng)) / (width - 1) as f64;
        let t = (j as f64 + gen_f64(rng)) / (height - 1) as f64;
        self.get_ray(s, 1.0 - t)
    }

    /// Camera basis (u, v, w), with w pointing from the target back to the eye.
    pub fn basis(&self) -> (DVec3, DVec3, DVec3) {
        (self.u, self.v, self.w)
    }
}
