//! Material model: reflectance, emission and the two scattering responses.

use std::f64::consts::PI;

use crate::{gen_f64, hittable::HitRecord};
use cbox_math::{reflect, unit_vector, DVec3, Onb, Ray};
use rand::RngCore;

/// Color type alias (linear RGB radiance or reflectance)
pub type Color = DVec3;

/// Surface description referenced by primitives through a material id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Per-channel reflectance, expected in [0, 1]
    pub albedo: Color,
    /// Emitted radiance, zero for non-emitters
    pub emission: Color,
    /// Perfect mirror when true, cosine-diffuse otherwise
    pub specular: bool,
}

/// Result of scattering a ray off a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    pub attenuation: Color,
    pub scattered: Ray,
}

impl Material {
    /// Lambertian material with the given albedo.
    pub fn diffuse(albedo: Color) -> Self {
        Self {
            albedo,
            emission: Color::ZERO,
            specular: false,
        }
    }

    /// Perfect mirror tinted by `albedo`.
    pub fn mirror(albedo: Color) -> Self {
        Self {
            albedo,
            emission: Color::ZERO,
            specular: true,
        }
    }

    /// Emitter with the given radiance. Emitters absorb everything.
    pub fn emitter(emission: Color) -> Self {
        Self {
            albedo: Color::ZERO,
            emission,
            specular: false,
        }
    }

    /// True if any channel of the emission is positive.
    #[inline]
    pub fn is_emissive(&self) -> bool {
        self.emission.max_element() > 0.0
    }

    /// Lambertian BRDF value, `albedo / pi`.
    #[inline]
    pub fn brdf(&self) -> Color {
        self.albedo / PI
    }

    /// Scatter an incoming ray.
    ///
    /// The diffuse branch samples a cosine-weighted direction, so the BRDF
    /// times cosine over the pdf reduces to the albedo for every sampled
    /// angle.
    pub fn respond(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> ScatterResult {
        let direction = if self.specular {
            reflect(unit_vector(ray_in.direction()), rec.normal)
        } else {
            Onb::from_normal(rec.normal).local(random_cosine_direction(rng))
        };

        ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, direction),
        }
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Cosine-weighted direction on the +z hemisphere.
///
/// The z component has density `2z` on [0, 1].
pub fn random_cosine_direction(rng: &mut dyn RngCore) -> DVec3 {
    let r1 = gen_f64(rng);
    let r2 = gen_f64(rng);

    let z = (1.0 - r2).sqrt();
    let phi = 2.0 * PI * r1;
    let sqrt_r2 = r2.sqrt();

    DVec3::new(phi.cos() * sqrt_r2, phi.sin() * sqrt_r2, z)
}

/// Solid-angle pdf of [`random_cosine_direction`] for a direction with the
/// given cosine to the normal.
#[inline]
pub fn cosine_pdf(cos_theta: f64) -> f64 {
    (cos_theta / PI).max(0.0)
}
