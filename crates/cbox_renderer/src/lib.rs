//! Cornell box path tracer core.
//!
//! A Monte Carlo path tracer with next-event estimation and Russian
//! roulette, accumulating radiance into a progressive buffer one
//! iteration at a time.

mod accumulator;
mod bucket;
mod camera;
mod cornell;
mod error;
mod hittable;
mod integrator;
mod material;
mod output;
mod primitive;
mod rect;
mod renderer;
mod scene;
mod sphere;

pub use accumulator::{residual, AccumulationBuffer, ConvergenceMonitor};
pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::Camera;
pub use cornell::{cornell_box, BOX_SIZE, GREEN, LIGHT, RED, WHITE};
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable};
pub use integrator::{radiance, sample_direct_light, RouletteConfig, SHADOW_EPSILON, T_MAX, T_MIN};
pub use material::{cosine_pdf, random_cosine_direction, Color, Material, ScatterResult};
pub use output::{linear_to_gamma, save_image, to_rgb8, write_ppm};
pub use primitive::Primitive;
pub use rect::{Axis, AxisRect};
pub use renderer::{render_pixel, Backend, RenderConfig, RenderSession};
pub use scene::{AreaLight, Scene};
pub use sphere::Sphere;

/// Re-export math types from cbox_math
pub use cbox_math::{DVec3, Interval, Ray};

use rand::{Rng, RngCore};

/// Uniform draw in [0, 1) from any random stream.
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Uniform draw in [min, max).
#[inline]
pub fn gen_range_f64(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    min + (max - min) * gen_f64(rng)
}
