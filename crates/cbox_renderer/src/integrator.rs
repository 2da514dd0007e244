//! Recursive radiance estimator with next-event estimation and Russian roulette.
//!
//! Each call at a diffuse surface adds the direct light from one sample on
//! the area light, then either terminates or continues with one
//! cosine-sampled bounce whose contribution is divided by the survival
//! probability.

use crate::hittable::{HitRecord, Hittable};
use crate::material::{Color, Material};
use crate::scene::Scene;
use crate::gen_f64;
use cbox_math::{unit_vector, Interval, Ray};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Closest accepted distance for camera and bounce rays.
pub const T_MIN: f64 = 1e-3;
/// Farthest accepted distance for camera and bounce rays.
pub const T_MAX: f64 = 1e9;
/// Offset of shadow-ray origins along the normal, and the margin trimmed
/// from both ends of the shadow segment.
pub const SHADOW_EPSILON: f64 = 1e-3;

/// Russian roulette termination policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouletteConfig {
    /// When false every path runs to the depth limit
    pub enabled: bool,
    /// Probability that a path continues past a bounce
    pub survival_probability: f64,
    /// Remaining depths below this always survive
    pub forced_survival_below: u32,
}

impl Default for RouletteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            survival_probability: 0.9,
            forced_survival_below: 3,
        }
    }
}

impl RouletteConfig {
    /// Roulette switched off: the full-recursion estimator.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Survival probability at the given remaining depth.
    #[inline]
    pub fn survival_probability(&self, depth: u32) -> f64 {
        if !self.enabled || depth < self.forced_survival_below {
            1.0
        } else {
            self.survival_probability
        }
    }
}

/// Estimate the radiance arriving along `ray`.
///
/// `depth` is the number of bounces still allowed; zero returns black.
/// Emitters return their emission and end the path. Rays that miss the
/// scene see a black background.
///
/// Survivors add `albedo * indirect / p`: the cosine pdf cancels `cos / pi`.
pub fn radiance(
    ray: &Ray,
    scene: &Scene,
    depth: u32,
    roulette: &RouletteConfig,
    rng: &mut dyn RngCore,
) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = scene.hit(ray, Interval::new(T_MIN, T_MAX)) else {
        return Color::ZERO;
    };

    // Scene construction validates ids, so a miss here only drops the path
    let Some(material) = scene.material(rec.material_id) else {
        return Color::ZERO;
    };

    if material.is_emissive() {
        return material.emission;
    }

    // A mirror has no diffuse lobe to evaluate against the light sample
    let direct = if material.specular {
        Color::ZERO
    } else {
        sample_direct_light(&rec, material, scene, rng)
    };

    let survival = roulette.survival_probability(depth);
    if survival < 1.0 && gen_f64(rng) > survival {
        return direct;
    }

    let scatter = material.respond(ray, &rec, rng);
    let indirect = radiance(&scatter.scattered, scene, depth - 1, roulette, rng);

    direct + scatter.attenuation * indirect / survival
}

/// One-sample estimate of the light arriving directly from the area light.
///
/// Returns zero when either cosine is non-positive, when the shadow segment
/// hits nothing, or when its first hit is not the light's material.
pub fn sample_direct_light(
    rec: &HitRecord,
    material: &Material,
    scene: &Scene,
    rng: &mut dyn RngCore,
) -> Color {
    let light = scene.light();
    let r1 = gen_f64(rng);
    let r2 = gen_f64(rng);
    let light_point = light.sample_point(r1, r2);

    let to_light = light_point - rec.p;
    let distance_squared = to_light.length_squared();
    let distance = distance_squared.sqrt();
    if distance <= 0.0 {
        return Color::ZERO;
    }
    let wi = unit_vector(to_light);

    let cos_surface = rec.normal.dot(wi);
    let cos_light = (-light.normal).dot(wi);
    if cos_surface <= 0.0 || cos_light <= 0.0 {
        return Color::ZERO;
    }

    // Unit direction, so the interval is in world units. The offset origin
    // moves the light's crossing by -eps * (n . n_l) / (wi . n_l), which can
    // land it past distance - eps
    let origin = rec.p + SHADOW_EPSILON * rec.normal;
    let shadow_ray = Ray::new(origin, wi);
    let Some(shadow_hit) = scene.hit(&shadow_ray, Interval::new(SHADOW_EPSILON, distance - SHADOW_EPSILON))
    else {
        return Color::ZERO;
    };
    if shadow_hit.material_id != light.material_id {
        return Color::ZERO;
    }

    let pdf = distance_squared / (light.area * cos_light);
    if pdf <= 0.0 {
        return Color::ZERO;
    }

    let emission = match scene.material(light.material_id) {
        Some(light_material) => light_material.emission,
        None => return Color::ZERO,
    };

    material.brdf() * emission * cos_surface / pdf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::Primitive;
    use crate::rect::AxisRect;
    use crate::scene::AreaLight;
    use crate::sphere::Sphere;
    use cbox_math::DVec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::PI;

    const FLOOR: usize = 0;
    const LAMP: usize = 1;

    /// A floor at y = 0 under a 2 x 2 light at y = 10, optionally with
    /// extra primitives.
    fn lamp_scene(extra: Vec<Primitive>, light_normal: DVec3) -> Scene {
        let mut primitives: Vec<Primitive> = vec![
            AxisRect::xz(-50.0, 50.0, -50.0, 50.0, 0.0, FLOOR).into(),
            AxisRect::xz(-1.0, 1.0, -1.0, 1.0, 10.0, LAMP).into(),
        ];
        primitives.extend(extra);

        let materials = vec![
            Material::diffuse(Color::splat(0.5)),
            Material::emitter(Color::splat(4.0)),
        ];
        let light = AreaLight::new(
            DVec3::new(-1.0, 10.0, -1.0),
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, 2.0),
            light_normal,
            LAMP,
        );
        Scene::new(primitives, materials, light).unwrap()
    }

    fn floor_hit(normal: DVec3) -> HitRecord {
        HitRecord {
            p: DVec3::ZERO,
            normal,
            t: 1.0,
            material_id: FLOOR,
            front_face: true,
        }
    }

    #[test]
    fn test_direct_light_unoccluded_matches_small_light_estimate() {
        let scene = lamp_scene(Vec::new(), -DVec3::Y);
        let material = *scene.material(FLOOR).unwrap();
        let rec = floor_hit(DVec3::Y);
        let mut rng = StdRng::seed_from_u64(3);

        let n = 20_000;
        let mut sum = Color::ZERO;
        for _ in 0..n {
            let c = sample_direct_light(&rec, &material, &scene, &mut rng);
            assert!(c.is_finite());
            assert!(c.min_element() >= 0.0);
            assert!(c.x > 0.0);
            sum += c;
        }
        let mean = sum / n as f64;

        // brdf * Le * integral of cos * cos / d^2 over the light, by midpoint rule
        let steps = 200;
        let cell = 2.0 / steps as f64;
        let mut geometry = 0.0;
        for i in 0..steps {
            for j in 0..steps {
                let x = -1.0 + (i as f64 + 0.5) * cell;
                let z = -1.0 + (j as f64 + 0.5) * cell;
                let d2: f64 = x * x + z * z + 100.0;
                geometry += 100.0 / (d2 * d2) * cell * cell;
            }
        }
        let expected = 0.5 / PI * 4.0 * geometry;
        assert!((mean.x - expected).abs() < 0.01 * expected, "mean {mean}, expected {expected}");
    }

    #[test]
    fn test_direct_light_zero_when_surface_faces_away() {
        let scene = lamp_scene(Vec::new(), -DVec3::Y);
        let material = *scene.material(FLOOR).unwrap();
        let rec = floor_hit(-DVec3::Y);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..100 {
            assert_eq!(sample_direct_light(&rec, &material, &scene, &mut rng), Color::ZERO);
        }
    }

    #[test]
    fn test_direct_light_zero_when_light_faces_away() {
        let scene = lamp_scene(Vec::new(), DVec3::Y);
        let material = *scene.material(FLOOR).unwrap();
        let rec = floor_hit(DVec3::Y);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..100 {
            assert_eq!(sample_direct_light(&rec, &material, &scene, &mut rng), Color::ZERO);
        }
    }

    #[test]
    fn test_direct_light_zero_when_occluded() {
        let blocker: Primitive = Sphere::new(DVec3::new(0.0, 5.0, 0.0), 3.0, FLOOR).into();
        let scene = lamp_scene(vec![blocker], -DVec3::Y);
        let material = *scene.material(FLOOR).unwrap();
        let rec = floor_hit(DVec3::Y);
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..100 {
            assert_eq!(sample_direct_light(&rec, &material, &scene, &mut rng), Color::ZERO);
        }
    }

    #[test]
    fn test_direct_light_zero_when_occluder_is_just_above_surface() {
        let sheet: Primitive = AxisRect::xz(-10.0, 10.0, -10.0, 10.0, 0.005, FLOOR).into();
        let scene = lamp_scene(vec![sheet], -DVec3::Y);
        let material = *scene.material(FLOOR).unwrap();
        let rec = floor_hit(DVec3::Y);
        let mut rng = StdRng::seed_from_u64(13);

        for _ in 0..1000 {
            assert_eq!(sample_direct_light(&rec, &material, &scene, &mut rng), Color::ZERO);
        }
    }

    #[test]
    fn test_direct_light_zero_for_normal_perpendicular_to_light_normal() {
        // Offsetting along +X leaves the light plane crossing at t = distance,
        // past the end of the shadow interval
        let scene = lamp_scene(Vec::new(), -DVec3::Y);
        let material = *scene.material(FLOOR).unwrap();
        let rec = HitRecord {
            p: DVec3::new(-5.0, 5.0, 0.0),
            ..floor_hit(DVec3::X)
        };
        let mut rng = StdRng::seed_from_u64(17);

        for _ in 0..100 {
            assert_eq!(sample_direct_light(&rec, &material, &scene, &mut rng), Color::ZERO);
        }
    }

    #[test]
    fn test_radiance_depth_zero_is_black() {
        let scene = lamp_scene(Vec::new(), -DVec3::Y);
        let ray = Ray::new(DVec3::new(0.0, 5.0, 0.0), DVec3::Y);
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(radiance(&ray, &scene, 0, &RouletteConfig::default(), &mut rng), Color::ZERO);
    }

    #[test]
    fn test_radiance_miss_is_black() {
        let scene = lamp_scene(Vec::new(), -DVec3::Y);
        let ray = Ray::new(DVec3::new(0.0, 5.0, 0.0), DVec3::new(1.0, 0.0, 0.0));
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(radiance(&ray, &scene, 5, &RouletteConfig::default(), &mut rng), Color::ZERO);
    }

    #[test]
    fn test_radiance_emitter_returns_emission() {
        let scene = lamp_scene(Vec::new(), -DVec3::Y);
        let ray = Ray::new(DVec3::new(0.0, 5.0, 0.0), DVec3::Y);
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(radiance(&ray, &scene, 1, &RouletteConfig::default(), &mut rng), Color::splat(4.0));
    }

    #[test]
    fn test_radiance_single_bounce_is_direct_light() {
        // Depth 1 at the floor: direct light plus a bounce that returns black
        let scene = lamp_scene(Vec::new(), -DVec3::Y);
        let ray = Ray::new(DVec3::new(0.0, 5.0, 0.0), -DVec3::Y);
        let mut rng = StdRng::seed_from_u64(21);

        let c = radiance(&ray, &scene, 1, &RouletteConfig::default(), &mut rng);
        assert!(c.is_finite());
        assert!(c.x > 0.0);
    }

    /// Replays a fixed list of uniform draws, cycling at the end.
    struct ScriptedRng {
        values: Vec<f64>,
        next: usize,
    }

    impl ScriptedRng {
        fn new(values: &[f64]) -> Self {
            Self {
                values: values.to_vec(),
                next: 0,
            }
        }
    }

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            (self.next_u64() >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            let u = self.values[self.next % self.values.len()];
            self.next += 1;
            // rand maps the top 53 bits of a u64 to [0, 1)
            ((u * (1u64 << 53) as f64) as u64) << 11
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(8) {
                let bytes = self.next_u64().to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn test_scripted_rng_replays_uniforms() {
        let mut rng = ScriptedRng::new(&[0.25, 0.75]);
        assert_eq!(gen_f64(&mut rng), 0.25);
        assert_eq!(gen_f64(&mut rng), 0.75);
        assert_eq!(gen_f64(&mut rng), 0.25);
    }

    #[test]
    fn test_roulette_kill_returns_direct_only() {
        let scene = lamp_scene(Vec::new(), -DVec3::Y);
        let material = *scene.material(FLOOR).unwrap();
        let ray = Ray::new(DVec3::new(0.0, 5.0, 0.0), -DVec3::Y);
        let roulette = RouletteConfig {
            enabled: true,
            survival_probability: 0.5,
            forced_survival_below: 0,
        };

        // Two draws for the light sample, then a roulette draw above 0.5
        let mut rng = ScriptedRng::new(&[0.5, 0.5, 0.99]);
        let c = radiance(&ray, &scene, 10, &roulette, &mut rng);

        let rec = floor_hit(DVec3::Y);
        let mut rng = ScriptedRng::new(&[0.5, 0.5]);
        let direct = sample_direct_light(&rec, &material, &scene, &mut rng);

        assert!(direct.x > 0.0);
        assert!((c - direct).length() < 1e-12);
    }

    #[test]
    fn test_roulette_survivor_is_reweighted() {
        // A survivor that bounces into the light gains emission / p
        let scene = lamp_scene(Vec::new(), -DVec3::Y);
        let ray = Ray::new(DVec3::new(0.0, 5.0, 0.0), -DVec3::Y);
        let roulette = RouletteConfig {
            enabled: true,
            survival_probability: 0.5,
            forced_survival_below: 0,
        };

        // Light sample, survive, then a cosine sample straight up (r2 = 0)
        let mut rng = ScriptedRng::new(&[0.5, 0.5, 0.1, 0.0, 0.0]);
        let c = radiance(&ray, &scene, 10, &roulette, &mut rng);

        let rec = floor_hit(DVec3::Y);
        let material = *scene.material(FLOOR).unwrap();
        let mut rng = ScriptedRng::new(&[0.5, 0.5]);
        let direct = sample_direct_light(&rec, &material, &scene, &mut rng);

        let expected = direct + material.albedo * Color::splat(4.0) / 0.5;
        assert!((c - expected).length() < 1e-9, "got {c}, expected {expected}");
    }

    #[test]
    fn test_roulette_survival_probability() {
        let roulette = RouletteConfig::default();
        assert_eq!(roulette.survival_probability(20), 0.9);
        assert_eq!(roulette.survival_probability(3), 0.9);
        assert_eq!(roulette.survival_probability(2), 1.0);
        assert_eq!(roulette.survival_probability(1), 1.0);

        let disabled = RouletteConfig::disabled();
        assert_eq!(disabled.survival_probability(20), 1.0);

        let custom = RouletteConfig {
            forced_survival_below: 0,
            survival_probability: 0.5,
            enabled: true,
        };
        assert_eq!(custom.survival_probability(1), 0.5);
    }
}
