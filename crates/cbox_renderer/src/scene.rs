//! Scene graph: primitives by value, an indexed material table and one area light.

use crate::error::{RenderError, RenderResult};
use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;
use crate::primitive::Primitive;
use cbox_math::{DVec3, Interval, Ray};

/// Rectangular emitter sampled uniformly for next-event estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaLight {
    /// Corner of the rectangle
    pub corner: DVec3,
    /// First edge vector
    pub u: DVec3,
    /// Second edge vector
    pub v: DVec3,
    /// Unit normal on the emitting side
    pub normal: DVec3,
    /// Precomputed area, |u x v|
    pub area: f64,
    /// Material used to look up the emission, and to recognise the light
    /// on shadow-ray hits
    pub material_id: usize,
}

impl AreaLight {
    pub fn new(corner: DVec3, u: DVec3, v: DVec3, normal: DVec3, material_id: usize) -> Self {
        Self {
            corner,
            u,
            v,
            normal,
            area: u.cross(v).length(),
            material_id,
        }
    }

    /// Point on the light for two uniform draws in [0, 1).
    #[inline]
    pub fn sample_point(&self, r1: f64, r2: f64) -> DVec3 {
        self.corner + r1 * self.u + r2 * self.v
    }
}

/// A fixed set of primitives, materials and a single area light.
#[derive(Debug, Clone)]
pub struct Scene {
    primitives: Vec<Primitive>,
    materials: Vec<Material>,
    light: AreaLight,
}

impl Scene {
    /// Build a scene, checking every material reference.
    ///
    /// Fails if a primitive or the light references a missing material, or
    /// if the light's material does not emit.
    pub fn new(
        primitives: Vec<Primitive>,
        materials: Vec<Material>,
        light: AreaLight,
    ) -> RenderResult<Self> {
        let count = materials.len();
        let check = |id: usize| {
            if id < count {
                Ok(())
            } else {
                Err(RenderError::MaterialOutOfRange { id, count })
            }
        };

        for primitive in &primitives {
            check(primitive.material_id())?;
        }
        check(light.material_id)?;

        if !materials[light.material_id].is_emissive() {
            return Err(RenderError::LightNotEmissive(light.material_id));
        }

        log::debug!(
            "Scene: {} primitives, {} materials, light area {}",
            primitives.len(),
            count,
            light.area
        );

        Ok(Self {
            primitives,
            materials,
            light,
        })
    }

    /// Look up a material by id.
    #[inline]
    pub fn material(&self, id: usize) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn light(&self) -> &AreaLight {
        &self.light
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }
}

impl Hittable for Scene {
    /// Closest hit over all primitives; on ties the first primitive wins.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;
        let mut closest_so_far = ray_t.max;

        for primitive in &self.primitives {
            if let Some(rec) = primitive.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Color;
    use crate::rect::AxisRect;
    use crate::sphere::Sphere;

    fn light() -> AreaLight {
        AreaLight::new(
            DVec3::new(0.0, 10.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, 3.0),
            -DVec3::Y,
            1,
        )
    }

    fn materials() -> Vec<Material> {
        vec![
            Material::diffuse(Color::splat(0.5)),
            Material::emitter(Color::splat(10.0)),
        ]
    }

    #[test]
    fn test_area_light_area_and_samples() {
        let light = light();
        assert_eq!(light.area, 6.0);
        assert_eq!(light.sample_point(0.0, 0.0), DVec3::new(0.0, 10.0, 0.0));
        assert_eq!(light.sample_point(0.5, 0.5), DVec3::new(1.0, 10.0, 1.5));
    }

    #[test]
    fn test_scene_returns_closest_hit() {
        let primitives = vec![
            Sphere::new(DVec3::new(0.0, 0.0, 10.0), 1.0, 0).into(),
            Sphere::new(DVec3::new(0.0, 0.0, 5.0), 1.0, 0).into(),
            AxisRect::xy(-5.0, 5.0, -5.0, 5.0, 20.0, 0).into(),
        ];
        let scene = Scene::new(primitives, materials(), light()).unwrap();

        let ray = Ray::new(DVec3::ZERO, DVec3::Z);
        let rec = scene.hit(&ray, Interval::new(0.001, 1e9)).unwrap();
        assert!((rec.t - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_scene_miss() {
        let primitives = vec![Sphere::new(DVec3::new(0.0, 0.0, 10.0), 1.0, 0).into()];
        let scene = Scene::new(primitives, materials(), light()).unwrap();

        let ray = Ray::new(DVec3::ZERO, -DVec3::Z);
        assert!(scene.hit(&ray, Interval::new(0.001, 1e9)).is_none());
    }

    #[test]
    fn test_scene_rejects_out_of_range_material() {
        let primitives = vec![Sphere::new(DVec3::ZERO, 1.0, 7).into()];
        let err = Scene::new(primitives, materials(), light()).unwrap_err();
        assert!(matches!(err, RenderError::MaterialOutOfRange { id: 7, count: 2 }));
    }

    #[test]
    fn test_scene_rejects_dark_light() {
        let mut light = light();
        light.material_id = 0;
        let err = Scene::new(Vec::new(), materials(), light).unwrap_err();
        assert!(matches!(err, RenderError::LightNotEmissive(0)));
    }

    #[test]
    fn test_material_lookup() {
        let scene = Scene::new(Vec::new(), materials(), light()).unwrap();
        assert!(scene.material(1).unwrap().is_emissive());
        assert!(scene.material(2).is_none());
    }
}
