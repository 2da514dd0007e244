//! Closed set of intersectable shapes stored by value in a scene.

use crate::hittable::{HitRecord, Hittable};
use crate::rect::AxisRect;
use crate::sphere::Sphere;
use cbox_math::{Interval, Ray};

/// A scene primitive, dispatched by tag rather than through a vtable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Sphere(Sphere),
    Rect(AxisRect),
}

impl Primitive {
    /// Material id referenced by this primitive.
    pub fn material_id(&self) -> usize {
        match self {
            Primitive::Sphere(sphere) => sphere.material_id(),
            Primitive::Rect(rect) => rect.material_id(),
        }
    }
}

impl Hittable for Primitive {
    #[inline]
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        match self {
            Primitive::Sphere(sphere) => sphere.hit(ray, ray_t),
            Primitive::Rect(rect) => rect.hit(ray, ray_t),
        }
    }
}

impl From<Sphere> for Primitive {
    fn from(sphere: Sphere) -> Self {
        Primitive::Sphere(sphere)
    }
}

impl From<AxisRect> for Primitive {
    fn from(rect: AxisRect) -> Self {
        Primitive::Rect(rect)
    }
}
