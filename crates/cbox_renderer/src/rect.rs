//! Axis-aligned rectangle primitive.

use crate::hittable::{HitRecord, Hittable};
use cbox_math::{DVec3, Interval, Ray};

/// The world axis a rectangle's plane is perpendicular to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Index of the fixed coordinate, followed by the two in-plane coordinates.
    #[inline]
    fn indices(self) -> (usize, usize, usize) {
        match self {
            Axis::X => (0, 1, 2),
            Axis::Y => (1, 0, 2),
            Axis::Z => (2, 0, 1),
        }
    }

    /// Unit vector along this axis.
    #[inline]
    pub fn unit(self) -> DVec3 {
        match self {
            Axis::X => DVec3::X,
            Axis::Y => DVec3::Y,
            Axis::Z => DVec3::Z,
        }
    }
}

/// A rectangle lying in a plane of constant x, y or z.
///
/// `a` and `b` bound the two in-plane coordinates in axis order: (y, z) for
/// [`Axis::X`], (x, z) for [`Axis::Y`], (x, y) for [`Axis::Z`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRect {
    axis: Axis,
    a: Interval,
    b: Interval,
    k: f64,
    material_id: usize,
}

impl AxisRect {
    /// Rectangle in the plane z = k.
    pub fn xy(x0: f64, x1: f64, y0: f64, y1: f64, k: f64, material_id: usize) -> Self {
        Self::new(Axis::Z, Interval::new(x0, x1), Interval::new(y0, y1), k, material_id)
    }

    /// Rectangle in the plane y = k.
    pub fn xz(x0: f64, x1: f64, z0: f64, z1: f64, k: f64, material_id: usize) -> Self {
        Self::new(Axis::Y, Interval::new(x0, x1), Interval::new(z0, z1), k, material_id)
    }

    /// Rectangle in the plane x = k.
    pub fn yz(y0: f64, y1: f64, z0: f64, z1: f64, k: f64, material_id: usize) -> Self {
        Self::new(Axis::X, Interval::new(y0, y1), Interval::new(z0, z1), k, material_id)
    }

    fn new(axis: Axis, a: Interval, b: Interval, k: f64, material_id: usize) -> Self {
        Self {
            axis,
            a,
            b,
            k,
            material_id,
        }
    }

    pub fn material_id(&self) -> usize {
        self.material_id
    }

    /// Area of the rectangle.
    pub fn area(&self) -> f64 {
        self.a.size() * self.b.size()
    }
}

impl Hittable for AxisRect {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let (k_axis, a_axis, b_axis) = self.axis.indices();
        let origin = ray.origin();
        let direction = ray.direction();

        // A direction parallel to the plane gives an infinite or NaN t,
        // which the range test rejects.
        let t = (self.k - origin[k_axis]) / direction[k_axis];
        if !ray_t.contains(t) {
            return None;
        }

        let a = origin[a_axis] + t * direction[a_axis];
        let b = origin[b_axis] + t * direction[b_axis];
        if !self.a.contains(a) || !self.b.contains(b) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.axis.unit(), self.material_id))
    }
}
