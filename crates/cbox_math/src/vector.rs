//! Vector helpers not covered by glam.

use glam::DVec3;

/// Reflect a vector about a normal: `v - 2 * dot(v, n) * n`.
#[inline]
pub fn reflect(v: DVec3, n: DVec3) -> DVec3 {
    v - 2.0 * v.dot(n) * n
}

/// Scale a vector to unit length.
///
/// A zero-length input produces non-finite components; callers guard.
#[inline]
pub fn unit_vector(v: DVec3) -> DVec3 {
    v / v.length()
}

/// Orthonormal basis aligned to a surface normal.
///
/// `w` is the normal; `u` and `v` span the tangent plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Onb {
    pub u: DVec3,
    pub v: DVec3,
    pub w: DVec3,
}

impl Onb {
    /// Build a basis around a unit normal.
    ///
    /// The helper axis is +Y when the normal leans towards X, otherwise +X,
    /// so it is never close to parallel with the normal.
    pub fn from_normal(n: DVec3) -> Self {
        let helper = if n.x.abs() > 0.9 { DVec3::Y } else { DVec3::X };
        let u = unit_vector(helper.cross(n));
        let v = u.cross(n);
        Self { u, v, w: n }
    }

    /// Transform a local-frame vector into world space.
    #[inline]
    pub fn local(&self, a: DVec3) -> DVec3 {
        a.x * self.u + a.y * self.v + a.z * self.w
    }
}
