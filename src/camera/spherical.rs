//! Spherical coordinates around an origin with +Y as the polar axis.

use std::f32::consts::PI;

use glam::Vec3;

/// Smallest distance `phi` may keep from either pole.
pub const POLE_EPSILON: f32 = 0.000_001;

/// A point expressed as radius, azimuth and polar angle.
///
/// `theta` is measured around +Y starting from +Z toward +X; `phi` is the
/// angle down from +Y.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spherical {
    /// Distance from the origin.
    pub radius: f32,
    /// Azimuthal angle in radians.
    pub theta: f32,
    /// Polar angle in radians, `0` at +Y and `π` at -Y.
    pub phi: f32,
}

impl Spherical {
    /// Construct from raw components.
    #[must_use]
    pub const fn new(radius: f32, theta: f32, phi: f32) -> Self {
        Self { radius, theta, phi }
    }

    /// Convert a cartesian offset. The zero vector maps to all-zero angles.
    #[must_use]
    pub fn from_vec3(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::new(0.0, 0.0, 0.0);
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    /// Convert back to a cartesian offset.
    #[must_use]
    pub fn to_vec3(self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let planar = sin_phi * self.radius;
        Vec3::new(planar * sin_theta, cos_phi * self.radius, planar * cos_theta)
    }

    /// Clamp `phi` strictly inside `(0, π)` so the azimuth stays defined.
    #[must_use]
    pub fn make_safe(self) -> Self {
        Self {
            phi: self.phi.clamp(POLE_EPSILON, PI - POLE_EPSILON),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_aligned_offsets() {
        let s = Spherical::from_vec3(Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(s.radius, 5.0);
        assert_eq!(s.theta, 0.0);
        assert!((s.phi - PI / 2.0).abs() < 1e-6);

        let s = Spherical::from_vec3(Vec3::new(2.0, 0.0, 0.0));
        assert!((s.theta - PI / 2.0).abs() < 1e-6);

        let s = Spherical::from_vec3(Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(s.phi, 0.0);
    }

    #[test]
    fn zero_vector_is_all_zero() {
        assert_eq!(Spherical::from_vec3(Vec3::ZERO), Spherical::default());
    }

    #[test]
    fn cartesian_conversion_is_consistent() {
        let v = Vec3::new(1.5, -2.0, 0.25);
        let back = Spherical::from_vec3(v).to_vec3();
        assert!(back.abs_diff_eq(v, 1e-5));
    }

    #[test]
    fn make_safe_keeps_phi_off_the_poles() {
        for phi in [-1000.0, -PI, 0.0, PI, 2.0 * PI, 1.0e9] {
            let safe = Spherical::new(1.0, 0.0, phi).make_safe();
            assert!(safe.phi > 0.0, "phi {phi} clamped to {}", safe.phi);
            assert!(safe.phi < PI, "phi {phi} clamped to {}", safe.phi);
        }
        let inside = Spherical::new(1.0, 0.3, 1.0);
        assert_eq!(inside.make_safe(), inside);
    }
}
