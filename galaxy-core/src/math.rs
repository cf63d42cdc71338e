use glam::{Quat, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

/// Samples a uniformly distributed direction on the unit sphere.
///
/// Uses the cylinder projection: a uniform `z` and a uniform azimuth
/// give a uniform point on the sphere.
pub fn random_unit_sphere(rng: &mut impl Rng) -> Vec3 {
    let z: f32 = rng.random_range(-1.0..=1.0);
    let theta: f32 = rng.random_range(0.0..TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * theta.cos(), r * theta.sin(), z)
}

/// Rotates `v` by `turns` full revolutions around the +Z orbit axis.
pub fn rotate_z(v: Vec3, turns: f32) -> Vec3 {
    Quat::from_rotation_z(turns * TAU) * v
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn random_unit_sphere_returns_unit_vectors() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let v = random_unit_sphere(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-5, "not unit length: {v:?}");
        }
    }

    #[test]
    fn rotate_z_quarter_turn_maps_x_to_y() {
        let v = rotate_z(Vec3::X, 0.25);
        assert!(v.distance(Vec3::Y) < 1e-6);
    }

    #[test]
    fn rotate_z_preserves_length_and_z() {
        let v = Vec3::new(3.0, -2.0, 5.0);
        let r = rotate_z(v, 0.37);
        assert!((r.length() - v.length()).abs() < 1e-4);
        assert!((r.z - v.z).abs() < 1e-6);
    }
}
