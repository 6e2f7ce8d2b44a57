use glam::Vec3;

const A: f32 = 0.15;
const B: f32 = 0.50;
const C: f32 = 0.10;
const D: f32 = 0.20;
const E: f32 = 0.02;
const F: f32 = 0.30;
const WHITE_POINT: f32 = 11.2;
const EXPOSURE: f32 = 1.5;
const GAMMA: f32 = 2.2;

/// Filmic shoulder/toe curve.
#[inline]
pub fn filmic(x: f32) -> f32 {
    ((x * (A * x + C * B) + D * E) / (x * (A * x + B) + D * F)) - E / F
}

/// Linear radiance to display-referred `[0, 1]` RGB.
pub fn tone_map(color: Vec3) -> Vec3 {
    let exposed = color * EXPOSURE;
    let white = filmic(WHITE_POINT);
    let curve = Vec3::new(filmic(exposed.x), filmic(exposed.y), filmic(exposed.z)) / white;

    curve.clamp(Vec3::ZERO, Vec3::ONE).powf(1.0 / GAMMA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_stays_black() {
        assert!(filmic(0.0).abs() < 1e-7);
        assert!(tone_map(Vec3::ZERO).max_element() < 1e-3);
    }

    #[test]
    fn white_point_maps_to_one() {
        let c = tone_map(Vec3::splat(WHITE_POINT / EXPOSURE));
        assert!((c - Vec3::ONE).length() < 1e-5);
        assert_eq!(tone_map(Vec3::splat(1e4)), Vec3::ONE);
    }

    #[test]
    fn monotonic() {
        let mut last = 0.0;
        for i in 1..200 {
            let v = tone_map(Vec3::splat(i as f32 * 0.05)).x;
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn channels_are_independent() {
        let c = tone_map(Vec3::new(0.0, 1.0, 0.0));
        assert!(c.x < 1e-3);
        assert!(c.z < 1e-3);
        assert!(c.y > 0.0 && c.y < 1.0);
    }
}
