//! Procedural star field and galactic nebula seen by escaping rays.

use glam::{Vec2, Vec3};

use crate::noise::{fbm, noise, smoothstep};

const DEEP_PURPLE: Vec3 = Vec3::new(0.09, 0.02, 0.14);
const COSMIC_BLUE: Vec3 = Vec3::new(0.03, 0.07, 0.2);
const CORE_GLOW: Vec3 = Vec3::new(0.36, 0.26, 0.18);

/// Azimuth in `[-π, π]` and elevation in `[-1, 1]` of a direction.
pub fn sky_coords(direction: Vec3) -> Vec2 {
    let d = direction.normalize();
    Vec2::new(d.z.atan2(d.x), d.y)
}

/// Two classes of point-like stars, isolated by raising noise to a high power.
pub fn stars(coords: Vec2) -> f32 {
    let bright = noise(coords * Vec2::new(160.0, 320.0)).powf(40.0);
    let faint = noise(coords * Vec2::new(420.0, 840.0) + Vec2::splat(57.0)).powf(50.0);

    bright + faint * 0.6
}

/// Colour and density of the galactic band.
pub fn nebula(coords: Vec2, time: f32) -> (Vec3, f32) {
    let warp = fbm(Vec2::new(coords.x * 1.5 + time * 0.02, coords.y * 3.0));
    let band = coords.y + (warp - 0.5) * 0.35;
    let galactic = (-band * band * 10.0).exp();

    let detail = fbm(Vec2::new(coords.x * 4.0, coords.y * 8.0) + warp * 2.0);
    let mut density = galactic * (0.35 + 0.65 * detail);

    let mut color = DEEP_PURPLE.lerp(COSMIC_BLUE, smoothstep(0.25, 0.65, detail));
    color = color.lerp(CORE_GLOW, smoothstep(0.45, 0.9, density));

    // Dust lanes across the dense core.
    let dust = smoothstep(0.45, 0.65, fbm(Vec2::new(coords.x * 12.0, coords.y * 24.0) + Vec2::splat(5.3)));
    density *= 1.0 - dust * smoothstep(0.3, 0.7, density) * 0.8;

    (color, density)
}

/// Unattenuated sky radiance along `direction`.
pub fn background(direction: Vec3, time: f32) -> Vec3 {
    let coords = sky_coords(direction);
    let (color, density) = nebula(coords, time);

    Vec3::splat(stars(coords)) + color * density * 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates() {
        let c = sky_coords(Vec3::new(0.0, 0.0, 2.0));
        assert!((c.x - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(c.y, 0.0);
        assert!((sky_coords(Vec3::Y).y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn background_is_finite_and_non_negative() {
        for i in 0..500 {
            let t = i as f32 * 0.37;
            let dir = Vec3::new(t.cos(), (t * 0.21).sin(), t.sin());
            let c = background(dir, 3.0);
            assert!(c.is_finite());
            assert!(c.min_element() >= 0.0);
        }
    }

    #[test]
    fn band_is_brighter_near_plane() {
        let mut plane = 0.0;
        let mut pole = 0.0;
        for i in 0..64 {
            let azimuth = -3.0 + i as f32 * 0.09;
            plane += nebula(Vec2::new(azimuth, 0.0), 0.0).1;
            pole += nebula(Vec2::new(azimuth, 0.95), 0.0).1;
        }
        assert!(plane > pole * 4.0);
    }

    #[test]
    fn stars_are_sparse() {
        let mut lit = 0;
        let samples = 4000;
        for i in 0..samples {
            let coords = Vec2::new(-3.1 + (i % 80) as f32 * 0.0775, -0.9 + (i / 80) as f32 * 0.036);
            if stars(coords) > 0.1 {
                lit += 1;
            }
        }
        assert!(lit < samples / 10);
    }
}
