use glam::Vec2;

pub const OCTAVES: u32 = 5;

pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Pseudo-random value in `[0, 1)` for a lattice point.
#[inline]
pub fn hash(p: Vec2) -> f32 {
    let h = p.dot(Vec2::new(127.1, 311.7));
    (h.sin() * 43758.545).fract().abs()
}

/// Bilinear value noise with a smooth fade, in `[0, 1]`.
pub fn noise(p: Vec2) -> f32 {
    let i = p.floor();
    let f = p - i;
    let u = f * f * (Vec2::splat(3.0) - 2.0 * f);

    let a = hash(i);
    let b = hash(i + Vec2::X);
    let c = hash(i + Vec2::Y);
    let d = hash(i + Vec2::ONE);

    a + (b - a) * u.x + (c - a) * u.y + (a - b - c + d) * u.x * u.y
}

/// Fractal sum of [`OCTAVES`] noise octaves. Result lies in `[0, 1)`.
pub fn fbm(mut p: Vec2) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 0.5;

    for _ in 0..OCTAVES {
        value += amplitude * noise(p);
        p = p * 2.0 + Vec2::new(1.7, 9.2);
        amplitude *= 0.5;
    }

    value
}
