//! Spin-derived radii of the black hole, in units where G = M = c = 1.

/// Schwarzschild radius `2GM/c²`.
pub const SCHWARZSCHILD_RADIUS: f32 = 2.0;
pub const MAX_SPIN: f32 = 0.99;
pub const ACCRETION_MAX: f32 = 12.0;

#[inline]
pub fn clamp_spin(spin: f32) -> f32 {
    spin.clamp(0.0, MAX_SPIN)
}

/// Outer event horizon `1 + sqrt(1 - a²)`.
#[inline]
pub fn horizon_radius(spin: f32) -> f32 {
    1.0 + (1.0 - spin * spin).sqrt()
}

/// Approximate innermost stable circular orbit, 6 at zero spin.
#[inline]
pub fn isco_radius(spin: f32) -> f32 {
    3.0 + (3.0 * (3.0 - 2.0 * spin)).sqrt()
}

#[inline]
pub fn accretion_min(spin: f32) -> f32 {
    0.9 * isco_radius(spin)
}

/// Radii derived once per frame from the (clamped) spin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlackHole {
    pub spin: f32,
    pub horizon: f32,
    pub isco: f32,
    pub accretion_min: f32,
    pub accretion_max: f32,
}

impl BlackHole {
    pub fn new(spin: f32) -> Self {
        let spin = clamp_spin(spin);

        Self {
            spin,
            horizon: horizon_radius(spin),
            isco: isco_radius(spin),
            accretion_min: accretion_min(spin),
            accretion_max: ACCRETION_MAX,
        }
    }
}
