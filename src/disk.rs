//! Volumetric accretion disk: Keplerian gas lit by relativistic beaming.

use glam::{Vec2, Vec3};

use crate::{
    geodesic::{Accumulator, RayState},
    kernel::Scene,
    metric::BlackHole,
    noise::{fbm, smoothstep},
};

/// Samples thinner than this neither emit nor absorb.
pub const DENSITY_THRESHOLD: f32 = 0.05;
/// Above this `β²` the Lorentz factor is left out.
pub const MAX_BETA_SQUARED: f32 = 0.99;
/// Floor on the segment length used for compositing.
pub const MIN_SEGMENT: f32 = 0.01;

#[inline]
pub fn half_thickness(r: f32) -> f32 {
    0.05 + 0.001 * r * r
}

pub fn in_disk(position: Vec3, r: f32, hole: &BlackHole) -> bool {
    (hole.accretion_min..=hole.accretion_max).contains(&r) && position.y.abs() < half_thickness(r)
}

#[inline]
pub fn kepler_omega(r: f32, spin: f32) -> f32 {
    1.0 / (r.powf(1.5) + spin)
}

/// Lense–Thirring angular velocity of the local inertial frame.
#[inline]
pub fn frame_drag_omega(r: f32, spin: f32) -> f32 {
    2.0 * spin / (r * r * r)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GasKinematics {
    pub omega: f32,
    pub velocity: Vec3,
    /// Reported alongside the orbit but not added to it: the gas moves at
    /// the Keplerian rate whatever the frame dragging.
    pub frame_drag: f32,
}

/// Prograde circular orbit about the spin axis.
pub fn gas_kinematics(position: Vec3, r: f32, spin: f32) -> GasKinematics {
    let omega = kepler_omega(r, spin);

    GasKinematics {
        omega,
        velocity: omega * Vec3::new(-position.z, 0.0, position.x),
        frame_drag: frame_drag_omega(r, spin),
    }
}

/// Special-relativistic Doppler factor for speed `beta` at angle `cos_theta`
/// between the gas motion and the direction towards the observer.
pub fn doppler_factor(beta: f32, cos_theta: f32) -> f32 {
    let gamma = 1.0 / (1.0 - beta * beta).sqrt();
    1.0 / (gamma * (1.0 - beta * cos_theta))
}

#[inline]
pub fn gravitational_redshift(r: f32) -> f32 {
    (1.0 - 2.0 / r).max(0.01).sqrt()
}

/// Combined Doppler and gravitational frequency shift seen along
/// `ray_velocity`.
pub fn relativistic_shift(gas_velocity: Vec3, ray_velocity: Vec3, r: f32) -> f32 {
    let beta2 = gas_velocity.length_squared();

    let doppler = if beta2 >= MAX_BETA_SQUARED {
        1.0
    } else {
        let view_dir = -ray_velocity.normalize();
        let cos_theta = gas_velocity.normalize_or_zero().dot(view_dir);
        doppler_factor(beta2.sqrt(), cos_theta)
    };

    doppler * gravitational_redshift(r)
}

pub fn density(position: Vec3, r: f32, omega: f32, hole: &BlackHole, time: f32) -> f32 {
    let angle = position.z.atan2(position.x) - time * omega * 10.0;

    let polar = Vec2::new(r * 0.8, angle * 3.0);
    let coarse = fbm(polar);
    let fine = fbm(polar * Vec2::new(4.0, 6.0) + Vec2::new(31.4, 0.0));
    let turbulence = coarse * 0.7 + fine * 0.3;

    let vertical = 1.0 - smoothstep(0.0, half_thickness(r), position.y.abs());
    let radial = smoothstep(hole.accretion_min, hole.accretion_min + 1.5, r)
        * (1.0 - smoothstep(hole.accretion_max - 2.0, hole.accretion_max, r));

    turbulence * vertical * radial
}

/// Hand-tuned stand-in for a Planck spectrum over a normalized temperature:
/// dark red at 0, through orange and white, to blue-white at 1. Every channel
/// is non-decreasing in `t`.
pub fn blackbody(t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);

    Vec3::new(
        0.3 + 0.6 * smoothstep(0.0, 0.35, t),
        0.04 + 0.91 * smoothstep(0.1, 0.75, t),
        0.01 + 0.99 * smoothstep(0.4, 1.0, t),
    )
}

/// Emits and absorbs for the segment that ended at `ray.position`.
pub fn shade(ray: &RayState, r: f32, scene: &Scene, acc: &mut Accumulator) {
    let hole = &scene.hole;

    let gas = gas_kinematics(ray.position, r, hole.spin);
    let density = density(ray.position, r, gas.omega, hole, scene.params.time);
    if density <= DENSITY_THRESHOLD {
        return;
    }

    let shift = relativistic_shift(gas.velocity, ray.velocity, r);
    let temperature = (hole.accretion_min / r).powf(1.5);
    // I ∝ D⁴
    let intensity = density * temperature * shift.powi(4) * scene.params.disk_intensity;
    let emission = blackbody(temperature * shift) * intensity * 2.0;

    acc.composite(emission, density, ray.step_distance.max(MIN_SEGMENT));
}
