//! Photon transport through the approximate Kerr field.
//!
//! Rays are advanced with semi-implicit Euler under a Schwarzschild
//! deflection term plus a gravitomagnetic force from the hole's spin. The
//! speed of light is enforced by renormalizing the velocity after every kick
//! rather than by solving the null condition.

use glam::Vec3;

use crate::{disk, kernel::Scene, metric::BlackHole, metric::SCHWARZSCHILD_RADIUS};

pub const MAX_STEPS: u32 = 120;
pub const ESCAPE_RADIUS: f32 = 30.0;
pub const OPAQUE_TRANSMITTANCE: f32 = 0.01;
/// Below this spin the gravitomagnetic term is skipped.
pub const MIN_SPIN: f32 = 0.01;

pub const MIN_STEP: f32 = 0.02;
pub const MAX_STEP: f32 = 0.5;

/// How a ray's integration ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Crossed the event horizon.
    Absorbed,
    /// Left the escape sphere.
    Escaped,
    /// Accumulated enough disk material to hide everything behind it.
    Opaque,
    /// Ran out of steps while still marching.
    StepLimit,
}

impl Termination {
    /// Whether the sky behind the ray is still visible.
    pub fn sees_background(self) -> bool {
        matches!(self, Termination::Escaped | Termination::StepLimit)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayState {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Length of the step that brought the ray to `position`.
    pub step_distance: f32,
}

impl RayState {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            position: origin,
            velocity: direction.normalize(),
            step_distance: 0.0,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.position.length()
    }
}

/// Front-to-back radiance and transmittance along one ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Accumulator {
    pub color: Vec3,
    pub transmittance: f32,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self {
            color: Vec3::ZERO,
            transmittance: 1.0,
        }
    }
}

impl Accumulator {
    /// Blends a segment of emitting, absorbing gas behind everything seen so
    /// far (Beer–Lambert extinction).
    pub fn composite(&mut self, emission: Vec3, density: f32, segment: f32) {
        let alpha = 1.0 - (-density.max(0.0) * segment * 2.0).exp();
        self.color += emission * alpha * self.transmittance;
        self.transmittance *= 1.0 - alpha;
    }

    pub fn is_opaque(&self) -> bool {
        self.transmittance < OPAQUE_TRANSMITTANCE
    }
}

/// Step length shrinking towards the horizon.
#[inline]
pub fn step_size(r: f32, horizon: f32) -> f32 {
    (0.05 * (r - horizon)).clamp(MIN_STEP, MAX_STEP)
}

pub fn acceleration(position: Vec3, velocity: Vec3, spin: f32) -> Vec3 {
    let r2 = position.length_squared();
    let r = r2.sqrt();
    let r5 = r2 * r2 * r;

    let radial = position.dot(velocity);
    let mut accel = -1.5 * SCHWARZSCHILD_RADIUS * radial * radial / r5 * position;

    if spin > MIN_SPIN {
        let j = Vec3::new(0.0, spin, 0.0);
        let curl = (3.0 * position.dot(j) * position - r2 * j) / r5;
        accel += 2.0 * velocity.cross(curl);
    }

    accel
}

/// Moves the ray one adaptive step from radius `r`.
pub fn advance(ray: &mut RayState, r: f32, hole: &BlackHole, lensing: bool) {
    let h = step_size(r, hole.horizon);
    ray.step_distance = h;

    if lensing {
        let accel = acceleration(ray.position, ray.velocity, hole.spin);
        ray.velocity = (ray.velocity + accel * h).normalize();
    }

    ray.position += ray.velocity * h;
}

pub fn trace(ray: &mut RayState, scene: &Scene, acc: &mut Accumulator) -> Termination {
    trace_with(ray, scene, acc, |_, _| {})
}

/// Marches `ray` to termination, calling `inspect` after every step taken.
pub fn trace_with<F>(ray: &mut RayState, scene: &Scene, acc: &mut Accumulator, mut inspect: F) -> Termination
where
    F: FnMut(&RayState, &Accumulator),
{
    let hole = &scene.hole;
    let params = &scene.params;

    for _ in 0..MAX_STEPS {
        let r = ray.radius();

        if r < hole.horizon {
            acc.transmittance = 0.0;
            return Termination::Absorbed;
        }

        if params.render_disk && acc.transmittance > OPAQUE_TRANSMITTANCE && disk::in_disk(ray.position, r, hole) {
            disk::shade(ray, r, scene, acc);
        }

        if acc.is_opaque() {
            return Termination::Opaque;
        }

        advance(ray, r, hole, params.lensing);
        inspect(ray, acc);

        if r > ESCAPE_RADIUS {
            return Termination::Escaped;
        }
    }

    Termination::StepLimit
}
