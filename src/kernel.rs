//! The per-pixel kernel: a pure function of pixel position and frame.

use glam::{Vec2, Vec3, Vec4};

use crate::{
    camera::Camera,
    geodesic::{self, Accumulator, RayState, Termination},
    metric::BlackHole,
    sky,
    tonemap::tone_map,
    types::FrameParameters,
};

/// Everything a pixel needs, derived once per frame and shared read-only.
#[derive(Clone, Copy, Debug)]
pub struct Scene {
    pub params: FrameParameters,
    pub hole: BlackHole,
    pub camera: Camera,
}

impl Scene {
    pub fn new(params: &FrameParameters) -> Self {
        Self {
            params: *params,
            hole: BlackHole::new(params.spin),
            camera: Camera::from_params(params),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Trace {
    pub ray: RayState,
    pub accumulator: Accumulator,
    pub termination: Termination,
}

pub fn trace_pixel(uv: Vec2, scene: &Scene) -> Trace {
    let mut ray = RayState::new(scene.camera.position, scene.camera.ray(uv));
    let mut accumulator = Accumulator::default();
    let termination = geodesic::trace(&mut ray, scene, &mut accumulator);

    Trace {
        ray,
        accumulator,
        termination,
    }
}

/// Linear radiance reaching the camera through `uv`.
pub fn radiance(uv: Vec2, scene: &Scene) -> Vec3 {
    let Trace {
        ray,
        accumulator,
        termination,
    } = trace_pixel(uv, scene);

    let mut color = accumulator.color;
    if scene.params.render_background && termination.sees_background() && accumulator.transmittance > 0.0 {
        color += sky::background(ray.velocity, scene.params.time) * accumulator.transmittance;
    }

    color
}

/// Display colour for `uv`, alpha fixed at one.
pub fn shade_pixel(uv: Vec2, scene: &Scene) -> Vec4 {
    tone_map(radiance(uv, scene)).extend(1.0)
}
