use glam::{Vec2, Vec3};

use crate::types::FrameParameters;

pub const WORLD_UP: Vec3 = Vec3::Y;

/// Orthonormal pinhole camera. The supplied camera-up vector is ignored in
/// favour of [`WORLD_UP`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub focal_length: f32,
}

impl Camera {
    pub fn new(position: Vec3, direction: Vec3, aspect: f32, focal_length: f32) -> Self {
        let forward = direction.normalize();

        // Looking straight along the world up axis leaves `forward × up` at
        // zero length, so borrow +Z as the reference axis there.
        let mut right = forward.cross(WORLD_UP);
        if right.length_squared() < 1e-12 {
            right = forward.cross(Vec3::Z);
        }
        let right = right.normalize();
        let up = right.cross(forward);

        Self {
            position,
            forward,
            right,
            up,
            aspect,
            focal_length,
        }
    }

    pub fn from_params(params: &FrameParameters) -> Self {
        Self::new(params.camera_pos, params.camera_dir, params.aspect(), params.focal_length)
    }

    /// World-space ray direction through `uv` in `[0, 1]²`, with `v = 0` at
    /// the top row of the image.
    pub fn ray(&self, uv: Vec2) -> Vec3 {
        let mut screen = (uv - 0.5) * 2.0;
        screen.y = -screen.y;
        screen.x *= self.aspect;

        (self.forward * self.focal_length + self.right * screen.x + self.up * screen.y).normalize()
    }
}

/// Pose on a sphere of radius `distance` around the origin, looking at it.
/// Angles are in radians; positive pitch lifts the camera above the disk.
pub fn orbit(distance: f32, yaw: f32, pitch: f32) -> (Vec3, Vec3) {
    let position = distance * Vec3::new(pitch.cos() * yaw.sin(), pitch.sin(), -pitch.cos() * yaw.cos());
    (position, -position.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn basis_is_orthonormal() {
        let camera = Camera::new(Vec3::new(0.0, 3.0, -20.0), Vec3::new(0.1, -0.2, 1.0), 16.0 / 9.0, 1.5);

        assert!((camera.forward.length() - 1.0).abs() < 1e-5);
        assert!((camera.right.length() - 1.0).abs() < 1e-5);
        assert!((camera.up.length() - 1.0).abs() < 1e-5);
        assert!(camera.forward.dot(camera.right).abs() < 1e-5);
        assert!(camera.forward.dot(camera.up).abs() < 1e-5);
        assert!(camera.up.y > 0.0);
    }

    #[test]
    fn center_ray_is_forward() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, -20.0), Vec3::new(0.0, 0.0, 2.0), 1.0, 1.5);
        assert!(approx(camera.ray(Vec2::splat(0.5)), Vec3::Z));
    }

    #[test]
    fn image_top_maps_to_world_up() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, -20.0), Vec3::Z, 1.0, 1.5);

        let top = camera.ray(Vec2::new(0.5, 0.0));
        let bottom = camera.ray(Vec2::new(0.5, 1.0));
        assert!(top.y > 0.0);
        assert!(bottom.y < 0.0);

        let expected = Vec3::new(0.0, 1.0, 1.5).normalize();
        assert!(approx(top, expected));
    }

    #[test]
    fn aspect_widens_horizontal_extent() {
        let camera = Camera::new(Vec3::ZERO, Vec3::Z, 2.0, 1.5);
        let edge = camera.ray(Vec2::new(1.0, 0.5));
        let expected = (Vec3::Z * 1.5 + camera.right * 2.0).normalize();
        assert!(approx(edge, expected));
    }

    #[test]
    fn camera_up_input_is_ignored() {
        let mut params = FrameParameters::default();
        let a = Camera::from_params(&params);
        params.camera_up = Vec3::X;
        let b = Camera::from_params(&params);
        assert_eq!(a, b);
    }

    #[test]
    fn vertical_view_has_finite_basis() {
        let camera = Camera::new(Vec3::new(0.0, 20.0, 0.0), Vec3::NEG_Y, 1.0, 1.5);
        let dir = camera.ray(Vec2::new(0.2, 0.7));
        assert!(dir.is_finite());
        assert!((dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn orbit_looks_at_origin() {
        let (position, direction) = orbit(22.0, 0.3, 0.2);
        assert!((position.length() - 22.0).abs() < 1e-4);
        assert!(approx(direction, -position / 22.0));

        let (front, _) = orbit(10.0, 0.0, 0.0);
        assert!(approx(front, Vec3::new(0.0, 0.0, -10.0)));
    }
}
