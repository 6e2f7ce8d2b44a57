use bytemuck::{Pod, Zeroable};
use glam::{UVec2, Vec3};

pub const FLAG_BACKGROUND: u32 = 1;
pub const FLAG_DISK: u32 = 0b10;
pub const FLAG_LENSING: u32 = 0b100;

/// Read-only inputs shared by every pixel of one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameParameters {
    pub time: f32,
    /// Kerr spin, clamped to `[0, 0.99]` by the kernel.
    pub spin: f32,
    pub disk_intensity: f32,
    pub lensing: bool,
    pub resolution: UVec2,
    pub camera_pos: Vec3,
    pub camera_dir: Vec3,
    /// Carried for the harness; the camera basis uses a fixed world up.
    pub camera_up: Vec3,
    pub focal_length: f32,
    pub render_disk: bool,
    pub render_background: bool,
}

impl Default for FrameParameters {
    fn default() -> Self {
        Self {
            time: 0.0,
            spin: 0.9,
            disk_intensity: 1.0,
            lensing: true,
            resolution: UVec2::new(1280, 720),
            camera_pos: Vec3::new(0.0, 3.0, -22.0),
            camera_dir: Vec3::new(0.0, -3.0, 22.0).normalize(),
            camera_up: Vec3::Y,
            focal_length: 1.5,
            render_disk: true,
            render_background: true,
        }
    }
}

impl FrameParameters {
    /// Lensing as the host toggles it: a float that is on above one half.
    pub fn set_lensing(&mut self, value: f32) {
        self.lensing = value > 0.5;
    }

    pub fn flags(&self) -> u32 {
        let mut flags = 0;
        if self.render_background {
            flags |= FLAG_BACKGROUND;
        }
        if self.render_disk {
            flags |= FLAG_DISK;
        }
        if self.lensing {
            flags |= FLAG_LENSING;
        }
        flags
    }

    pub fn aspect(&self) -> f32 {
        self.resolution.x as f32 / self.resolution.y as f32
    }
}

/// Uniform block consumed by `kernel.wgsl`.
#[repr(C)]
#[derive(Pod, Zeroable, Copy, Clone, Debug)]
pub struct View {
    pub position: [f32; 4],
    pub direction: [f32; 4],
    pub up: [f32; 4],
    pub resolution: [u32; 2],
    pub time: f32,
    pub spin: f32,
    pub disk_intensity: f32,
    pub focal_length: f32,
    pub flags: u32,
    pub _pad: u32,
}

impl From<&FrameParameters> for View {
    fn from(params: &FrameParameters) -> Self {
        Self {
            position: params.camera_pos.extend(0.0).to_array(),
            direction: params.camera_dir.extend(0.0).to_array(),
            up: params.camera_up.extend(0.0).to_array(),
            resolution: params.resolution.to_array(),
            time: params.time,
            spin: params.spin,
            disk_intensity: params.disk_intensity,
            focal_length: params.focal_length,
            flags: params.flags(),
            _pad: 0,
        }
    }
}
