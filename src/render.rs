use std::time::Instant;

use glam::{UVec2, Vec2, Vec3};
use rayon::prelude::*;

use crate::{
    error::{RenderError, RenderResult},
    image::{quantize, Image},
    kernel::{radiance, shade_pixel, Scene},
    state::State,
    tonemap::tone_map,
    types::{FrameParameters, View},
};

/// Produces one full frame of the kernel per call.
pub trait FrameRenderer {
    fn name(&self) -> &'static str;

    fn render(&mut self, params: &FrameParameters) -> RenderResult<Image<4, u8>>;
}

fn check_resolution(resolution: UVec2) -> RenderResult<()> {
    if resolution.x == 0 || resolution.y == 0 {
        return Err(RenderError::InvalidParameters(format!(
            "resolution must be non-zero, got {}x{}",
            resolution.x, resolution.y
        )));
    }
    Ok(())
}

/// Reference backend: one rayon task per image row.
pub struct CpuRenderer {
    samples: u32,
    seed: u64,
}

impl CpuRenderer {
    pub fn new(samples: u32, seed: u64) -> Self {
        Self {
            samples: samples.max(1),
            seed,
        }
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }
}

impl Default for CpuRenderer {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

#[inline]
fn pixel_seed(seed: u64, index: u64) -> u64 {
    seed ^ index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Display colour of pixel `(x, y)`. A single sample hits the pixel centre;
/// more samples are jittered deterministically and averaged before tone
/// mapping.
pub fn sample_pixel(x: u32, y: u32, scene: &Scene, samples: u32, seed: u64) -> [u8; 4] {
    let resolution = scene.params.resolution.as_vec2();
    let corner = Vec2::new(x as f32, y as f32);

    if samples <= 1 {
        return quantize(shade_pixel((corner + 0.5) / resolution, scene));
    }

    let index = y as u64 * scene.params.resolution.x as u64 + x as u64;
    let mut rng = fastrand::Rng::with_seed(pixel_seed(seed, index));

    let mut sum = Vec3::ZERO;
    for _ in 0..samples {
        let jitter = Vec2::new(rng.f32(), rng.f32());
        sum += radiance((corner + jitter) / resolution, scene);
    }

    quantize(tone_map(sum / samples as f32).extend(1.0))
}

impl FrameRenderer for CpuRenderer {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn render(&mut self, params: &FrameParameters) -> RenderResult<Image<4, u8>> {
        check_resolution(params.resolution)?;

        let start = Instant::now();
        let scene = Scene::new(params);
        log::debug!(
            "spin {:.3}: horizon {:.4}, isco {:.4}, disk {:.3}..{:.1}",
            scene.hole.spin,
            scene.hole.horizon,
            scene.hole.isco,
            scene.hole.accretion_min,
            scene.hole.accretion_max
        );

        let (samples, seed) = (self.samples, self.seed);
        let width = params.resolution.x as usize;
        let mut image = Image::new_fill(params.resolution, [0, 0, 0, 255]);

        image
            .pixels_mut()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.iter_mut().enumerate() {
                    *pixel = sample_pixel(x as u32, y as u32, &scene, samples, seed);
                }
            });

        log::info!(
            "cpu frame {}x{} at t = {:.3} in {:.1?}",
            params.resolution.x,
            params.resolution.y,
            params.time,
            start.elapsed()
        );

        Ok(image)
    }
}

/// Hardware backend: the WGSL kernel drawn over a full-screen triangle into
/// an offscreen target, then read back.
pub struct GpuRenderer {
    state: State,
}

impl GpuRenderer {
    pub fn new(resolution: UVec2) -> RenderResult<Self> {
        check_resolution(resolution)?;

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let state = pollster::block_on(State::new(&instance, resolution.x, resolution.y))?;

        Ok(Self { state })
    }
}

impl FrameRenderer for GpuRenderer {
    fn name(&self) -> &'static str {
        "gpu"
    }

    fn render(&mut self, params: &FrameParameters) -> RenderResult<Image<4, u8>> {
        check_resolution(params.resolution)?;

        let start = Instant::now();
        if params.resolution != self.state.resolution() {
            self.state.resize_target(params.resolution.x, params.resolution.y);
        }

        self.state.view = View::from(params);
        self.state
            .queue
            .write_buffer(&self.state.view_buffer, 0, bytemuck::cast_slice(&[self.state.view]));

        let target_view = self.state.target.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .state
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.state.render_pipeline);
            pass.set_bind_group(0, &self.state.view_bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        let (width, height) = (params.resolution.x, params.resolution.y);
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &self.state.target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &self.state.output_staging_buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(self.state.padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        self.state.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = self.state.output_staging_buffer.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |r| {
            let _ = sender.send(r);
        });
        let _ = self.state.device.poll(wgpu::Maintain::Wait);
        receiver.recv().map_err(|_| RenderError::ReadbackChannel)??;

        let mut image = Image::new_fill(params.resolution, [0, 0, 0, 255]);
        {
            let view = buffer_slice.get_mapped_range();
            let row_bytes = width as usize * 4;

            for (y, row) in view.chunks(self.state.padded_bytes_per_row as usize).enumerate() {
                for (x, texel) in row[..row_bytes].chunks_exact(4).enumerate() {
                    image.set(x as u32, y as u32, [texel[0], texel[1], texel[2], texel[3]]);
                }
            }
        }

        self.state.output_staging_buffer.unmap();

        log::info!("gpu frame {}x{} at t = {:.3} in {:.1?}", width, height, params.time, start.elapsed());

        Ok(image)
    }
}
