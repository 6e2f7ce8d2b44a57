use std::borrow::Cow;

use bytemuck::Zeroable;
use glam::UVec2;
use once_cell::sync::Lazy;
use wgpu::util::DeviceExt;

use crate::{
    disk::{DENSITY_THRESHOLD, MAX_BETA_SQUARED, MIN_SEGMENT},
    error::{RenderError, RenderResult},
    geodesic::{ESCAPE_RADIUS, MAX_STEP, MAX_STEPS, MIN_SPIN, MIN_STEP, OPAQUE_TRANSMITTANCE},
    metric::{ACCRETION_MAX, MAX_SPIN, SCHWARZSCHILD_RADIUS},
    noise::OCTAVES,
    types::View,
};

pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

fn wgsl_float(value: f32) -> String {
    format!("{value:?}")
}

/// `kernel.wgsl` with the integrator and disk constants filled in, so both
/// backends march with the same numbers.
static KERNEL_WGSL: Lazy<String> = Lazy::new(|| {
    include_str!("kernel.wgsl")
        .replace("{{MAX_STEPS}}", &MAX_STEPS.to_string())
        .replace("{{ESCAPE_RADIUS}}", &wgsl_float(ESCAPE_RADIUS))
        .replace("{{OPAQUE_TRANSMITTANCE}}", &wgsl_float(OPAQUE_TRANSMITTANCE))
        .replace("{{MIN_SPIN}}", &wgsl_float(MIN_SPIN))
        .replace("{{MAX_SPIN}}", &wgsl_float(MAX_SPIN))
        .replace("{{SCHWARZSCHILD_RADIUS}}", &wgsl_float(SCHWARZSCHILD_RADIUS))
        .replace("{{ACCRETION_MAX}}", &wgsl_float(ACCRETION_MAX))
        .replace("{{DENSITY_THRESHOLD}}", &wgsl_float(DENSITY_THRESHOLD))
        .replace("{{MAX_BETA_SQUARED}}", &wgsl_float(MAX_BETA_SQUARED))
        .replace("{{MIN_STEP}}", &wgsl_float(MIN_STEP))
        .replace("{{MAX_STEP}}", &wgsl_float(MAX_STEP))
        .replace("{{MIN_SEGMENT}}", &wgsl_float(MIN_SEGMENT))
        .replace("{{OCTAVES}}", &OCTAVES.to_string())
});

pub fn kernel_source() -> &'static str {
    KERNEL_WGSL.as_str()
}

fn padded_bytes_per_row(width: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    (width * 4).div_ceil(align) * align
}

pub struct State {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,

    pub render_pipeline: wgpu::RenderPipeline,
    pub view: View,
    pub view_buffer: wgpu::Buffer,
    pub view_bind_group: wgpu::BindGroup,
    pub target: wgpu::Texture,
    pub output_staging_buffer: wgpu::Buffer,
    pub padded_bytes_per_row: u32,
}

impl State {
    pub async fn new(instance: &wgpu::Instance, width: u32, height: u32) -> RenderResult<Self> {
        let power_pref = wgpu::PowerPreference::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: power_pref,
                force_fallback_adapter: false,
                compatible_surface: None,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let features = wgpu::Features::empty();
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: features,
                    required_limits: Default::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        device.on_uncaptured_error(Box::new(|error| log::error!("gpu device error: {error}")));

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let kernel_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("kernel"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(kernel_source())),
        });

        let view = View::zeroed();

        let view_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("view_buffer"),
            contents: bytemuck::cast_slice(&[view]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let view_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("view_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZero::new(std::mem::size_of::<View>() as u64),
                },
                count: None,
            }],
        });

        let view_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("view_bind_group"),
            layout: &view_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: view_buffer.as_entire_binding(),
            }],
        });

        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("render_pipeline_layout"),
            bind_group_layouts: &[&view_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &kernel_shader,
                entry_point: Some("vertex"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &kernel_shader,
                entry_point: Some("fragment"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: TARGET_FORMAT,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                conservative: false,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        if let Some(error) = device.pop_error_scope().await {
            return Err(RenderError::Shader(error.to_string()));
        }

        let (target, output_staging_buffer) = Self::create_target(&device, width, height);

        Ok(Self {
            device,
            queue,
            render_pipeline,
            view,
            view_buffer,
            view_bind_group,
            target,
            output_staging_buffer,
            padded_bytes_per_row: padded_bytes_per_row(width),
        })
    }

    fn create_target(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::Buffer) {
        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        let output_staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("output_staging_buffer"),
            size: padded_bytes_per_row(width) as u64 * height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        (target, output_staging_buffer)
    }

    pub fn resolution(&self) -> UVec2 {
        let size = self.target.size();
        UVec2::new(size.width, size.height)
    }

    pub fn resize_target(&mut self, width: u32, height: u32) {
        let (target, output_staging_buffer) = Self::create_target(&self.device, width, height);
        self.target = target;
        self.output_staging_buffer = output_staging_buffer;
        self.padded_bytes_per_row = padded_bytes_per_row(width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_source_has_no_placeholders() {
        let source = kernel_source();
        assert!(!source.contains("{{"));
        assert!(source.contains("const MAX_STEPS: u32 = 120u;"));
        assert!(source.contains("const ESCAPE_RADIUS: f32 = 30.0;"));
        assert!(source.contains(&format!("const MIN_STEP: f32 = {:?};", MIN_STEP)));
        assert!(source.contains(&format!("const MAX_STEP: f32 = {:?};", MAX_STEP)));
        assert!(source.contains(&format!("const MIN_SEGMENT: f32 = {:?};", MIN_SEGMENT)));
        assert!(source.contains(&format!("const OCTAVES: u32 = {OCTAVES}u;")));
    }

    #[test]
    fn rows_are_padded_for_copies() {
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
        assert_eq!(padded_bytes_per_row(1280), 5120);
    }
}
