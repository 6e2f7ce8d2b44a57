pub mod camera;
pub mod config;
pub mod disk;
pub mod error;
pub mod geodesic;
pub mod image;
pub mod kernel;
pub mod metric;
pub mod noise;
pub mod render;
pub mod sky;
pub mod state;
pub mod tonemap;
pub mod types;

pub use self::error::{RenderError, RenderResult};
pub use self::image::Image;
pub use self::kernel::{shade_pixel, trace_pixel, Scene, Trace};
pub use self::render::{CpuRenderer, FrameRenderer, GpuRenderer};
pub use self::types::FrameParameters;
