use std::path::Path;

use glam::{UVec2, Vec4};

use crate::error::RenderResult;

/// Row-major pixel buffer with `N` channels of `T`, row 0 at the top.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<const N: usize, T: Copy> {
    pixels: Vec<[T; N]>,
    resolution: UVec2,
}

impl<const N: usize, T: Copy> Image<N, T> {
    pub fn new_fill(resolution: UVec2, pixel: [T; N]) -> Image<N, T> {
        Image::<N, T> {
            pixels: vec![pixel; (resolution.x * resolution.y) as usize],
            resolution,
        }
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, pixel: [T; N]) {
        self.pixels[(y * self.resolution.x + x) as usize] = pixel;
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> [T; N] {
        self.pixels[(y * self.resolution.x + x) as usize]
    }

    #[inline]
    pub fn resolution(&self) -> UVec2 {
        self.resolution
    }

    pub fn pixels(&self) -> &[[T; N]] {
        &self.pixels
    }

    /// Mutable pixels, one disjoint chunk of `resolution.x` per row.
    pub fn pixels_mut(&mut self) -> &mut [[T; N]] {
        &mut self.pixels
    }
}

impl Image<4, u8> {
    pub fn to_rgba(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.resolution.x, self.resolution.y, |x, y| image::Rgba(self.get(x, y)))
    }

    /// Writes the frame, creating missing parent directories. The format
    /// follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        self.to_rgba().save(path)?;
        Ok(())
    }
}

/// Normalized colour to 8-bit channels.
#[inline]
pub fn quantize(color: Vec4) -> [u8; 4] {
    let c = (color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8, c.w as u8]
}
