use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use glam::{UVec2, Vec3};

use crate::{
    camera::orbit,
    error::{RenderError, RenderResult},
    geodesic::ESCAPE_RADIUS,
    types::FrameParameters,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Cpu,
    Gpu,
    /// GPU when an adapter is available, CPU otherwise.
    Auto,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Renders a spinning black hole with a volumetric accretion disk")]
pub struct Cli {
    #[arg(long, default_value_t = 1280)]
    pub width: u32,
    #[arg(long, default_value_t = 720)]
    pub height: u32,
    /// Kerr spin parameter, clamped to [0, 0.99].
    #[arg(long, default_value_t = 0.9, allow_negative_numbers = true)]
    pub spin: f32,
    #[arg(long, default_value_t = 1.0)]
    pub disk_intensity: f32,
    /// Gravitational lensing toggle: on above 0.5, straight rays otherwise.
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub lensing: f32,
    /// Time of the first frame, in seconds.
    #[arg(long, default_value_t = 0.0)]
    pub time: f32,
    /// Camera distance from the hole, below the escape radius of 30.
    #[arg(long, default_value_t = 22.0)]
    pub distance: f32,
    /// Camera azimuth around the spin axis, in degrees.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub yaw: f32,
    /// Camera elevation above the disk plane, in degrees.
    #[arg(long, default_value_t = 8.0, allow_negative_numbers = true)]
    pub pitch: f32,
    #[arg(long, default_value_t = 1.5)]
    pub focal_length: f32,
    /// Jittered samples per pixel (CPU backend only).
    #[arg(long, default_value_t = 1)]
    pub samples: u32,
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Number of frames to render; more than one numbers the output files.
    #[arg(long, default_value_t = 1)]
    pub frames: u32,
    #[arg(long, default_value_t = 30.0)]
    pub fps: f32,
    #[arg(long, value_enum, default_value_t = Backend::Cpu)]
    pub backend: Backend,
    #[arg(long, default_value_t = false)]
    pub no_background: bool,
    #[arg(long, default_value_t = false)]
    pub no_disk: bool,
    #[arg(long, default_value = "black-hole.png")]
    pub output: PathBuf,
}

/// Settings of the frame loop that are not kernel inputs.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSettings {
    pub backend: Backend,
    pub samples: u32,
    pub seed: u64,
    pub frames: u32,
    pub fps: f32,
    pub output: PathBuf,
}

impl RenderSettings {
    /// Time of frame `index`, advancing monotonically from `start`.
    pub fn frame_time(&self, start: f32, index: u32) -> f32 {
        start + index as f32 / self.fps
    }

    /// `output` as given for a single frame, `<stem>_<index>.<ext>` otherwise.
    pub fn frame_path(&self, index: u32) -> PathBuf {
        if self.frames <= 1 {
            return self.output.clone();
        }

        let stem = self.output.file_stem().and_then(|s| s.to_str()).unwrap_or("frame");
        let ext = self.output.extension().and_then(|s| s.to_str()).unwrap_or("png");
        let name = format!("{stem}_{index:04}.{ext}");

        match self.output.parent() {
            Some(parent) if parent != Path::new("") => parent.join(name),
            _ => PathBuf::from(name),
        }
    }
}

impl Cli {
    pub fn validate(&self) -> RenderResult<()> {
        let invalid = |msg: String| Err(RenderError::InvalidParameters(msg));

        if self.width == 0 || self.height == 0 {
            return invalid(format!("resolution must be non-zero, got {}x{}", self.width, self.height));
        }
        if !self.spin.is_finite() {
            return invalid(format!("spin must be finite, got {}", self.spin));
        }
        if !(self.disk_intensity >= 0.0) {
            return invalid(format!("disk intensity must be >= 0, got {}", self.disk_intensity));
        }
        // Rays starting outside the escape sphere leave on their first step.
        if !(self.distance > 0.0 && self.distance < ESCAPE_RADIUS) {
            return invalid(format!(
                "camera distance must be in (0, {ESCAPE_RADIUS}), got {}",
                self.distance
            ));
        }
        if !(self.focal_length > 0.0) {
            return invalid(format!("focal length must be > 0, got {}", self.focal_length));
        }
        if self.samples == 0 {
            return invalid("samples must be >= 1".to_string());
        }
        if self.frames == 0 {
            return invalid("frames must be >= 1".to_string());
        }
        if !(self.fps > 0.0) {
            return invalid(format!("fps must be > 0, got {}", self.fps));
        }

        Ok(())
    }

    pub fn frame_parameters(&self) -> FrameParameters {
        let (camera_pos, camera_dir) = orbit(self.distance, self.yaw.to_radians(), self.pitch.to_radians());

        let mut params = FrameParameters {
            time: self.time,
            spin: self.spin,
            disk_intensity: self.disk_intensity,
            lensing: true,
            resolution: UVec2::new(self.width, self.height),
            camera_pos,
            camera_dir,
            camera_up: Vec3::Y,
            focal_length: self.focal_length,
            render_disk: !self.no_disk,
            render_background: !self.no_background,
        };
        params.set_lensing(self.lensing);
        params
    }

    pub fn settings(&self) -> RenderSettings {
        RenderSettings {
            backend: self.backend,
            samples: self.samples,
            seed: self.seed,
            frames: self.frames,
            fps: self.fps,
            output: self.output.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("black-hole").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]);
        cli.validate().unwrap();

        let params = cli.frame_parameters();
        assert_eq!(params.resolution, UVec2::new(1280, 720));
        assert_eq!(params.spin, 0.9);
        assert!(params.lensing && params.render_disk && params.render_background);
        assert_eq!(params.focal_length, 1.5);
        assert!((params.camera_pos.length() - 22.0).abs() < 1e-4);
        assert!(params.camera_pos.y > 0.0);
        assert_eq!(cli.settings().backend, Backend::Cpu);
    }

    #[test]
    fn flags_and_backend() {
        let cli = parse(&[
            "--lensing",
            "0.5",
            "--no-disk",
            "--backend",
            "auto",
            "--spin",
            "1.4",
            "--pitch",
            "-12",
        ]);
        cli.validate().unwrap();

        let params = cli.frame_parameters();
        assert!(!params.lensing);
        assert!(!params.render_disk);
        assert!(params.render_background);
        assert_eq!(params.spin, 1.4);
        assert!(params.camera_pos.y < 0.0);
        assert_eq!(cli.settings().backend, Backend::Auto);
    }

    #[test]
    fn rejects_bad_values() {
        for args in [
            &["--width", "0"][..],
            &["--samples", "0"],
            &["--frames", "0"],
            &["--fps", "0"],
            &["--distance", "0"],
            &["--distance", "30"],
            &["--distance", "45"],
            &["--disk-intensity=-1"],
        ] {
            let cli = parse(args);
            assert!(
                matches!(cli.validate(), Err(RenderError::InvalidParameters(_))),
                "accepted {args:?}"
            );
        }
    }

    #[test]
    fn far_camera_still_reaches_the_hole() {
        use crate::{geodesic::Termination, kernel::{trace_pixel, Scene}};

        let cli = parse(&["--distance", "29", "--pitch", "0", "--width", "64", "--height", "36"]);
        cli.validate().unwrap();

        let scene = Scene::new(&cli.frame_parameters());
        let centre = trace_pixel(glam::Vec2::splat(0.5), &scene);
        assert_ne!(centre.termination, Termination::Escaped);

        let beyond = parse(&["--distance", "31", "--pitch", "0"]);
        assert!(matches!(beyond.validate(), Err(RenderError::InvalidParameters(_))));
    }

    #[test]
    fn frame_paths_and_times() {
        let mut settings = parse(&["--output", "out/disk.png", "--frames", "3", "--fps", "4"]).settings();
        assert_eq!(settings.frame_path(2), PathBuf::from("out/disk_0002.png"));
        assert_eq!(settings.frame_time(1.0, 2), 1.5);

        settings.frames = 1;
        assert_eq!(settings.frame_path(0), PathBuf::from("out/disk.png"));

        let bare = parse(&["--output", "hole.png", "--frames", "2"]).settings();
        assert_eq!(bare.frame_path(1), PathBuf::from("hole_0001.png"));
    }
}
