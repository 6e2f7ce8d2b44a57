use anyhow::Context;
use clap::Parser;

use black_hole::{
    config::{Backend, Cli, RenderSettings},
    CpuRenderer, FrameRenderer, GpuRenderer,
};

fn cpu_renderer(settings: &RenderSettings) -> Box<dyn FrameRenderer> {
    let cpu = CpuRenderer::new(settings.samples, settings.seed);
    log::debug!("cpu backend, {} sample(s) per pixel, seed {}", cpu.samples(), settings.seed);
    Box::new(cpu)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    cli.validate()?;

    let mut params = cli.frame_parameters();
    let settings = cli.settings();

    let mut renderer: Box<dyn FrameRenderer> = match settings.backend {
        Backend::Cpu => cpu_renderer(&settings),
        Backend::Gpu => Box::new(GpuRenderer::new(params.resolution).context("failed to initialize GPU backend")?),
        Backend::Auto => match GpuRenderer::new(params.resolution) {
            Ok(gpu) => Box::new(gpu),
            Err(err) => {
                log::warn!("GPU backend unavailable ({err}), falling back to CPU");
                cpu_renderer(&settings)
            }
        },
    };

    if settings.samples > 1 && renderer.name() == "gpu" {
        log::warn!("gpu backend shades one sample per pixel, ignoring --samples {}", settings.samples);
    }

    log::info!(
        "rendering {} frame(s) at {}x{} on {}",
        settings.frames,
        params.resolution.x,
        params.resolution.y,
        renderer.name()
    );

    for index in 0..settings.frames {
        params.time = settings.frame_time(cli.time, index);

        let image = renderer
            .render(&params)
            .with_context(|| format!("failed to render frame {index}"))?;

        let path = settings.frame_path(index);
        image
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;

        log::info!("wrote {}", path.display());
    }

    Ok(())
}
