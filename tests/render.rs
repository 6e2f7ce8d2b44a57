use black_hole::{config::Cli, CpuRenderer, FrameParameters, FrameRenderer, Image};
use clap::Parser;
use glam::{UVec2, Vec3};

fn small(params: FrameParameters) -> FrameParameters {
    FrameParameters {
        resolution: UVec2::new(32, 18),
        ..params
    }
}

fn render(params: &FrameParameters) -> Image<4, u8> {
    CpuRenderer::default().render(params).unwrap()
}

fn brightness(image: &Image<4, u8>) -> u64 {
    image
        .pixels()
        .iter()
        .map(|p| p[0] as u64 + p[1] as u64 + p[2] as u64)
        .sum()
}

#[test]
fn frame_is_opaque_and_sized() {
    let image = render(&small(FrameParameters::default()));
    assert_eq!(image.resolution(), UVec2::new(32, 18));
    assert!(image.pixels().iter().all(|p| p[3] == 255));
    assert!(brightness(&image) > 0);
}

#[test]
fn frames_are_deterministic() {
    let params = small(FrameParameters {
        time: 3.25,
        ..Default::default()
    });
    assert_eq!(render(&params), render(&params));
}

#[test]
fn empty_scene_is_black() {
    let params = small(FrameParameters {
        render_disk: false,
        render_background: false,
        ..Default::default()
    });
    assert!(render(&params).pixels().iter().all(|p| *p == [0, 0, 0, 255]));
}

#[test]
fn shadow_is_black() {
    let params = small(FrameParameters {
        spin: 0.0,
        camera_pos: Vec3::new(0.0, 0.0, -12.0),
        camera_dir: Vec3::Z,
        render_disk: false,
        ..Default::default()
    });
    let image = render(&params);
    assert_eq!(image.get(16, 9), [0, 0, 0, 255]);
}

#[test]
fn layers_add_light() {
    let bare = render(&small(FrameParameters {
        render_disk: false,
        render_background: false,
        ..Default::default()
    }));
    let sky = render(&small(FrameParameters {
        render_disk: false,
        ..Default::default()
    }));
    let disk = render(&small(FrameParameters {
        render_background: false,
        ..Default::default()
    }));

    assert!(brightness(&sky) > brightness(&bare));
    assert!(brightness(&disk) > brightness(&bare));
}

#[test]
fn lensing_and_time_change_the_frame() {
    let base = small(FrameParameters::default());
    let mut straight = base;
    straight.set_lensing(0.0);
    let later = FrameParameters { time: 40.0, ..base };

    let image = render(&base);
    assert_ne!(image, render(&straight));
    assert_ne!(image, render(&later));
}

#[test]
fn cli_parameters_render() {
    let cli = Cli::try_parse_from([
        "black-hole",
        "--width",
        "16",
        "--height",
        "9",
        "--spin",
        "0.5",
        "--yaw",
        "30",
        "--samples",
        "2",
    ])
    .unwrap();
    cli.validate().unwrap();

    let settings = cli.settings();
    let mut renderer = CpuRenderer::new(settings.samples, settings.seed);
    let image = renderer.render(&cli.frame_parameters()).unwrap();
    assert_eq!(image.resolution(), UVec2::new(16, 9));
}

#[test]
fn saves_png() {
    let dir = std::env::temp_dir().join(format!("black-hole-test-{}", std::process::id()));
    let path = dir.join("nested").join("frame.png");

    let image = render(&FrameParameters {
        resolution: UVec2::new(8, 4),
        ..Default::default()
    });
    image.save(&path).unwrap();

    let decoded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (8, 4));
    assert_eq!(decoded.get_pixel(3, 2).0, image.get(3, 2));

    let _ = std::fs::remove_dir_all(&dir);
}
