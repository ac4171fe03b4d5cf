//! Textured spheres: checker, gradient noise and an optional image map.
//!
//! Pass an image path as the first argument to wrap it around the center
//! sphere; without one the image texture falls back to its cyan
//! missing-data diagnostic.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;

use helio_core::{ImageData, TextureCache};
use helio_math::{Interval, Vec3};
use helio_render::{
    render, Camera, Checker, Color, FrameBuffer, HittableList, ImageTexture, Lambertian,
    NoiseTexture, RenderSettings, Sphere,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let image = match std::env::args().nth(1) {
        Some(path) => {
            let mut cache = TextureCache::new();
            cache
                .load(&path)
                .with_context(|| format!("failed to load {}", path))?
        }
        None => {
            log::warn!("no image argument; center sphere renders diagnostic cyan");
            Arc::new(ImageData::missing())
        }
    };

    let mut rng = StdRng::seed_from_u64(2);
    let mut world = HittableList::new();

    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Lambertian::new(Arc::new(NoiseTexture::new(4.0, &mut rng))),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 2.0, 0.0),
        2.0,
        Lambertian::new(Arc::new(ImageTexture::new(image))),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(-4.5, 1.0, 1.5),
        1.0,
        Lambertian::new(Arc::new(Checker::from_colors(
            0.5,
            Color::new(0.1, 0.1, 0.4),
            Color::new(0.9, 0.8, 0.7),
        ))),
    )));

    let mut camera = Camera::new()
        .with_image(400, 16.0 / 9.0)
        .with_position(
            Vec3::new(13.0, 2.0, 3.0),
            Vec3::new(0.0, 1.5, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
        .with_lens(25.0, 0.0, 12.0);
    camera.initialize();

    let settings = RenderSettings {
        samples_per_pixel: 40,
        max_depth: 10,
        ..RenderSettings::default()
    };

    let frame = render(&camera, &world, &settings)?;
    save_ppm(&frame, "textures.ppm").context("failed to save image")?;
    log::info!("saved textures.ppm");

    Ok(())
}

fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

fn save_ppm(frame: &FrameBuffer, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", frame.width, frame.height)?;
    writeln!(writer, "255")?;

    let intensity = Interval::new(0.0, 0.999);
    for color in frame.pixels() {
        let r = (256.0 * intensity.clamp(linear_to_gamma(color.x))) as u8;
        let g = (256.0 * intensity.clamp(linear_to_gamma(color.y))) as u8;
        let b = (256.0 * intensity.clamp(linear_to_gamma(color.z))) as u8;
        writeln!(writer, "{} {} {}", r, g, b)?;
    }

    Ok(())
}
