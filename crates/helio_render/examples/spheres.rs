//! Classic random-sphere scene.
//!
//! Builds the scene, renders it, and writes a PPM file. Scene construction
//! and image encoding sit outside the render core; this example plays both
//! collaborator roles.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use helio_math::{Interval, Vec3};
use helio_render::{
    render, Camera, Checker, Color, Dielectric, FrameBuffer, HittableList, Lambertian, Metal,
    RenderSettings, Sphere,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let start = Instant::now();
    let world = build_scene();
    log::info!("scene built in {:?}", start.elapsed());

    let mut camera = Camera::new()
        .with_image(400, 16.0 / 9.0)
        .with_position(
            Vec3::new(13.0, 2.0, 3.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
        .with_lens(20.0, 0.6, 10.0);
    camera.initialize();

    let settings = RenderSettings {
        samples_per_pixel: 50,
        max_depth: 20,
        ..RenderSettings::default()
    };

    let start = Instant::now();
    let frame = render(&camera, &world, &settings)?;
    log::info!("rendered in {:?}", start.elapsed());

    save_ppm(&frame, "spheres.ppm").context("failed to save image")?;
    log::info!("saved spheres.ppm");

    Ok(())
}

fn build_scene() -> HittableList {
    let mut rng = StdRng::seed_from_u64(1);
    let mut world = HittableList::new();

    // Checkered ground
    let checker = Arc::new(Checker::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Lambertian::new(checker),
    )));

    // Small random spheres, some drifting upward during the shutter
    for a in -11..11 {
        for b in -11..11 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            if choose_mat < 0.8 {
                let albedo = Color::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                );
                let center1 = center + Vec3::new(0.0, rng.gen_range(0.0..0.5), 0.0);
                world.add(Arc::new(Sphere::new_moving(
                    center,
                    center1,
                    0.2,
                    Lambertian::from_color(albedo),
                )));
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    0.5 + 0.5 * rng.gen::<f32>(),
                    0.5 + 0.5 * rng.gen::<f32>(),
                    0.5 + 0.5 * rng.gen::<f32>(),
                );
                let fuzz = 0.5 * rng.gen::<f32>();
                world.add(Arc::new(Sphere::new(center, 0.2, Metal::new(albedo, fuzz))));
            } else {
                world.add(Arc::new(Sphere::new(center, 0.2, Dielectric::new(1.5))));
            }
        }
    }

    // Three heroes
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Dielectric::new(1.5),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Lambertian::from_color(Color::new(0.4, 0.2, 0.1)),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Metal::new(Color::new(0.7, 0.6, 0.5), 0.0),
    )));

    log::info!("created {} objects", world.len());
    world
}

/// Gamma-2 correction for one channel.
fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Quantize a linear color to 8-bit RGB.
fn color_to_rgb(color: Color) -> [u8; 3] {
    let intensity = Interval::new(0.0, 0.999);
    let r = (256.0 * intensity.clamp(linear_to_gamma(color.x))) as u8;
    let g = (256.0 * intensity.clamp(linear_to_gamma(color.y))) as u8;
    let b = (256.0 * intensity.clamp(linear_to_gamma(color.z))) as u8;
    [r, g, b]
}

fn save_ppm(frame: &FrameBuffer, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", frame.width, frame.height)?;
    writeln!(writer, "255")?;

    for color in frame.pixels() {
        let [r, g, b] = color_to_rgb(*color);
        writeln!(writer, "{} {} {}", r, g, b)?;
    }

    Ok(())
}
