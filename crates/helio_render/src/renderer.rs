//! Shading integrator and the parallel render driver.
//!
//! Workers render disjoint tiles on a fixed-size pool and hand each finished
//! tile over a channel to a single collector that owns the frame buffer and
//! the progress counter; nothing mutable is shared.

use std::sync::mpsc;
use std::thread;

use helio_math::{Interval, Ray};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use thiserror::Error;

use crate::bvh::BvhNode;
use crate::camera::Camera;
use crate::framebuffer::FrameBuffer;
use crate::hittable::{Hittable, HittableList};
use crate::material::Color;
use crate::tile::{render_tile, tiles, TileResult};

/// What the integrator computes per ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Full path-traced shading.
    #[default]
    Full,
    /// Visualize the surface normal at the first hit.
    Normals,
}

/// Sampling and scheduling configuration.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Random samples per pixel (antialiasing)
    pub samples_per_pixel: u32,
    /// Maximum ray bounces into the scene
    pub max_depth: u32,
    /// Side length of the square work tiles, in pixels
    pub tile_size: u32,
    /// Worker thread count
    pub workers: usize,
    /// Base seed; every pixel derives its own RNG stream from it
    pub seed: u64,
    pub mode: RenderMode,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            tile_size: 32,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            seed: 0,
            mode: RenderMode::Full,
        }
    }
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Compute the color seen along a ray.
///
/// Iterative form of the bounded-bounce recursion: the attenuation product
/// is carried forward so deep bounce limits cannot grow the call stack.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    max_depth: u32,
    mode: RenderMode,
    rng: &mut dyn RngCore,
) -> Color {
    let mut current = *ray;
    let mut throughput = Color::ONE;

    for _ in 0..max_depth {
        // The 0.001 lower bound ignores the surface the ray starts on
        match world.hit(&current, Interval::new(0.001, f32::INFINITY)) {
            Some(rec) => {
                if mode == RenderMode::Normals {
                    return 0.5 * (rec.normal + Color::ONE);
                }

                match rec.material.scatter(&current, &rec, rng) {
                    Some(scatter) => {
                        throughput *= scatter.attenuation;
                        current = scatter.scattered;
                    }
                    // Absorbed
                    None => return Color::ZERO,
                }
            }
            None => return throughput * sky_gradient(&current),
        }
    }

    // Bounce limit exhausted: no more light is gathered
    Color::ZERO
}

/// Background: vertical white-to-blue gradient.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction.normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    (1.0 - a) * Color::new(1.0, 1.0, 1.0) + a * Color::new(0.5, 0.7, 1.0)
}

/// Average `samples_per_pixel` jittered samples for pixel (x, y).
///
/// The pixel owns its RNG stream, derived from the base seed and the
/// pixel's global index, so results do not depend on which worker or tile
/// computed it.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    settings: &RenderSettings,
) -> Color {
    let pixel_index = y as u64 * camera.image_width as u64 + x as u64;
    let mut rng = StdRng::seed_from_u64(settings.seed.wrapping_add(pixel_index));

    let mut color = Color::ZERO;
    for _ in 0..settings.samples_per_pixel {
        let ray = camera.get_ray(x, y, &mut rng);
        color += ray_color(&ray, world, settings.max_depth, settings.mode, &mut rng);
    }

    color / settings.samples_per_pixel as f32
}

/// Render the scene into a frame buffer.
///
/// Builds a BVH over a snapshot of the scene list, then fans the tiles out
/// over a fixed-size worker pool. A panic in any worker aborts the whole
/// render; there is no partial result.
pub fn render(
    camera: &Camera,
    scene: &HittableList,
    settings: &RenderSettings,
) -> Result<FrameBuffer, RenderError> {
    let width = camera.image_width;
    let height = camera.image_height();
    assert!(height > 0, "Camera::initialize must be called before render");
    assert!(settings.workers > 0, "worker count must be positive");

    let bvh = BvhNode::new(scene.objects().to_vec());
    let tile_list = tiles(width, height, settings.tile_size);
    report(camera, &bvh, tile_list.len(), settings);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.workers)
        .build()?;

    let (tx, rx) = mpsc::channel::<TileResult>();
    let total = tile_list.len();

    // The collector exclusively owns the buffer and the progress counter;
    // tiles arrive in any order.
    let collector = thread::spawn(move || {
        let mut frame = FrameBuffer::new(width, height);
        let mut done = 0usize;

        for result in rx {
            frame.write_tile(&result.tile, &result.pixels);
            done += 1;
            log::debug!("tile {}/{} done", done, total);
        }

        frame
    });

    pool.install(|| {
        tile_list.par_iter().for_each_with(tx, |tx, tile| {
            let pixels = render_tile(tile, camera, &bvh, settings);
            // The collector outlives every sender; a send can only fail
            // after the render has already been aborted.
            let _ = tx.send(TileResult::new(*tile, pixels));
        });
    });

    let frame = collector
        .join()
        .expect("tile collector thread panicked");
    Ok(frame)
}

fn report(camera: &Camera, bvh: &BvhNode, num_tiles: usize, settings: &RenderSettings) {
    let width = camera.image_width;
    let height = camera.image_height();
    let depth = bvh.depth();

    log::info!(
        "resolution {}x{} = {:.1} MP",
        width,
        height,
        width as f32 * height as f32 / 1e6
    );
    // Depth counts edges from the root; a tree of depth d holds at most
    // 2^d leaves.
    log::info!("bvh depth {} (<= 2^{} leaves)", depth, depth);
    log::info!(
        "{} samples/pixel @ {} bounces",
        settings.samples_per_pixel,
        settings.max_depth
    );
    log::info!(
        "{} tiles of {}x{} @ {} workers",
        num_tiles,
        settings.tile_size,
        settings.tile_size,
        settings.workers
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Lambertian, Metal};
    use crate::sphere::Sphere;
    use helio_math::Vec3;
    use std::sync::Arc;

    fn test_scene() -> HittableList {
        let mut scene = HittableList::new();
        scene.add(Arc::new(Sphere::new(
            Vec3::new(0.0, -100.5, -1.0),
            100.0,
            Lambertian::from_color(Color::new(0.8, 0.8, 0.0)),
        )));
        scene.add(Arc::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Lambertian::from_color(Color::new(0.1, 0.2, 0.5)),
        )));
        scene.add(Arc::new(Sphere::new(
            Vec3::new(1.0, 0.0, -1.0),
            0.5,
            Metal::new(Color::new(0.8, 0.6, 0.2), 0.1),
        )));
        scene
    }

    fn test_camera(width: u32) -> Camera {
        let mut camera = Camera::new()
            .with_image(width, 1.0)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);
        camera.initialize();
        camera
    }

    fn test_settings(workers: usize) -> RenderSettings {
        RenderSettings {
            samples_per_pixel: 4,
            max_depth: 8,
            tile_size: 8,
            workers,
            seed: 1234,
            mode: RenderMode::Full,
        }
    }

    #[test]
    fn test_sky_gradient_blends_up_to_blue() {
        let up = sky_gradient(&Ray::new_simple(Vec3::ZERO, Vec3::Y));
        let down = sky_gradient(&Ray::new_simple(Vec3::ZERO, -Vec3::Y));

        // Up is the sky blue, down is white
        assert!(up.x < down.x);
        assert!((down - Color::ONE).length() < 1e-5);
    }

    #[test]
    fn test_ray_color_depth_zero_is_black() {
        let scene = test_scene();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(0);

        let color = ray_color(&ray, &scene, 0, RenderMode::Full, &mut rng);
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_ray_color_miss_is_sky() {
        let scene = HittableList::new();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Y);
        let mut rng = StdRng::seed_from_u64(0);

        let color = ray_color(&ray, &scene, 8, RenderMode::Full, &mut rng);
        assert_eq!(color, sky_gradient(&ray));
    }

    #[test]
    fn test_normals_mode_encodes_normal() {
        let scene = test_scene();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(0);

        let color = ray_color(&ray, &scene, 8, RenderMode::Normals, &mut rng);
        // Head-on hit: normal is +z, encoded as (0.5, 0.5, 1.0)
        assert!((color - Color::new(0.5, 0.5, 1.0)).length() < 1e-4);
    }

    #[test]
    fn test_render_pixel_hits_scene() {
        let scene = test_scene();
        let bvh = BvhNode::new(scene.objects().to_vec());
        let camera = test_camera(10);
        let settings = test_settings(1);

        let color = render_pixel(&camera, &bvh, 5, 5, &settings);
        assert!(color.length() > 0.0);
    }

    #[test]
    fn test_render_is_worker_count_independent() {
        let scene = test_scene();
        let camera = test_camera(24);

        let one = render(&camera, &scene, &test_settings(1)).unwrap();
        let many = render(&camera, &scene, &test_settings(4)).unwrap();

        // Per-pixel RNG streams make the output identical, not merely
        // statistically equivalent.
        assert_eq!(one.pixels(), many.pixels());
    }

    #[test]
    fn test_render_covers_every_pixel() {
        // An empty scene renders pure sky: no pixel is left at the
        // buffer's initial black.
        let scene = HittableList::new();
        let camera = test_camera(17);

        let frame = render(&camera, &scene, &test_settings(2)).unwrap();
        assert_eq!(frame.pixels().len(), 17 * 17);
        assert!(frame.pixels().iter().all(|c| c.length() > 0.0));
    }
}
