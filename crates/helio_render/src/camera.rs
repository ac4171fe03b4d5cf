//! Camera: viewport setup and ray generation.

use helio_math::{Point3, Ray, Vec3};
use rand::RngCore;

use crate::gen_f32;

/// How rays leave the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    /// All rays originate at the camera center (or its defocus disk).
    #[default]
    Perspective,
    /// Rays travel parallel to the view direction, starting on a plane
    /// through the camera the same size as the focal plane.
    Orthographic,
}

/// Camera configuration plus the per-render derived values.
///
/// Configure with the `with_*` builders, then call [`Camera::initialize`]
/// once before generating rays; the derived values are immutable for the
/// duration of a render.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub aspect_ratio: f32,

    // Camera positioning
    look_from: Point3,
    look_at: Point3,
    vup: Vec3,

    // Lens settings
    vfov: f32,          // Vertical field of view in degrees
    defocus_angle: f32, // Variation angle of rays through each pixel, degrees
    focus_dist: f32,    // Distance from camera to plane of perfect focus

    projection: Projection,

    // Cached computed values (set by initialize())
    image_height: u32,
    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            image_width: 400,
            aspect_ratio: 16.0 / 9.0,
            look_from: Point3::ZERO,
            look_at: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            projection: Projection::Perspective,
            // Derived values are filled in by initialize()
            image_height: 0,
            center: Point3::ZERO,
            pixel00_loc: Point3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        }
    }

    /// Set image width and aspect ratio; the height follows.
    pub fn with_image(mut self, image_width: u32, aspect_ratio: f32) -> Self {
        self.image_width = image_width;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set camera position and orientation.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set field of view, defocus angle and focus distance (both angles in
    /// degrees).
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Derive the viewport values. Must be called before generating rays.
    pub fn initialize(&mut self) {
        self.image_height = ((self.image_width as f32 / self.aspect_ratio) as u32).max(1);
        let real_aspect_ratio = self.image_width as f32 / self.image_height as f32;

        self.center = self.look_from;

        // Viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width = viewport_height * real_aspect_ratio;

        // Camera basis vectors
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        // Vectors across the horizontal and down the vertical viewport edges
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        // Pixel-to-pixel deltas
        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        // Location of the upper left pixel center
        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Defocus disk basis vectors
        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;
    }

    /// Image height derived from width and aspect ratio; zero until
    /// [`Camera::initialize`] has run.
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// A ray through pixel (i, j), jittered within the pixel, originating on
    /// the defocus disk when one is configured, at a random shutter time.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);
        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let mut ray_origin = match self.projection {
            Projection::Perspective => self.center,
            Projection::Orthographic => pixel_sample + self.focus_dist * self.w,
        };
        if self.defocus_angle > 0.0 {
            ray_origin += self.defocus_disk_sample(rng);
        }

        let ray_direction = pixel_sample - ray_origin;
        let ray_time = gen_f32(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Random offset within the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Random point in the unit square [-0.5, 0.5] x [-0.5, 0.5].
fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f32(rng) - 0.5, gen_f32(rng) - 0.5, 0.0)
}

/// Random point in the unit disk.
fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_f32(rng) * 2.0 - 1.0, gen_f32(rng) * 2.0 - 1.0, 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_camera_initialize_basis() {
        let mut camera = Camera::new()
            .with_image(800, 4.0 / 3.0)
            .with_position(Point3::ZERO, Point3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);
        camera.initialize();

        assert_eq!(camera.image_height(), 600);
        assert_eq!(camera.center, Point3::ZERO);
        assert!((camera.w - Vec3::Z).length() < 1e-4);
        assert!((camera.u - Vec3::X).length() < 1e-4);
        assert!((camera.v - Vec3::Y).length() < 1e-4);
    }

    #[test]
    fn test_height_never_zero() {
        let mut camera = Camera::new().with_image(10, 100.0);
        camera.initialize();
        assert_eq!(camera.image_height(), 1);
    }

    #[test]
    fn test_rays_start_at_center_without_defocus() {
        let mut camera = Camera::new()
            .with_image(100, 1.0)
            .with_position(Point3::new(1.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
            .with_lens(60.0, 0.0, 5.0);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..16 {
            let ray = camera.get_ray(10, 90, &mut rng);
            assert_eq!(ray.origin, Point3::new(1.0, 2.0, 3.0));
            assert!(ray.time >= 0.0 && ray.time < 1.0);
        }
    }

    #[test]
    fn test_defocus_spreads_ray_origins() {
        let mut camera = Camera::new()
            .with_image(100, 1.0)
            .with_position(Point3::ZERO, Point3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(60.0, 10.0, 5.0);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(42);
        let origins: Vec<Point3> = (0..16).map(|_| camera.get_ray(50, 50, &mut rng).origin).collect();

        // Not all origins coincide once the lens has area
        assert!(origins.iter().any(|o| (*o - origins[0]).length() > 1e-6));
        // But all stay on the lens plane (z = 0 for this setup)
        for o in &origins {
            assert!(o.z.abs() < 1e-5);
        }
    }

    #[test]
    fn test_orthographic_rays_are_parallel() {
        let mut camera = Camera::new()
            .with_image(100, 1.0)
            .with_position(Point3::ZERO, Point3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(60.0, 0.0, 5.0)
            .with_projection(Projection::Orthographic);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(42);
        let a = camera.get_ray(5, 5, &mut rng);
        let b = camera.get_ray(95, 80, &mut rng);

        // Both directions line up with -w regardless of the pixel
        assert!((a.direction.normalize() - -Vec3::Z).length() < 1e-4);
        assert!((b.direction.normalize() - -Vec3::Z).length() < 1e-4);
        // And the origins differ: the rays form a parallel bundle
        assert!((a.origin - b.origin).length() > 1e-3);
    }

    #[test]
    fn test_perspective_center_ray_points_at_target() {
        let mut camera = Camera::new()
            .with_image(101, 1.0)
            .with_position(Point3::ZERO, Point3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(42);
        let ray = camera.get_ray(50, 50, &mut rng);
        assert!(ray.direction.z < 0.0);
    }
}
