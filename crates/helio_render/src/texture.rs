//! Texture trait and its implementations.

use std::sync::Arc;

use helio_core::ImageData;
use helio_math::{Interval, Point3};
use rand::RngCore;

use crate::material::Color;
use crate::perlin::Perlin;

/// Spatially varying surface color.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Point3) -> Color;
}

/// Constant color everywhere.
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from_rgb(red: f32, green: f32, blue: f32) -> Self {
        Self::new(Color::new(red, green, blue))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Point3) -> Color {
        self.albedo
    }
}

/// 3D checkerboard: lattice-cell parity selects one of two sub-textures.
pub struct Checker {
    inv_scale: f32,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl Checker {
    pub fn new(scale: f32, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for Checker {
    fn value(&self, u: f32, v: f32, p: Point3) -> Color {
        let x = (self.inv_scale * p.x).floor() as i64;
        let y = (self.inv_scale * p.y).floor() as i64;
        let z = (self.inv_scale * p.z).floor() as i64;

        if (x + y + z) % 2 == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Decoded image mapped over the surface by its UV coordinates.
pub struct ImageTexture {
    image: Arc<ImageData>,
}

impl ImageTexture {
    pub fn new(image: Arc<ImageData>) -> Self {
        Self { image }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Point3) -> Color {
        // No texture data: solid cyan as a debugging aid
        if self.image.is_empty() {
            return Color::new(0.0, 1.0, 1.0);
        }

        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        let v = 1.0 - unit.clamp(v); // Flip V to image row convention

        let i = (u * self.image.width as f32) as u32;
        let j = (v * self.image.height as f32) as u32;

        self.image.pixel(i, j)
    }
}

/// Grayscale gradient-noise texture.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
}

impl NoiseTexture {
    pub fn new(scale: f32, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Point3) -> Color {
        // Gradient noise lands in [-1,1]; remap to a displayable gray
        Color::ONE * 0.5 * (1.0 + self.noise.noise(self.scale * p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helio_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_solid_color_ignores_coordinates() {
        let tex = SolidColor::from_rgb(0.2, 0.4, 0.6);
        let expected = Color::new(0.2, 0.4, 0.6);

        assert_eq!(tex.value(0.0, 0.0, Vec3::ZERO), expected);
        assert_eq!(tex.value(0.9, 0.1, Vec3::new(5.0, -3.0, 100.0)), expected);
    }

    #[test]
    fn test_checker_parity() {
        let even = Color::new(1.0, 1.0, 1.0);
        let odd = Color::new(0.0, 0.0, 0.0);
        let scale = 2.0;
        let tex = Checker::from_colors(scale, even, odd);

        // Origin sits in the even cell
        assert_eq!(tex.value(0.0, 0.0, Vec3::ZERO), even);

        // One cell over in x flips parity
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(scale, 0.0, 0.0)), odd);

        // Two cells over flips back
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(2.0 * scale, 0.0, 0.0)), even);

        // Diagonal neighbor (one cell in x and one in y) is even again
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(scale, scale, 0.0)), even);
    }

    #[test]
    fn test_image_texture_missing_is_cyan() {
        let tex = ImageTexture::new(Arc::new(ImageData::missing()));
        assert_eq!(tex.value(0.5, 0.5, Vec3::ZERO), Color::new(0.0, 1.0, 1.0));
    }

    #[test]
    fn test_image_texture_nearest_fetch() {
        // 2x1 image: left red, right blue
        let image = Arc::new(ImageData::new(
            2,
            1,
            vec![[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
        ));
        let tex = ImageTexture::new(image);

        assert_eq!(tex.value(0.1, 0.5, Vec3::ZERO), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.value(0.9, 0.5, Vec3::ZERO), Color::new(0.0, 0.0, 1.0));

        // Coordinates outside [0,1] clamp instead of wrapping
        assert_eq!(tex.value(-2.0, 0.5, Vec3::ZERO), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.value(3.0, 0.5, Vec3::ZERO), Color::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_noise_texture_stays_displayable() {
        let mut rng = StdRng::seed_from_u64(99);
        let tex = NoiseTexture::new(4.0, &mut rng);

        for i in 0..50 {
            let p = Vec3::new(i as f32 * 0.37, i as f32 * -0.21, i as f32 * 0.11);
            let c = tex.value(0.0, 0.0, p);
            assert!(c.x >= 0.0 && c.x <= 1.0, "noise out of range: {}", c.x);
            // Grayscale output
            assert_eq!(c.x, c.y);
            assert_eq!(c.y, c.z);
        }
    }
}
