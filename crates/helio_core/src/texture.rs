//! Decoded texture images and their cache.
//!
//! Images are decoded once, converted from sRGB bytes to linear floats, and
//! shared behind `Arc` so render threads can sample them without copies.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use helio_math::Vec3;
use thiserror::Error;

/// Errors that can occur while loading a texture image.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decoding error: {0}")]
    Decode(#[from] image::ImageError),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded image: row-major linear-space RGB, origin top-left.
#[derive(Clone, Debug)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    /// One `[r, g, b]` triple per pixel, linear, unclamped.
    pub pixels: Vec<[f32; 3]>,
}

impl ImageData {
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 3]>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// An image with no pixel data. Samplers treat this as "texture
    /// missing" and substitute a diagnostic color.
    pub fn missing() -> Self {
        Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Linear color at integer coordinates, clamped to the image bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Vec3 {
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));
        let [r, g, b] = self.pixels[(y * self.width + x) as usize];
        Vec3::new(r, g, b)
    }

    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<[f32; 3]>()
    }
}

/// Cache of decoded images keyed by the path they were requested with.
pub struct TextureCache {
    textures: HashMap<String, Arc<ImageData>>,
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: None,
        }
    }

    /// Cache that resolves relative paths against `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load an image, reusing the cached copy if present.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<ImageData>> {
        if let Some(image) = self.textures.get(path) {
            return Ok(image.clone());
        }

        let full_path = self.resolve_path(path);
        let image = Arc::new(load_image(&full_path)?);
        self.textures.insert(path.to_string(), image.clone());

        log::debug!(
            "loaded texture {} ({}x{}, {:.1} KB)",
            path,
            image.width,
            image.height,
            image.size_bytes() as f32 / 1024.0
        );

        Ok(image)
    }

    /// Cached image, without loading.
    pub fn get(&self, path: &str) -> Option<Arc<ImageData>> {
        self.textures.get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn clear(&mut self) {
        self.textures.clear();
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(base) = &self.base_dir {
            base.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an image file into linear-space pixel data.
pub fn load_image(path: &Path) -> TextureResult<ImageData> {
    let img = image::open(path)?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    let pixels: Vec<[f32; 3]> = rgb
        .pixels()
        .map(|p| {
            [
                srgb_to_linear(p[0]),
                srgb_to_linear(p[1]),
                srgb_to_linear(p[2]),
            ]
        })
        .collect();

    Ok(ImageData::new(width, height, pixels))
}

/// Convert an sRGB byte value to a linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
