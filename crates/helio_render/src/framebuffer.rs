//! Render output buffer.

use crate::material::Color;
use crate::tile::Tile;

/// Row-major grid of accumulated linear colors, origin top-left.
///
/// Values are neither gamma-corrected nor clamped; encoding is the image
/// writer's job.
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pixels: Vec<Color>,
}

impl FrameBuffer {
    /// A black buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Copy a tile's row-major color grid into its rectangle.
    ///
    /// Tile rectangles never overlap, so the merge is order-independent.
    pub fn write_tile(&mut self, tile: &Tile, colors: &[Color]) {
        debug_assert_eq!(colors.len(), tile.pixel_count() as usize);

        for local_y in 0..tile.height {
            let src = (local_y * tile.width) as usize;
            let dst = ((tile.y + local_y) * self.width + tile.x) as usize;
            self.pixels[dst..dst + tile.width as usize]
                .copy_from_slice(&colors[src..src + tile.width as usize]);
        }
    }

    /// All pixels, row-major from the top-left.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helio_math::Vec3;

    #[test]
    fn test_new_buffer_is_black() {
        let buffer = FrameBuffer::new(4, 3);
        assert_eq!(buffer.pixels().len(), 12);
        assert!(buffer.pixels().iter().all(|c| *c == Color::ZERO));
    }

    #[test]
    fn test_set_get_roundtrip() {
        let mut buffer = FrameBuffer::new(4, 3);
        let color = Vec3::new(0.1, 0.2, 0.3);

        buffer.set(3, 2, color);
        assert_eq!(buffer.get(3, 2), color);
        assert_eq!(buffer.get(0, 0), Color::ZERO);
    }

    #[test]
    fn test_write_tile_lands_in_rectangle() {
        let mut buffer = FrameBuffer::new(6, 4);
        let tile = Tile::new(2, 1, 3, 2, 0);

        let colors: Vec<Color> = (0..6).map(|i| Vec3::splat(i as f32 + 1.0)).collect();
        buffer.write_tile(&tile, &colors);

        // Tile interior, row-major
        assert_eq!(buffer.get(2, 1), Vec3::splat(1.0));
        assert_eq!(buffer.get(4, 1), Vec3::splat(3.0));
        assert_eq!(buffer.get(2, 2), Vec3::splat(4.0));
        assert_eq!(buffer.get(4, 2), Vec3::splat(6.0));

        // Outside the rectangle stays untouched
        assert_eq!(buffer.get(1, 1), Color::ZERO);
        assert_eq!(buffer.get(5, 3), Color::ZERO);
    }
}
