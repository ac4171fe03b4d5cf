//! Tile decomposition for parallel rendering.
//!
//! The image is cut into fixed-size square tiles that workers render
//! independently; each tile's destination rectangle is disjoint from every
//! other tile's, so merging needs no synchronization.

use crate::camera::Camera;
use crate::hittable::Hittable;
use crate::material::Color;
use crate::renderer::{render_pixel, RenderSettings};

/// A rectangular region of the image rendered as one unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// X coordinate of the tile's top-left corner
    pub x: u32,
    /// Y coordinate of the tile's top-left corner
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Index of this tile in the schedule
    pub index: usize,
}

impl Tile {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Partition an image into tiles of at most `tile_size` on a side; tiles at
/// the right and bottom edges are clipped.
pub fn tiles(width: u32, height: u32, tile_size: u32) -> Vec<Tile> {
    assert!(tile_size > 0, "tile size must be positive");

    let mut tiles = Vec::new();
    let mut index = 0;

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let tw = tile_size.min(width - x);
            let th = tile_size.min(height - y);
            tiles.push(Tile::new(x, y, tw, th, index));
            index += 1;
            x += tile_size;
        }
        y += tile_size;
    }

    tiles
}

/// Result of rendering one tile: the tile and its row-major color grid.
#[derive(Debug, Clone)]
pub struct TileResult {
    pub tile: Tile,
    pub pixels: Vec<Color>,
}

impl TileResult {
    pub fn new(tile: Tile, pixels: Vec<Color>) -> Self {
        Self { tile, pixels }
    }
}

/// Render a single tile, reading only the immutable camera, scene and
/// settings.
pub fn render_tile(
    tile: &Tile,
    camera: &Camera,
    world: &dyn Hittable,
    settings: &RenderSettings,
) -> Vec<Color> {
    let mut pixels = Vec::with_capacity(tile.pixel_count() as usize);

    for local_y in 0..tile.height {
        for local_x in 0..tile.width {
            let global_x = tile.x + local_x;
            let global_y = tile.y + local_y;
            pixels.push(render_pixel(camera, world, global_x, global_y, settings));
        }
    }

    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiles_exact_fit() {
        let tiles = tiles(128, 128, 64);
        assert_eq!(tiles.len(), 4); // 2x2 grid

        let total_pixels: u32 = tiles.iter().map(|t| t.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_tiles_partial_fit() {
        let tiles = tiles(100, 70, 32);
        assert_eq!(tiles.len(), 4 * 3);

        let total_pixels: u32 = tiles.iter().map(|t| t.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 70);

        // Edge tiles are clipped, never zero-sized
        assert!(tiles.iter().all(|t| t.width > 0 && t.height > 0));
        assert!(tiles.iter().all(|t| t.x + t.width <= 100 && t.y + t.height <= 70));
    }

    #[test]
    fn test_every_pixel_covered_exactly_once() {
        let (width, height) = (53u32, 37u32);
        let mut covered = vec![0u32; (width * height) as usize];

        for tile in tiles(width, height, 16) {
            for dy in 0..tile.height {
                for dx in 0..tile.width {
                    covered[((tile.y + dy) * width + tile.x + dx) as usize] += 1;
                }
            }
        }

        assert!(covered.iter().all(|&count| count == 1));
    }

    #[test]
    fn test_tile_indices_are_sequential() {
        let tiles = tiles(96, 64, 32);
        for (i, tile) in tiles.iter().enumerate() {
            assert_eq!(tile.index, i);
        }
    }
}
