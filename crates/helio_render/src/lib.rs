//! Helio - CPU path tracing core.
//!
//! A Monte Carlo path tracer: scenes of sphere primitives with
//! Lambertian/metal/dielectric materials are intersected through a bounding
//! volume hierarchy, shaded by a bounded-bounce integrator, and sampled in
//! parallel over image tiles.
//!
//! Scene construction, image decoding and image encoding live outside this
//! crate; it consumes a [`HittableList`] and a configured [`Camera`] and
//! produces a [`FrameBuffer`] of linear colors.

mod bvh;
mod camera;
mod framebuffer;
mod hittable;
mod material;
mod perlin;
mod renderer;
mod sphere;
mod texture;
mod tile;

pub use bvh::BvhNode;
pub use camera::{Camera, Projection};
pub use framebuffer::FrameBuffer;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Color, Dielectric, Lambertian, Material, Metal, Scatter};
pub use perlin::Perlin;
pub use renderer::{ray_color, render, render_pixel, RenderError, RenderMode, RenderSettings};
pub use sphere::Sphere;
pub use texture::{Checker, ImageTexture, NoiseTexture, SolidColor, Texture};
pub use tile::{render_tile, tiles, Tile, TileResult};

/// Re-export common math types
pub use helio_math::{Aabb, Interval, Point3, Ray, Vec3};

use rand::{Rng, RngCore};

/// Uniform sample in [0, 1) from a type-erased RNG.
#[inline]
pub(crate) fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen()
}
