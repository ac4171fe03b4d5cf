//! Helio Core - asset loading for the Helio path tracer.
//!
//! The render core consumes already-decoded, linear-space pixel data; this
//! crate is the narrow interface to the decoders. It provides:
//!
//! - [`ImageData`]: a decoded image as a row-major grid of linear colors
//! - [`TextureCache`]: on-demand loading and sharing of decoded images
//!
//! # Example
//!
//! ```ignore
//! use helio_core::TextureCache;
//!
//! let mut cache = TextureCache::with_base_dir("assets");
//! let earth = cache.load("earthmap.jpg")?;
//! println!("{}x{}", earth.width, earth.height);
//! ```

pub mod texture;

pub use texture::{load_image, ImageData, TextureCache, TextureError};
