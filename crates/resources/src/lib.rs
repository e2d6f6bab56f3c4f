//! Resource loading for the roomview scene viewer.
//!
//! The viewer's only external assets are its surface texture images. This
//! crate loads them from disk as RGBA8 pixel data, substituting a
//! deterministic fallback pattern when a file is missing or undecodable.

mod error;
mod texture;

pub use error::{ResourceError, ResourceResult};
pub use texture::TextureImage;
