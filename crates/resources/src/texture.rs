//! Texture image loading.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{ResourceError, ResourceResult};

/// File extensions tried when resolving a texture name.
const EXTENSIONS: &[&str] = &["jpg", "png", "jpeg"];

/// Side length of the fallback checker pattern.
const FALLBACK_SIZE: u32 = 8;

/// Decoded RGBA8 pixel data ready for GPU upload.
#[derive(Clone, Debug)]
pub struct TextureImage {
    /// Tightly packed RGBA8 pixels, row-major from the top-left.
    pub pixels: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl TextureImage {
    /// Loads and decodes an image file into RGBA8.
    ///
    /// # Errors
    ///
    /// Returns an error when the file does not exist or cannot be decoded.
    pub fn load(path: &Path) -> ResourceResult<Self> {
        if !path.exists() {
            return Err(ResourceError::FileNotFound(path.to_path_buf()));
        }

        let image = image::open(path)?.into_rgba8();
        let (width, height) = image.dimensions();

        debug!("Loaded texture {:?}: {}x{}", path, width, height);

        Ok(Self {
            pixels: image.into_raw(),
            width,
            height,
        })
    }

    /// Resolves `name` against `dir` (trying the usual image extensions)
    /// and loads it, substituting the checker fallback with a logged
    /// warning when the file is missing or undecodable.
    pub fn load_or_fallback(dir: &Path, name: &str) -> Self {
        for ext in EXTENSIONS {
            let path = dir.join(format!("{}.{}", name, ext));
            if !path.exists() {
                continue;
            }
            match Self::load(&path) {
                Ok(texture) => return texture,
                Err(e) => {
                    warn!("Failed to decode texture {:?}: {}", path, e);
                    return Self::fallback();
                }
            }
        }

        warn!(
            "Texture '{}' not found in {:?}, using fallback pattern",
            name, dir
        );
        Self::fallback()
    }

    /// The 8x8 magenta/black checker substituted for missing textures.
    pub fn fallback() -> Self {
        let mut pixels = Vec::with_capacity((FALLBACK_SIZE * FALLBACK_SIZE * 4) as usize);
        for y in 0..FALLBACK_SIZE {
            for x in 0..FALLBACK_SIZE {
                if (x + y) % 2 == 0 {
                    pixels.extend_from_slice(&[255, 0, 255, 255]);
                } else {
                    pixels.extend_from_slice(&[0, 0, 0, 255]);
                }
            }
        }
        Self {
            pixels,
            width: FALLBACK_SIZE,
            height: FALLBACK_SIZE,
        }
    }

    /// A 1x1 opaque white texture, bound for untextured materials.
    pub fn white() -> Self {
        Self {
            pixels: vec![255, 255, 255, 255],
            width: 1,
            height: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_dimensions_and_pattern() {
        let texture = TextureImage::fallback();
        assert_eq!(texture.width, 8);
        assert_eq!(texture.height, 8);
        assert_eq!(texture.pixels.len(), 8 * 8 * 4);

        // Top-left texel is magenta, its right neighbor black.
        assert_eq!(&texture.pixels[0..4], &[255, 0, 255, 255]);
        assert_eq!(&texture.pixels[4..8], &[0, 0, 0, 255]);
        // Pattern alternates per row as well.
        let row = (8 * 4) as usize;
        assert_eq!(&texture.pixels[row..row + 4], &[0, 0, 0, 255]);
    }

    #[test]
    fn test_white_texture() {
        let texture = TextureImage::white();
        assert_eq!(texture.width, 1);
        assert_eq!(texture.height, 1);
        assert_eq!(texture.pixels, vec![255, 255, 255, 255]);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let result = TextureImage::load(Path::new("does/not/exist.jpg"));
        assert!(matches!(result, Err(ResourceError::FileNotFound(_))));
    }

    #[test]
    fn test_load_or_fallback_missing_is_checker() {
        let texture = TextureImage::load_or_fallback(Path::new("does/not/exist"), "lava");
        assert_eq!(texture.width, 8);
        assert_eq!(texture.height, 8);
    }
}
