//! Sprite texture for star points.
//!
//! A sprite is optional. When one is configured, each star point samples it
//! and its alpha channel masks the square point into a shape; otherwise
//! points render as solid squares.
//!
//! # Supported Formats
//!
//! - PNG (recommended)
//! - JPEG

use std::path::Path;

use crate::error::TextureError;

/// Decoded RGBA sprite image.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteTexture {
    /// Raw RGBA pixel data (width * height * 4 bytes).
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl SpriteTexture {
    /// Wrap raw RGBA data.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self, TextureError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(TextureError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { data, width, height })
    }

    /// Load and decode an image file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| TextureError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let img = image::load_from_memory(&bytes)?.into_rgba8();
        let (width, height) = img.dimensions();
        log::info!("loaded sprite {} ({}x{})", path.display(), width, height);
        Self::from_rgba(img.into_raw(), width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_checks_size() {
        assert!(SpriteTexture::from_rgba(vec![0; 16], 2, 2).is_ok());
        assert!(matches!(
            SpriteTexture::from_rgba(vec![0; 15], 2, 2),
            Err(TextureError::SizeMismatch { expected: 16, actual: 15 })
        ));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = SpriteTexture::from_file("definitely/not/here.png").unwrap_err();
        assert!(matches!(err, TextureError::Read { .. }));
        assert!(err.to_string().contains("definitely/not/here.png"));
    }

    #[test]
    fn test_garbage_file_is_decode_error() {
        let path = std::env::temp_dir().join(format!("starfield-garbage-{}.png", std::process::id()));
        std::fs::write(&path, b"not an image").unwrap();
        let err = SpriteTexture::from_file(&path).unwrap_err();
        assert!(matches!(err, TextureError::Decode(_)));
        std::fs::remove_file(&path).ok();
    }

    /// Soft round disc, `size` pixels across.
    fn disc(size: u32) -> SpriteTexture {
        let center = (size as f32 - 1.0) * 0.5;
        let radius = size as f32 * 0.5;
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let d = (x as f32 - center).hypot(y as f32 - center) / radius;
                let alpha = ((1.0 - d).clamp(0.0, 1.0) * 255.0) as u8;
                data.extend_from_slice(&[255, 255, 255, alpha]);
            }
        }
        SpriteTexture::from_rgba(data, size, size).unwrap()
    }

    #[test]
    fn test_load_png_round_trip() {
        let dir = std::env::temp_dir().join(format!("starfield-sprite-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sprite.png");

        let disc = disc(8);
        image::RgbaImage::from_raw(8, 8, disc.data.clone())
            .unwrap()
            .save(&path)
            .unwrap();

        let loaded = SpriteTexture::from_file(&path).unwrap();
        assert_eq!(loaded, disc);
        assert!(loaded.data[(4 * 8 + 4) * 4 + 3] > 200);
        assert_eq!(loaded.data[3], 0);
        std::fs::remove_dir_all(&dir).ok();
    }
}
