//! Matcap lookup image.
//!
//! A matcap stores the shaded appearance of a sphere; the fragment shader
//! samples it with the view-space normal, so lighting costs one texture read.

use std::path::Path;

use glam::Vec3;

use crate::error::RingfieldError;

/// Side length of the generated fallback matcap.
const FALLBACK_SIZE: u32 = 64;

/// Decoded RGBA8 matcap image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcapImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed sRGB RGBA8 rows, top row first.
    pub pixels: Vec<u8>,
}

impl MatcapImage {
    /// Decode an image file (PNG or JPEG) into RGBA8.
    ///
    /// # Errors
    ///
    /// Returns [`RingfieldError::Texture`] if the file is missing or cannot
    /// be decoded.
    pub fn load(path: &Path) -> Result<Self, RingfieldError> {
        let image = image::open(path).map_err(|e| {
            RingfieldError::Texture(format!("{}: {e}", path.display()))
        })?;
        let rgba = image.to_rgba8();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
        })
    }

    /// Load `path`, falling back to [`MatcapImage::fallback`] with a warning.
    pub fn load_or_fallback(path: &Path) -> Self {
        match Self::load(path) {
            Ok(image) => {
                log::debug!(
                    "matcap {} loaded ({}x{})",
                    path.display(),
                    image.width,
                    image.height
                );
                image
            }
            Err(e) => {
                log::warn!("{e}; using generated matcap");
                Self::fallback()
            }
        }
    }

    /// Glossy grey sphere: diffuse falloff toward the rim plus a tight
    /// highlight up and to the left.
    pub fn fallback() -> Self {
        let size = FALLBACK_SIZE;
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);
        let half = size as f32 / 2.0;
        let light = Vec3::new(-0.4, 0.5, 0.77).normalize();

        for y in 0..size {
            for x in 0..size {
                let nx = (x as f32 + 0.5 - half) / half;
                let ny = (half - y as f32 - 0.5) / half;
                let r2 = nx * nx + ny * ny;
                let value = if r2 > 1.0 {
                    0.0
                } else {
                    let n = Vec3::new(nx, ny, (1.0 - r2).sqrt());
                    let diffuse = n.dot(light).max(0.0);
                    let specular = diffuse.powf(40.0);
                    (0.08 + 0.55 * diffuse + 0.6 * specular).min(1.0)
                };
                let byte = (value * 255.0).round() as u8;
                pixels.extend_from_slice(&[byte, byte, byte, 255]);
            }
        }

        Self {
            width: size,
            height: size,
            pixels,
        }
    }

    /// Bytes per row of [`MatcapImage::pixels`].
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_square_rgba() {
        let img = MatcapImage::fallback();
        assert_eq!(img.width, FALLBACK_SIZE);
        assert_eq!(img.pixels.len(), (img.width * img.height * 4) as usize);
        assert_eq!(img.bytes_per_row(), FALLBACK_SIZE * 4);
    }

    #[test]
    fn fallback_center_brighter_than_corner() {
        let img = MatcapImage::fallback();
        let at = |x: u32, y: u32| img.pixels[((y * img.width + x) * 4) as usize];
        let c = img.width / 2;
        assert!(at(c, c) > at(0, 0));
        assert_eq!(at(0, 0), 0);
    }

    #[test]
    fn missing_file_falls_back() {
        let img = MatcapImage::load_or_fallback(Path::new("/nonexistent.jpg"));
        assert_eq!(img, MatcapImage::fallback());
    }

    #[test]
    fn decodes_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.png");
        let buffer =
            image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]));
        buffer.save(&path).unwrap();

        let img = MatcapImage::load(&path).unwrap();
        assert_eq!((img.width, img.height), (4, 2));
        assert_eq!(&img.pixels[..4], &[10, 20, 30, 255]);
    }
}
