use image::RgbaImage;

use crate::error::TextureError;

/// An RGBA8 raster used as a body's color map.
///
/// Network-decoded and synthesized textures share this type; consumers cannot
/// tell them apart.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pixels: RgbaImage,
}

impl TextureImage {
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Wrap a raw RGBA buffer of `width * height * 4` bytes.
    pub fn from_raw(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self, TextureError> {
        let len = bytes.len();
        RgbaImage::from_raw(width, height, bytes)
            .filter(|_| width > 0 && height > 0)
            .map(Self::from_rgba)
            .ok_or(TextureError::BadPixels { width, height, len })
    }

    /// Decode an encoded PNG or JPEG as delivered by the host.
    pub fn decode(bytes: &[u8]) -> Result<Self, TextureError> {
        let decoded = image::load_from_memory(bytes)?;
        Ok(Self::from_rgba(decoded.to_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// RGBA at (x, y), or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Row-major RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    #[test]
    fn raw_buffer_size_is_checked() {
        assert!(TextureImage::from_raw(2, 2, vec![0; 16]).is_ok());
        match TextureImage::from_raw(2, 2, vec![0; 15]) {
            Err(TextureError::BadPixels { len, .. }) => assert_eq!(len, 15),
            other => panic!("expected BadPixels, got {:?}", other),
        }
        assert!(TextureImage::from_raw(0, 0, Vec::new()).is_err());
    }

    #[test]
    fn decodes_png_bytes() {
        let mut src = RgbaImage::new(3, 2);
        src.put_pixel(1, 1, Rgba([10, 20, 30, 255]));
        let mut encoded = Cursor::new(Vec::new());
        src.write_to(&mut encoded, ImageFormat::Png).unwrap();

        let tex = TextureImage::decode(encoded.get_ref()).unwrap();
        assert_eq!((tex.width(), tex.height()), (3, 2));
        assert_eq!(tex.pixel(1, 1), Some([10, 20, 30, 255]));
        assert_eq!(tex.pixel(3, 0), None);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = TextureImage::decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, TextureError::Decode(_)));
    }
}
