use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::sync::Arc;

/// Shared, immutable bitmap.
///
/// Working images are handed around as `Arc`s so that "the input changed" can
/// be detected by identity instead of comparing pixels.
pub type BitmapRef = Arc<RgbaImage>;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Encode a bitmap as PNG bytes
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Decode any supported encoded bitmap into RGBA
pub fn decode(bytes: &[u8]) -> Result<RgbaImage, image::ImageError> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// A bitmap filled with a single color
pub fn filled(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

/// Convert to the egui representation for uploading as a texture
pub fn to_color_image(image: &RgbaImage) -> egui::ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_round_trip_is_lossless() {
        let mut image = filled(4, 3, WHITE);
        image.put_pixel(1, 2, Rgba([10, 20, 30, 128]));

        let bytes = encode_png(&image).unwrap();
        let decoded = decode(&bytes).unwrap();

        assert_eq!(decoded, image);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode(b"definitely not a png").is_err());
    }

    #[test]
    fn test_color_image_size() {
        let color_image = to_color_image(&filled(7, 5, WHITE));
        assert_eq!(color_image.size, [7, 5]);
    }
}
