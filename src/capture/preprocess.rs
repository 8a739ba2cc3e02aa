use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::GenericImageView;

/// Longest side of a frame submitted for analysis.
pub const ANALYSIS_MAX_DIMENSION: u32 = 320;

const JPEG_QUALITY: u8 = 85;

/// Downscale so the longer side is at most `max_dimension` and re-encode as JPEG.
///
/// Any decode or encode failure hands back the input untouched; a frame that could not be
/// shrunk is still worth sending.
pub fn resize(bytes: &[u8], max_dimension: u32) -> Vec<u8> {
    match try_resize(bytes, max_dimension) {
        Ok(resized) => resized,
        Err(e) => {
            log::warn!("Error resizing image, sending original bytes: {}", e);
            bytes.to_vec()
        }
    }
}

fn try_resize(bytes: &[u8], max_dimension: u32) -> Result<Vec<u8>, image::ImageError> {
    let image = image::load_from_memory(bytes)?;
    let (width, height) = image.dimensions();

    let image = if width.max(height) > max_dimension {
        let (new_width, new_height) = scaled_dimensions(width, height, max_dimension);
        image.resize_exact(new_width, new_height, FilterType::Lanczos3)
    } else {
        image
    };

    // JPEG carries no alpha channel
    let rgb = image.to_rgb8();
    let mut buffer = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY))?;
    Ok(buffer)
}

/// Target size with the longer side pinned to `max_dimension`, aspect ratio preserved.
pub fn scaled_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longer = width.max(height);
    if longer <= max_dimension {
        return (width, height);
    }

    let scale = |side: u32| {
        let scaled = (side as f64 * max_dimension as f64 / longer as f64).round() as u32;
        scaled.max(1)
    };

    if width >= height {
        (max_dimension, scale(height))
    } else {
        (scale(width), max_dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    fn dimensions_of(bytes: &[u8]) -> (u32, u32) {
        image::load_from_memory(bytes).unwrap().dimensions()
    }

    #[test]
    fn halves_a_wide_frame() {
        assert_eq!(scaled_dimensions(1000, 500, 320), (320, 160));

        let out = resize(&png(1000, 500), 320);
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Jpeg);
        assert_eq!(dimensions_of(&out), (320, 160));
    }

    #[test]
    fn tall_frame_pins_height() {
        assert_eq!(scaled_dimensions(480, 640, 320), (240, 320));
        assert_eq!(scaled_dimensions(3, 1000, 320), (1, 320));
    }

    #[test]
    fn small_frame_keeps_geometry() {
        assert_eq!(scaled_dimensions(200, 100, 320), (200, 100));

        let out = resize(&png(200, 100), 320);
        assert_eq!(dimensions_of(&out), (200, 100));
    }

    #[test]
    fn second_pass_is_stable() {
        let once = resize(&png(1280, 720), 320);
        let twice = resize(&once, 320);
        assert_eq!(dimensions_of(&once), (320, 180));
        assert_eq!(dimensions_of(&twice), (320, 180));
    }

    #[test]
    fn undecodable_input_is_returned_unchanged() {
        let garbage = b"definitely not an image".to_vec();
        assert_eq!(resize(&garbage, 320), garbage);
        assert!(resize(&[], 320).is_empty());
    }
}
