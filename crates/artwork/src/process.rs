use album_tidy_core::{Error, Result};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Width and height of a valid cover, in pixels
pub const TARGET_SIZE: u32 = 400;

/// Center-crop `img` to a square on its shorter side
pub fn crop_square(img: &DynamicImage) -> DynamicImage {
    let (width, height) = (img.width(), img.height());
    if width == height {
        return img.clone();
    }
    let side = width.min(height);
    img.crop_imm((width - side) / 2, (height - side) / 2, side, side)
}

/// Decode downloaded image bytes and produce a JPEG-encoded square cover of
/// [`TARGET_SIZE`] pixels.
pub fn square_cover(data: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(data)
        .map_err(|e| Error::Image(format!("Failed to load image: {}", e)))?;

    let resized = crop_square(&img).resize_exact(TARGET_SIZE, TARGET_SIZE, FilterType::Lanczos3);

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());
    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, ImageFormat::Jpeg)
        .map_err(|e| Error::Image(format!("Failed to encode image: {}", e)))?;

    Ok(out.into_inner())
}

#[cfg(test)]
pub(crate) fn test_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(image::RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            image::Rgb([255, 0, 0])
        } else {
            image::Rgb([0, 0, 255])
        }
    }));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}
