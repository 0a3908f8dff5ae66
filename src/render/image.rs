//! Image preparation: decode, flatten, fit to the content area.

use image::{DynamicImage, Rgb, RgbImage};

use crate::error::{Error, Result};
use crate::model::ImageBlock;
use crate::parser::encode_png;

use super::construct::EmbeddedImage;

/// Display size that fits `max_width` × `max_height` without upscaling.
pub fn scale_to_fit(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }
    let scale = (max_width as f32 / width as f32)
        .min(max_height as f32 / height as f32)
        .min(1.0);
    let fit = |v: u32, max: u32| ((v as f32 * scale).round() as u32).clamp(1, max.max(1));
    (fit(width, max_width), fit(height, max_height))
}

/// Composite any transparency onto a white background.
pub fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = u16::from(pixel[3]);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8;
        out.put_pixel(x, y, Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]));
    }
    out
}

/// Decode an image block and prepare it for embedding.
pub fn prepare_image(block: &ImageBlock, max_width: u32, max_height: u32) -> Result<EmbeddedImage> {
    if block.data.is_empty() {
        return Err(Error::ImageEmbed("no image data".to_string()));
    }
    let decoded = image::load_from_memory(&block.data)?;
    let (width, height) = scale_to_fit(decoded.width(), decoded.height(), max_width, max_height);
    let png = encode_png(&DynamicImage::ImageRgb8(flatten_onto_white(&decoded)))?;
    Ok(EmbeddedImage { png, width, height })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImageFormat;
    use image::{Rgba, RgbaImage};

    fn png_block(width: u32, height: u32, pixel: Rgba<u8>) -> ImageBlock {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, pixel));
        ImageBlock {
            data: encode_png(&image).unwrap(),
            width,
            height,
            format: ImageFormat::Png,
            page: 1,
        }
    }

    #[test]
    fn test_scale_never_upscales() {
        assert_eq!(scale_to_fit(100, 50, 624, 864), (100, 50));
    }

    #[test]
    fn test_scale_fits_bounds() {
        assert_eq!(scale_to_fit(1248, 100, 624, 864), (624, 50));
        assert_eq!(scale_to_fit(300, 1728, 624, 864), (150, 864));
        let (w, h) = scale_to_fit(999, 997, 624, 864);
        assert!(w <= 624 && h <= 864);
    }

    #[test]
    fn test_transparency_flattened_to_white() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0])));
        assert_eq!(flatten_onto_white(&image).get_pixel(0, 0), &Rgb([255, 255, 255]));

        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 255])));
        assert_eq!(flatten_onto_white(&image).get_pixel(0, 0), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_prepare_image() {
        let block = png_block(40, 20, Rgba([200, 0, 0, 128]));
        let embedded = prepare_image(&block, 624, 864).unwrap();
        assert_eq!((embedded.width, embedded.height), (40, 20));
        assert!(embedded.png.starts_with(b"\x89PNG"));
    }

    #[test]
    fn test_prepare_rejects_garbage() {
        let block = ImageBlock {
            data: b"not an image".to_vec(),
            width: 10,
            height: 10,
            format: ImageFormat::Jpeg,
            page: 1,
        };
        assert!(matches!(prepare_image(&block, 624, 864), Err(Error::ImageEmbed(_))));
    }
}
