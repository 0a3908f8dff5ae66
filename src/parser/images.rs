//! Image XObject payloads and their conversion to embeddable images.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, RgbImage};

use crate::error::{Error, Result};
use crate::model::{ImageBlock, ImageFormat};

/// Color space of raw image samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSpace {
    Gray,
    Rgb,
    Cmyk,
    /// Palette lookup into a base space
    Indexed {
        base: Box<ColorSpace>,
        palette: Vec<u8>,
    },
}

impl ColorSpace {
    /// Device space for an ICC profile with `n` components.
    pub fn from_components(n: i64) -> Option<Self> {
        match n {
            1 => Some(ColorSpace::Gray),
            3 => Some(ColorSpace::Rgb),
            4 => Some(ColorSpace::Cmyk),
            _ => None,
        }
    }

    /// Components per sample.
    pub fn components(&self) -> usize {
        match self {
            ColorSpace::Gray | ColorSpace::Indexed { .. } => 1,
            ColorSpace::Rgb => 3,
            ColorSpace::Cmyk => 4,
        }
    }
}

/// Image data as stored in the source.
#[derive(Debug, Clone)]
pub enum ImagePayload {
    /// Already an encoded image file (JPEG)
    Encoded { data: Vec<u8>, format: ImageFormat },
    /// Decompressed samples
    Raw {
        data: Vec<u8>,
        color_space: ColorSpace,
        bits_per_component: u8,
    },
    /// A payload this engine cannot decode
    Unsupported(String),
}

/// An image XObject found in a page's resources.
#[derive(Debug, Clone)]
pub struct ImageXObject {
    /// Resource name used by `Do`
    pub name: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub payload: ImagePayload,
}

impl ImageXObject {
    /// Convert into an image block, encoding raw samples as PNG.
    pub fn into_block(self, page: u32) -> Result<ImageBlock> {
        let (data, format) = match self.payload {
            ImagePayload::Encoded { data, format } => (data, format),
            ImagePayload::Raw {
                data,
                color_space,
                bits_per_component,
            } => {
                let image = samples_to_image(
                    &data,
                    self.width,
                    self.height,
                    &color_space,
                    bits_per_component,
                )?;
                (encode_png(&image)?, ImageFormat::Png)
            }
            ImagePayload::Unsupported(reason) => {
                return Err(Error::ImageEmbed(format!("unsupported image: {}", reason)))
            }
        };

        Ok(ImageBlock {
            data,
            width: self.width,
            height: self.height,
            format,
            page,
        })
    }
}

/// Palette entry used for out-of-range indices.
static BLACK: [u8; 4] = [0; 4];

/// Build an image from 8-bit samples.
fn samples_to_image(
    data: &[u8],
    width: u32,
    height: u32,
    color_space: &ColorSpace,
    bits: u8,
) -> Result<DynamicImage> {
    if bits != 8 {
        return Err(Error::ImageEmbed(format!(
            "{} bits per component is not supported",
            bits
        )));
    }

    let pixels = width as usize * height as usize;
    let needed = pixels * color_space.components();
    if pixels == 0 || data.len() < needed {
        return Err(Error::ImageEmbed(format!(
            "sample data too short: {} < {}",
            data.len(),
            needed
        )));
    }
    let data = &data[..needed];
    let short = || Error::ImageEmbed("sample buffer does not match dimensions".to_string());

    let image = match color_space {
        ColorSpace::Gray => {
            DynamicImage::ImageLuma8(GrayImage::from_raw(width, height, data.to_vec()).ok_or_else(short)?)
        }
        ColorSpace::Rgb => {
            DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, data.to_vec()).ok_or_else(short)?)
        }
        ColorSpace::Cmyk => {
            let rgb = data.chunks_exact(4).flat_map(cmyk_to_rgb).collect();
            DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, rgb).ok_or_else(short)?)
        }
        ColorSpace::Indexed { base, palette } => {
            let stride = base.components();
            let mut rgb = Vec::with_capacity(pixels * 3);
            for &index in data {
                let start = index as usize * stride;
                let entry = palette
                    .get(start..start + stride)
                    .unwrap_or(&BLACK[..stride.min(BLACK.len())]);
                match base.as_ref() {
                    ColorSpace::Gray => rgb.extend_from_slice(&[entry[0]; 3]),
                    ColorSpace::Rgb => rgb.extend_from_slice(entry),
                    ColorSpace::Cmyk => rgb.extend_from_slice(&cmyk_to_rgb(entry)),
                    ColorSpace::Indexed { .. } => {
                        return Err(Error::ImageEmbed("nested indexed color space".to_string()))
                    }
                }
            }
            DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, rgb).ok_or_else(short)?)
        }
    };
    Ok(image)
}

fn cmyk_to_rgb(cmyk: &[u8]) -> [u8; 3] {
    let k = 255 - u16::from(cmyk[3]);
    let channel = |c: u8| ((255 - u16::from(c)) * k / 255) as u8;
    [channel(cmyk[0]), channel(cmyk[1]), channel(cmyk[2])]
}

/// Encode an image as PNG.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, image::ImageFormat::Png)?;
    Ok(buf.into_inner())
}
