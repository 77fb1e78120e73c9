//! In-process render pipeline: crop, square resize, JPEG encode.
//!
//! All operations work on [`PixelBuffer`] (RGB8, row-major) and return new
//! buffers without touching the input. The pipeline is synchronous; hosts
//! dispatch it to a worker thread and wrap it in an
//! [`OutputProducer`](super::OutputProducer).

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::ProduceError;
use crate::resolve::CropResult;
use crate::DEFAULT_JPEG_QUALITY;

/// An RGB image held in memory, 3 bytes per pixel, row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGB pixel data; length is width * height * 3.
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer, validating that the pixel data matches the
    /// dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ProduceError> {
        if width == 0 || height == 0 {
            return Err(ProduceError::InvalidDimensions { width, height });
        }
        let expected = (width as usize) * (height as usize) * 3;
        if pixels.len() != expected {
            return Err(ProduceError::InvalidPixelData {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Convert to an `image::RgbImage` for resize operations.
    fn to_rgb_image(&self) -> Result<image::RgbImage, ProduceError> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone()).ok_or_else(|| {
            ProduceError::ResizeFailed("pixel buffer rejected by image crate".to_string())
        })
    }

    fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }
}

/// Cut the resolved square out of the source buffer.
///
/// The resolver guarantees the rectangle lies inside the image it was
/// resolved against; this still validates against the buffer it is actually
/// given, since hosts may hand the pipeline a downsampled preview by
/// mistake.
pub fn crop_pixels(source: &PixelBuffer, crop: &CropResult) -> Result<PixelBuffer, ProduceError> {
    let right = crop.origin_x.checked_add(crop.size);
    let bottom = crop.origin_y.checked_add(crop.size);
    let in_bounds = matches!((right, bottom), (Some(r), Some(b)) if r <= source.width && b <= source.height);
    if crop.size == 0 || !in_bounds {
        return Err(ProduceError::CropOutOfBounds {
            origin_x: crop.origin_x,
            origin_y: crop.origin_y,
            size: crop.size,
            width: source.width,
            height: source.height,
        });
    }

    let side = crop.size as usize;
    let src_stride = source.width as usize * 3;
    let row_bytes = side * 3;
    let mut output = vec![0u8; side * row_bytes];

    // Row-wise copy
    for y in 0..side {
        let src_y = crop.origin_y as usize + y;
        let src_start = src_y * src_stride + crop.origin_x as usize * 3;
        let dst_start = y * row_bytes;
        output[dst_start..dst_start + row_bytes]
            .copy_from_slice(&source.pixels[src_start..src_start + row_bytes]);
    }

    PixelBuffer::new(crop.size, crop.size, output)
}

/// Resize a buffer to an exact square side.
///
/// Uses Lanczos3: this runs once per confirm on a small output, so quality
/// wins over speed.
pub fn resize_square(source: &PixelBuffer, side: u32) -> Result<PixelBuffer, ProduceError> {
    if side == 0 {
        return Err(ProduceError::InvalidDimensions {
            width: side,
            height: side,
        });
    }
    if source.width == side && source.height == side {
        return Ok(source.clone());
    }

    let rgb = source.to_rgb_image()?;
    let resized = image::imageops::resize(&rgb, side, side, image::imageops::FilterType::Lanczos3);
    Ok(PixelBuffer::from_rgb_image(resized))
}

/// Encode an RGB buffer to JPEG bytes at the given quality (1-100).
pub fn encode_jpeg(source: &PixelBuffer, quality: u8) -> Result<Vec<u8>, ProduceError> {
    let quality = quality.clamp(1, 100);
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);

    encoder
        .write_image(
            &source.pixels,
            source.width,
            source.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| ProduceError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Run the full pipeline: crop to the resolved square, resize to the output
/// side, encode as JPEG. `quality` defaults to [`DEFAULT_JPEG_QUALITY`] when
/// `None`.
pub fn render_crop(
    source: &PixelBuffer,
    crop: &CropResult,
    quality: Option<u8>,
) -> Result<Vec<u8>, ProduceError> {
    let cropped = crop_pixels(source, crop)?;
    let resized = resize_square(&cropped, crop.output_size)?;
    encode_jpeg(&resized, quality.unwrap_or(DEFAULT_JPEG_QUALITY))
}
