//! Image validation and optimization.
//!
//! Used by the server when an admin uploads gallery or muscle images, and by
//! `nfg optimize-images` for files already on disk.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageFormat, ImageReader};

use crate::error::ImageError;

/// Allowed image formats for uploads.
pub const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Allowed upload file extensions, lowercase.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Maximum request body size for admin uploads (10MB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Files at or below this size are left alone by the optimizer.
pub const OPTIMIZE_MIN_BYTES: usize = 10 * 1024;

/// JPEG quality used when re-encoding.
pub const JPEG_QUALITY: u8 = 82;

/// Outcome of [`optimize_image`].
#[derive(Debug)]
pub enum Optimized {
    /// Re-encoded bytes that are smaller than the input.
    Smaller(Vec<u8>),
    /// The input is already as small as we can make it, or the format is not re-encoded.
    Unchanged,
}

/// Lowercase extension of `filename` if it is an allowed upload type.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Validate image data: check format is allowed and detect content type.
///
/// Returns the detected format on success.
pub fn validate_image(data: &[u8]) -> Result<ImageFormat, ImageError> {
    let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;

    let format = reader.format().ok_or(ImageError::UnknownFormat)?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(ImageError::Unsupported(format));
    }

    // Header sniffing alone accepts truncated files; make sure it decodes.
    reader.decode().map_err(ImageError::Decode)?;

    Ok(format)
}

/// Re-encode JPEG and PNG data to shrink it, keeping the original format.
///
/// GIF and WebP are passed through untouched, as are files of
/// [`OPTIMIZE_MIN_BYTES`] or less. JPEG transparency is flattened to RGB.
pub fn optimize_image(data: &[u8]) -> Result<Optimized, ImageError> {
    if data.len() <= OPTIMIZE_MIN_BYTES {
        return Ok(Optimized::Unchanged);
    }

    let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    let format = reader.format().ok_or(ImageError::UnknownFormat)?;

    let encoded = match format {
        ImageFormat::Jpeg => {
            let img = reader.decode().map_err(ImageError::Decode)?;
            encode_jpeg(&img)?
        }
        ImageFormat::Png => {
            let img = reader.decode().map_err(ImageError::Decode)?;
            encode_png(&img)?
        }
        ImageFormat::Gif | ImageFormat::WebP => return Ok(Optimized::Unchanged),
        other => return Err(ImageError::Unsupported(other)),
    };

    if encoded.len() < data.len() {
        Ok(Optimized::Smaller(encoded))
    } else {
        Ok(Optimized::Unchanged)
    }
}

fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>, ImageError> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(ImageError::Encode)?;
    Ok(buf)
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, ImageError> {
    let mut buf = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buf, CompressionType::Best, FilterType::Adaptive);
    img.write_with_encoder(encoder).map_err(ImageError::Encode)?;
    Ok(buf)
}
