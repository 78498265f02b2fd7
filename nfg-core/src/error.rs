use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to read image: {0}")]
    Read(#[from] std::io::Error),

    #[error("Could not detect image format")]
    UnknownFormat,

    #[error("Unsupported image format: {0:?}. Allowed: JPEG, PNG, GIF, WebP")]
    Unsupported(::image::ImageFormat),

    #[error("Failed to decode image: {0}")]
    Decode(::image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(::image::ImageError),
}
