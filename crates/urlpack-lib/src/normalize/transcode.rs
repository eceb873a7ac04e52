use super::media_type;
use image::ImageFormat;
use std::io::Cursor;
use thiserror::Error;

pub const CANONICAL_CONTENT_TYPE: &str = "image/png";
pub const CANONICAL_EXTENSION: &str = "png";

const IMAGE_PREFIX: &str = "image/";

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode PNG: {0}")]
    Encode(#[source] image::ImageError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Normalization {
    /// Not an image, or an image that could not be transcoded.
    PassThrough,
    AlreadyCanonical,
    Converted,
}

impl Normalization {
    /// Whether the content is now in the canonical format and needs the canonical extension.
    pub fn was_converted(self) -> bool {
        matches!(self, Self::AlreadyCanonical | Self::Converted)
    }
}

#[derive(Debug)]
pub struct NormalizedContent {
    pub bytes: Vec<u8>,
    pub normalization: Normalization,
}

impl NormalizedContent {
    pub fn was_converted(&self) -> bool {
        self.normalization.was_converted()
    }
}

/// Re-encodes non-PNG images as PNG. Everything else, and any image that fails to
/// transcode, is returned untouched.
///
/// CPU-bound; call from a blocking context.
pub fn normalize_content(bytes: Vec<u8>, content_type: &str) -> NormalizedContent {
    let media_type = media_type(content_type);
    if !media_type.starts_with(IMAGE_PREFIX) {
        return NormalizedContent {
            bytes,
            normalization: Normalization::PassThrough,
        };
    }

    if media_type == CANONICAL_CONTENT_TYPE {
        return NormalizedContent {
            bytes,
            normalization: Normalization::AlreadyCanonical,
        };
    }

    match transcode_to_png(&bytes) {
        Ok(png) => {
            tracing::debug!(from = %media_type, original_size = bytes.len(), size = png.len(), "Converted image to PNG");
            NormalizedContent {
                bytes: png,
                normalization: Normalization::Converted,
            }
        }
        Err(err) => {
            tracing::warn!(content_type = %media_type, error = %err, "Keeping original image");
            NormalizedContent {
                bytes,
                normalization: Normalization::PassThrough,
            }
        }
    }
}

fn transcode_to_png(bytes: &[u8]) -> Result<Vec<u8>, ConversionError> {
    let image = image::load_from_memory(bytes).map_err(ConversionError::Decode)?;

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(ConversionError::Encode)?;
    Ok(png)
}
