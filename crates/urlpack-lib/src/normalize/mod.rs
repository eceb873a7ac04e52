//! Image transcoding to the canonical format and archive entry naming.

mod filename;
mod transcode;

pub use filename::resolve_filename;
pub use transcode::{
    CANONICAL_CONTENT_TYPE, CANONICAL_EXTENSION, ConversionError, Normalization,
    NormalizedContent, normalize_content,
};

/// Lowercased `type/subtype` of a `Content-Type` value, without parameters.
pub fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_drops_parameters_and_case() {
        assert_eq!(media_type("Image/JPEG; charset=binary"), "image/jpeg");
        assert_eq!(media_type(" text/plain "), "text/plain");
        assert_eq!(media_type(""), "");
    }
}
