use super::media_type;
use super::transcode::CANONICAL_EXTENSION;
use crate::input::{join_within_limit, truncate_preserving_extension};

/// Final archive entry name for an item.
///
/// Converted content always gets the canonical extension. Otherwise a name without any
/// `.` gets the content type's subtype as its extension. The result never exceeds
/// [`MAX_FILENAME_LEN`](crate::input::MAX_FILENAME_LEN); the stem is shortened to make room.
pub fn resolve_filename(requested: &str, content_type: &str, was_converted: bool) -> String {
    if was_converted && !has_canonical_extension(requested) {
        return join_within_limit(
            strip_extension(requested),
            &format!(".{CANONICAL_EXTENSION}"),
        );
    }

    if !requested.contains('.') {
        let media_type = media_type(content_type);
        let subtype = media_type
            .split_once('/')
            .map(|(_, subtype)| subtype)
            .filter(|subtype| !subtype.is_empty());
        if let Some(subtype) = subtype {
            return join_within_limit(requested, &format!(".{subtype}"));
        }
    }

    truncate_preserving_extension(requested.to_string())
}

fn has_canonical_extension(filename: &str) -> bool {
    filename
        .to_ascii_lowercase()
        .ends_with(&format!(".{CANONICAL_EXTENSION}"))
}

fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(dot) if dot + 1 < filename.len() && !filename[dot..].contains('/') => &filename[..dot],
        _ => filename,
    }
}
