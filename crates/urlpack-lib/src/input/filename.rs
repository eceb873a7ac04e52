pub const MAX_FILENAME_LEN: usize = 100;

/// Collapses whitespace runs into `-`, drops everything outside `[A-Za-z0-9_.-]` and
/// truncates to [`MAX_FILENAME_LEN`] while keeping the final extension.
pub fn sanitize_filename(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                sanitized.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
            sanitized.push(c);
        }
    }

    truncate_preserving_extension(sanitized)
}

/// Shortens `filename` to [`MAX_FILENAME_LEN`], keeping its final extension when there is room.
pub fn truncate_preserving_extension(filename: String) -> String {
    if filename.len() <= MAX_FILENAME_LEN {
        return filename;
    }

    match filename.rfind('.') {
        Some(dot) => join_within_limit(&filename[..dot], &filename[dot..]),
        None => join_within_limit(&filename, ""),
    }
}

/// `stem` followed by `suffix`, cutting the stem so the result fits [`MAX_FILENAME_LEN`].
///
/// A suffix that cannot fit next to any stem is cut as well.
pub fn join_within_limit(stem: &str, suffix: &str) -> String {
    if suffix.len() >= MAX_FILENAME_LEN {
        let mut joined = format!("{stem}{suffix}");
        joined.truncate(floor_char_boundary(&joined, MAX_FILENAME_LEN));
        return joined;
    }

    let stem_end = floor_char_boundary(stem, MAX_FILENAME_LEN - suffix.len());
    format!("{}{suffix}", &stem[..stem_end])
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    let mut end = max.min(s.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    end
}
