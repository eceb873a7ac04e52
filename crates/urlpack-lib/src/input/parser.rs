use super::filename::sanitize_filename;
use super::types::RequestedItem;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid format in line {line_number}: {line}. Expected: url, name")]
    MissingSeparator { line_number: usize, line: String },

    #[error("Invalid URL in line {line_number}: {url}")]
    InvalidUrl { line_number: usize, url: String },

    #[error("Unsupported URL scheme in line {line_number}: {url}. Only http and https are supported")]
    UnsupportedScheme { line_number: usize, url: String },

    #[error("Empty file name in line {line_number}: {line}")]
    EmptyName { line_number: usize, line: String },
}

/// Parses `url, name` lines into items, in input order.
///
/// Blank lines are skipped. The name is everything after the first comma, so it may itself
/// contain commas. Any malformed line rejects the whole input.
pub fn parse_item_list(text: &str) -> Result<Vec<RequestedItem>, ParseError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| parse_line(index + 1, line))
        .collect()
}

fn parse_line(line_number: usize, line: &str) -> Result<RequestedItem, ParseError> {
    let (raw_url, raw_name) = line
        .split_once(',')
        .ok_or_else(|| ParseError::MissingSeparator {
            line_number,
            line: line.to_string(),
        })?;

    let raw_url = raw_url.trim();
    let url = Url::parse(raw_url).map_err(|_| ParseError::InvalidUrl {
        line_number,
        url: raw_url.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ParseError::UnsupportedScheme {
            line_number,
            url: raw_url.to_string(),
        });
    }

    let filename = sanitize_filename(raw_name.trim());
    if filename.is_empty() {
        return Err(ParseError::EmptyName {
            line_number,
            line: line.to_string(),
        });
    }

    Ok(RequestedItem::new(url, filename))
}
