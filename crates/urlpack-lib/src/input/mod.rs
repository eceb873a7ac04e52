//! Turns the user's `url, name` list into validated items.

mod filename;
mod parser;
mod types;

pub use filename::{
    MAX_FILENAME_LEN, join_within_limit, sanitize_filename, truncate_preserving_extension,
};
pub use parser::{ParseError, parse_item_list};
pub use types::RequestedItem;
