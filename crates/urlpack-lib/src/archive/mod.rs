mod builder;
mod names;

pub use builder::{ArchiveError, build_archive};
pub use names::EntryNames;
