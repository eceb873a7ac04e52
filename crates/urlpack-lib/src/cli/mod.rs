mod args;
mod check;
mod fetch;
mod params;
mod resolved_command;

pub use args::{Args, Command, ConfigOverrides, parse_args};
pub use check::run_check;
pub use fetch::run_fetch;
pub use params::{CheckParams, FetchParams};
pub use resolved_command::{ResolvedCommand, resolve_command};
