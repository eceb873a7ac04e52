pub mod archive;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod input;
pub mod normalize;
pub mod report;

pub use config::Config;
pub use error::UrlPackError;
