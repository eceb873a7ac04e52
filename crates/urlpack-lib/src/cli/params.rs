use crate::config::Config;
use crate::input::RequestedItem;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FetchParams {
    pub app_config: Config,
    pub items: Vec<RequestedItem>,
    pub output_path: PathBuf,
    pub report_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct CheckParams {
    pub items: Vec<RequestedItem>,
}
