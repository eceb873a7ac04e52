use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub fetch: FetchConfig,
    pub retry: RetryConfig,
    pub batch: BatchConfig,
    /// Ordered alternate routes tried after the direct request fails.
    pub access_paths: Vec<AccessPathDef>,
    /// Use the built-in access path list when `access_paths` is empty.
    pub use_default_access_paths: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            retry: RetryConfig::default(),
            batch: BatchConfig::default(),
            access_paths: Vec::new(),
            use_default_access_paths: true,
        }
    }
}

impl Config {
    /// Access paths in priority order, falling back to the built-in list when none are configured.
    pub fn effective_access_paths(&self) -> Vec<AccessPathDef> {
        if !self.access_paths.is_empty() {
            self.access_paths.clone()
        } else if self.use_default_access_paths {
            AccessPathDef::defaults()
        } else {
            Vec::new()
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: concat!("urlpack/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct BatchConfig {
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AccessPathDef {
    pub name: String,
    /// URL template; `{url}` is replaced by the target URL, `{encoded_url}` by its percent-encoded form.
    pub template: String,
}

impl AccessPathDef {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
        }
    }

    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("corsproxy", "https://corsproxy.io/?{encoded_url}"),
            Self::new("allorigins", "https://api.allorigins.win/raw?url={encoded_url}"),
            Self::new("cors-anywhere", "https://cors-anywhere.herokuapp.com/{url}"),
            Self::new("crossorigin", "https://crossorigin.me/{url}"),
        ]
    }
}
