use super::error::AggregateFetchError;
use super::http::Fetch;
use super::types::FetchResult;
use crate::config::AccessPathDef;
use crate::error::UrlPackError;
use url::Url;
use url::form_urlencoded::byte_serialize;

const RAW_PLACEHOLDER: &str = "{url}";
const ENCODED_PLACEHOLDER: &str = "{encoded_url}";

/// An intermediary route to a URL, e.g. a CORS proxy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessPath {
    name: String,
    template: String,
}

impl AccessPath {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Result<Self, UrlPackError> {
        let name = name.into();
        let template = template.into();
        if !template.contains(RAW_PLACEHOLDER) && !template.contains(ENCODED_PLACEHOLDER) {
            return Err(UrlPackError::AccessPath {
                name,
                reason: format!(
                    "template must contain {RAW_PLACEHOLDER} or {ENCODED_PLACEHOLDER}"
                ),
            });
        }
        Ok(Self { name, template })
    }

    pub fn from_defs(defs: &[AccessPathDef]) -> Result<Vec<Self>, UrlPackError> {
        defs.iter()
            .map(|def| Self::new(def.name.clone(), def.template.clone()))
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rewrite(&self, target: &Url) -> Result<Url, url::ParseError> {
        let encoded: String = byte_serialize(target.as_str().as_bytes()).collect();
        let rewritten = self
            .template
            .replace(ENCODED_PLACEHOLDER, &encoded)
            .replace(RAW_PLACEHOLDER, target.as_str());
        Url::parse(&rewritten)
    }
}

/// Tries the URL directly, then each access path in priority order, returning the first success.
#[derive(Debug)]
pub struct FallbackRouter<F> {
    fetcher: F,
    access_paths: Vec<AccessPath>,
}

impl<F: Fetch> FallbackRouter<F> {
    pub fn new(fetcher: F, access_paths: Vec<AccessPath>) -> Self {
        Self {
            fetcher,
            access_paths,
        }
    }

    pub fn direct_only(fetcher: F) -> Self {
        Self::new(fetcher, Vec::new())
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub async fn resolve(&self, url: &Url) -> Result<FetchResult, AggregateFetchError> {
        let direct = match self.fetcher.fetch(url).await {
            Ok(result) => return Ok(result),
            Err(err) => err,
        };
        tracing::warn!(url = %url, error = %direct, "Direct download failed");

        let mut attempts = 1;
        for path in &self.access_paths {
            let routed = match path.rewrite(url) {
                Ok(routed) => routed,
                Err(err) => {
                    tracing::warn!(access_path = path.name(), error = %err, "Access path produced an invalid URL");
                    continue;
                }
            };

            attempts += 1;
            tracing::debug!(url = %url, access_path = path.name(), "Trying access path");
            match self.fetcher.fetch(&routed).await {
                Ok(result) => {
                    tracing::info!(url = %url, access_path = path.name(), "Download through access path succeeded");
                    return Ok(result);
                }
                Err(err) => {
                    tracing::warn!(url = %url, access_path = path.name(), error = %err, "Access path failed");
                }
            }
        }

        Err(AggregateFetchError {
            url: url.to_string(),
            direct,
            attempts,
        })
    }
}
