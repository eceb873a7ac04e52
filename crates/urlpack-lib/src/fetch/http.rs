use super::error::FetchError;
use super::types::FetchResult;
use crate::config::FetchConfig;
use crate::error::UrlPackError;
use reqwest::header::CONTENT_TYPE;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// A single GET with no retries. Implemented by [`HttpFetcher`] and by test doubles.
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchResult, FetchError>> + Send;
}

/// Answers whether the host currently has network access.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AssumeOnline;

impl Connectivity for AssumeOnline {
    fn is_online(&self) -> bool {
        true
    }
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    connectivity: Arc<dyn Connectivity>,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, UrlPackError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            connectivity: Arc::new(AssumeOnline),
        })
    }

    pub fn with_connectivity(mut self, connectivity: Arc<dyn Connectivity>) -> Self {
        self.connectivity = connectivity;
        self
    }
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchResult, FetchError> {
        if !self.connectivity.is_online() {
            return Err(FetchError::network("No internet connection"));
        }

        tracing::trace!(url = %url, "Sending request");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let bytes = response.bytes().await.map_err(classify_reqwest_error)?;
        tracing::trace!(url = %url, size = bytes.len(), content_type = %content_type, "Received response");

        Ok(FetchResult::new(bytes.to_vec(), content_type))
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::network(err.to_string())
    }
}
