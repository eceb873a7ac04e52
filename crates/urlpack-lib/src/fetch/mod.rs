//! Single-attempt HTTP fetching, alternate access paths and retry with backoff.
//!
//! The layers compose from the inside out: [`HttpFetcher`] performs one GET,
//! [`FallbackRouter`] walks the direct URL and then every configured access path,
//! and [`with_retry`] restarts the whole router sequence with exponential backoff.

mod error;
mod fallback;
mod http;
mod retry;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{AggregateFetchError, FetchError};
pub use fallback::{AccessPath, FallbackRouter};
pub use http::{AssumeOnline, Connectivity, Fetch, HttpFetcher};
pub use retry::{RetryPolicy, with_retry};
pub use types::FetchResult;
