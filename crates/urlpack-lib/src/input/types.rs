use url::Url;

/// One requested `url, name` pair, validated and with a sanitized name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestedItem {
    pub url: Url,
    pub filename: String,
}

impl RequestedItem {
    pub fn new(url: Url, filename: impl Into<String>) -> Self {
        Self {
            url,
            filename: filename.into(),
        }
    }
}
