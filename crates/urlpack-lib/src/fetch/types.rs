/// Body and declared `Content-Type` of one successful GET.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchResult {
    pub bytes: Vec<u8>,
    /// Raw header value, empty when the server sent none.
    pub content_type: String,
}

impl FetchResult {
    pub fn new(bytes: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
        }
    }
}
