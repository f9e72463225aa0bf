//! Client configuration supplied by the embedding application.

/// Default maximum number of items the client accepts per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Configuration for `StoreClient`: where the backend lives, which headers
/// every request must carry (authentication/session context), and the page
/// size the paginated endpoints are expected to honor.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub default_headers: Vec<(String, String)>,
    pub page_size: usize,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            default_headers: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}
