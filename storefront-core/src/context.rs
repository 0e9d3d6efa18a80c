use serde::{Deserialize, Serialize};

/// The storefront tenant serving the current request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreContext {
    pub store_id: String,
    /// Public base URL, always ending with `/`.
    pub store_url: String,
}

impl StoreContext {
    pub fn new(store_id: impl Into<String>, store_url: impl Into<String>) -> Self {
        let mut store_url = store_url.into();
        if !store_url.ends_with('/') {
            store_url.push('/');
        }
        Self {
            store_id: store_id.into(),
            store_url,
        }
    }
}

/// Per-request state: which store, which customer, which language.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkContext {
    pub store: StoreContext,
    pub customer_id: String,
    pub working_language_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_url_gets_trailing_slash() {
        let store = StoreContext::new("store-1", "https://shop.example.com");
        assert_eq!(store.store_url, "https://shop.example.com/");

        let store = StoreContext::new("store-1", "https://shop.example.com/");
        assert_eq!(store.store_url, "https://shop.example.com/");
    }
}
