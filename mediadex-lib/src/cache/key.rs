//! Cache keys and request parameters

use std::collections::BTreeMap;

/// A flat bag of request parameters with deterministic ordering.
///
/// Keys are kept sorted lexicographically, so bags built with the same
/// entries in any insertion order serialize identically and land in the same
/// cache slot.
///
/// # Example
///
/// ```
/// use mediadex_lib::cache::Params;
///
/// let params = Params::new().with("q", "naruto").with("page", 2);
/// assert_eq!(params.to_query_string(), "page=2&q=naruto");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: BTreeMap<String, String>,
}

impl Params {
    /// Creates an empty parameter bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.entries.insert(key.into(), value.to_string());
        self
    }

    /// Adds a parameter only when a value is present.
    pub fn with_opt(mut self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        if let Some(value) = value {
            self.entries.insert(key.into(), value.to_string());
        }
        self
    }

    /// Returns `true` if the bag holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Renders the bag as a percent-encoded query string, without a leading
    /// `?`.
    pub fn to_query_string(&self) -> String {
        self.entries
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Canonical JSON form used in cache keys.
    ///
    /// The underlying map serializes in key order, so the output is
    /// independent of insertion order.
    pub(crate) fn canonical_json(&self) -> String {
        serde_json::to_string(&self.entries).unwrap_or_default()
    }
}

/// Derives the cache slot key for an endpoint and its parameters.
pub(crate) fn cache_key(endpoint: &str, params: &Params) -> String {
    format!("{}?{}", endpoint, params.canonical_json())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_independent_of_insertion_order() {
        let a = Params::new().with("a", 1).with("b", 2);
        let b = Params::new().with("b", 2).with("a", 1);
        assert_eq!(cache_key("ep", &a), cache_key("ep", &b));
    }

    #[test]
    fn test_distinct_values_distinct_keys() {
        let a = Params::new().with("q", "naruto");
        let b = Params::new().with("q", "bleach");
        assert_ne!(cache_key("search", &a), cache_key("search", &b));
    }

    #[test]
    fn test_query_string_is_encoded() {
        let params = Params::new().with("q", "cowboy bebop").with("page", 1);
        assert_eq!(params.to_query_string(), "page=1&q=cowboy%20bebop");
    }

    #[test]
    fn test_with_opt_skips_absent_values() {
        let params = Params::new().with_opt("region", None::<&str>);
        assert!(params.is_empty());
        assert_eq!(cache_key("trending", &params), "trending?{}");
    }
}
