//! Query parameters for API requests.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::Result;

/// Query parameter carrying the page number.
pub const PAGE_PARAM: &str = "page";
/// Query parameter carrying the page size.
pub const PER_PAGE_PARAM: &str = "per_page";

/// Query parameters attached to a request.
///
/// Parameters are kept sorted by name so that the serialized form is
/// deterministic. The `all_pages` flag is not a wire parameter: it asks
/// [`HubClient::get`](crate::HubClient::get) to aggregate every page of a
/// paginated collection and never reaches the server or the cache key.
///
/// # Example
///
/// ```
/// use libhub::Query;
///
/// let query = Query::new()
///     .param("state", "open")
///     .param("per_page", 50)
///     .with_all_pages(true);
///
/// assert_eq!(query.per_page(), Some(50));
/// assert!(query.is_all_pages());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    params: BTreeMap<String, Value>,
    all_pages: bool,
}

impl Query {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, builder style.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Request aggregation of every page of the collection.
    pub fn with_all_pages(mut self, all_pages: bool) -> Self {
        self.all_pages = all_pages;
        self
    }

    /// Whether every page should be aggregated.
    pub fn is_all_pages(&self) -> bool {
        self.all_pages
    }

    /// Set a parameter, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.params.insert(key.into(), value.into());
    }

    /// Set a parameter unless it already holds a truthy value.
    ///
    /// Missing, `null`, `false`, `0` and `""` are all replaced.
    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) {
        if self.params.get(key).map_or(true, is_falsy) {
            self.params.insert(key.to_string(), value.into());
        }
    }

    /// Get a parameter.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Remove a parameter, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.params.remove(key)
    }

    /// Returns `true` if the parameter is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Number of wire parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if there are no wire parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate over parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.params.iter()
    }

    /// The current page number, if one is set and numeric.
    pub fn page(&self) -> Option<u32> {
        self.params.get(PAGE_PARAM).and_then(as_u32)
    }

    /// Override the page number.
    pub fn set_page(&mut self, page: u32) {
        self.set(PAGE_PARAM, page);
    }

    /// The page size, if one is set and numeric.
    pub fn per_page(&self) -> Option<u32> {
        self.params.get(PER_PAGE_PARAM).and_then(as_u32)
    }

    /// Apply pagination defaults: `page` to 1 and `per_page` to `per_page`.
    pub fn apply_page_defaults(&mut self, per_page: u32) {
        self.set_default(PAGE_PARAM, 1);
        self.set_default(PER_PAGE_PARAM, per_page);
    }

    /// Name/value pairs as sent on the wire. `null` parameters are omitted.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .filter_map(|(k, v)| wire_value(v).map(|v| (k.clone(), v)))
            .collect()
    }

    /// Deterministic serialization used in cache keys.
    pub fn to_cache_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.params)?)
    }
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            all_pages: false,
        }
    }
}

impl From<Map<String, Value>> for Query {
    fn from(params: Map<String, Value>) -> Self {
        Self {
            params: params.into_iter().collect(),
            all_pages: false,
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn as_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn wire_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(wire_value)
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_defaults() {
        let mut query = Query::new();
        query.apply_page_defaults(100);
        assert_eq!(query.page(), Some(1));
        assert_eq!(query.per_page(), Some(100));
    }

    #[test]
    fn test_page_defaults_keep_caller_values() {
        let mut query = Query::new().param("page", 3).param("per_page", 10);
        query.apply_page_defaults(100);
        assert_eq!(query.page(), Some(3));
        assert_eq!(query.per_page(), Some(10));
    }

    #[test]
    fn test_page_defaults_replace_falsy_values() {
        let mut query = Query::new().param("page", 0).param("per_page", "");
        query.apply_page_defaults(100);
        assert_eq!(query.page(), Some(1));
        assert_eq!(query.per_page(), Some(100));
    }

    #[test]
    fn test_numeric_strings() {
        let query = Query::new().param("page", "7");
        assert_eq!(query.page(), Some(7));
    }

    #[test]
    fn test_to_pairs() {
        let query = Query::new()
            .param("state", "open")
            .param("page", 2)
            .param("draft", false)
            .param("labels", json!(["bug", "ui"]))
            .param("since", Value::Null);

        assert_eq!(
            query.to_pairs(),
            vec![
                ("draft".to_string(), "false".to_string()),
                ("labels".to_string(), "bug,ui".to_string()),
                ("page".to_string(), "2".to_string()),
                ("state".to_string(), "open".to_string()),
            ]
        );
    }

    #[test]
    fn test_from_iter() {
        let query: Query = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(query.len(), 2);
        assert!(!query.is_all_pages());
        assert_eq!(query.get("b"), Some(&json!(2)));
    }

    #[test]
    fn test_cache_string_is_sorted() {
        let query = Query::new().param("z", 1).param("a", "x");
        assert_eq!(query.to_cache_string().unwrap(), r#"{"a":"x","z":1}"#);
    }
}
