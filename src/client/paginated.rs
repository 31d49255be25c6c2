//! Transparent aggregation of paginated collections.
//!
//! Paginated endpoints advertise their pages in the `Link` response header:
//!
//! ```text
//! Link: <https://api.github.com/events?page=2>; rel="next",
//!       <https://api.github.com/events?page=10>; rel="last"
//! ```
//!
//! When a GET is made with [`Query::with_all_pages`], the first page is
//! fetched, the last page number is read from the `rel="last"` link and
//! every remaining page is fetched concurrently. Bodies are concatenated in
//! page order no matter which page arrives first.

use std::collections::BTreeMap;

use futures_util::{stream, StreamExt, TryStreamExt};
use serde_json::Value;
use url::Url;

use super::ClientInner;
use crate::models::{CachedResponse, Query, PAGE_PARAM};
use crate::{Error, Result};

/// Base used to resolve relative link targets.
const LINK_BASE: &str = "https://localhost/";

/// Parsed `Link` header: relation name to target URL.
///
/// # Example
///
/// ```
/// use libhub::client::PageLinks;
///
/// let links = PageLinks::parse(
///     r#"<https://api.github.com/events?page=2>; rel="next", <https://api.github.com/events?page=5>; rel="last""#,
/// ).unwrap();
///
/// assert_eq!(links.last_page().unwrap(), Some(5));
/// assert_eq!(links.page_of("next").unwrap(), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    links: BTreeMap<String, String>,
}

impl PageLinks {
    /// Parse a `Link` header value.
    ///
    /// Links without a `rel` parameter are ignored. A link that is not of
    /// the form `<target>; params` is an error.
    pub fn parse(header: &str) -> Result<Self> {
        let mut links = BTreeMap::new();

        for part in split_links(header) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let (target, params) = part
                .strip_prefix('<')
                .and_then(|rest| rest.split_once('>'))
                .ok_or_else(|| Error::Pagination(format!("Malformed link: {}", part)))?;

            for param in params.split(';') {
                let Some((name, value)) = param.split_once('=') else {
                    continue;
                };
                if !name.trim().eq_ignore_ascii_case("rel") {
                    continue;
                }
                for rel in value.trim().trim_matches('"').split_whitespace() {
                    links.insert(rel.to_ascii_lowercase(), target.trim().to_string());
                }
            }
        }

        Ok(Self { links })
    }

    /// Target of a relation (`next`, `prev`, `first`, `last`).
    pub fn get(&self, rel: &str) -> Option<&str> {
        self.links.get(&rel.to_ascii_lowercase()).map(String::as_str)
    }

    /// Returns `true` if no relation was found.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// The `page` parameter of a relation's target.
    ///
    /// `Ok(None)` when the relation is absent; an error when it is present
    /// but its target has no parsable `page` parameter.
    pub fn page_of(&self, rel: &str) -> Result<Option<u32>> {
        let Some(target) = self.get(rel) else {
            return Ok(None);
        };

        let url = Url::parse(LINK_BASE)?
            .join(target)
            .map_err(|e| Error::Pagination(format!("Invalid {} link {}: {}", rel, target, e)))?;

        let page = url
            .query_pairs()
            .find(|(name, _)| name == PAGE_PARAM)
            .ok_or_else(|| Error::Pagination(format!("No page in {} link: {}", rel, target)))?
            .1;

        page.parse::<u32>()
            .map(Some)
            .map_err(|_| Error::Pagination(format!("Invalid page in {} link: {}", rel, target)))
    }

    /// Number of the last page, if the header names one.
    pub fn last_page(&self) -> Result<Option<u32>> {
        self.page_of("last")
    }
}

/// Split a `Link` header on the commas that separate links, ignoring
/// commas inside `<...>` targets.
fn split_links(header: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_target = false;
    let mut start = 0;

    for (i, c) in header.char_indices() {
        match c {
            '<' => in_target = true,
            '>' => in_target = false,
            ',' if !in_target => {
                parts.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&header[start..]);
    parts
}

/// Fetch every page of a collection and concatenate the bodies.
pub(crate) async fn fetch_all_pages(inner: &ClientInner, path: &str, mut query: Query) -> Result<Value> {
    query.apply_page_defaults(inner.config.per_page);
    let first_page = query.page().unwrap_or(1);

    let first = inner.fetch(path, query.clone()).await?;
    let last_page = match first.link() {
        Some(header) => PageLinks::parse(header)?.last_page()?,
        None => None,
    };

    let Some(last_page) = last_page.filter(|last| *last > first_page) else {
        return Ok(first.body);
    };

    let remaining = (last_page - first_page) as usize;
    let limit = inner.config.page_concurrency.unwrap_or(remaining).max(1);
    tracing::debug!(path, first_page, last_page, limit, "Fetching remaining pages");

    let fetches = (first_page + 1..=last_page).map(move |page| {
        let mut page_query = query.clone();
        page_query.set_page(page);
        inner.fetch(path, page_query)
    });

    // `buffered` yields in input order regardless of completion order
    let pages: Vec<CachedResponse> = stream::iter(fetches).buffered(limit).try_collect().await?;

    Ok(pages
        .into_iter()
        .fold(first.body, |acc, page| concat_pages(acc, page.body)))
}

/// Append one page body to the accumulated collection.
///
/// Array pages are flattened into the collection; anything else is
/// appended as a single element.
fn concat_pages(acc: Value, page: Value) -> Value {
    let mut items = match acc {
        Value::Array(items) => items,
        other => vec![other],
    };
    match page {
        Value::Array(more) => items.extend(more),
        other => items.push(other),
    }
    Value::Array(items)
}
