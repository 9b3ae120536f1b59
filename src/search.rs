// src/search.rs
//! Keyword scan over paged listings, with tag/username fallbacks.
//!
//! The scan stops at the first page that yields any match. Results are "the
//! first page with a hit", not every match across the range.

use std::ops::ControlFlow;

use crate::model::Article;
use crate::paging::{walk_pages, PageFetcher, PageQuery, Paged};
use crate::remote::{ArticleApi, Listing, PageRequest};

/// Case-insensitive substring test across title, description, tags,
/// username and markdown body. `needle` must already be lowercase.
pub fn matches(a: &Article, needle: &str) -> bool {
    let has = |s: Option<&str>| s.is_some_and(|s| s.to_lowercase().contains(needle));
    has(a.title.as_deref())
        || has(a.description.as_deref())
        || a.tag_names().iter().any(|t| t.to_lowercase().contains(needle))
        || has(a.username())
        || has(a.body_markdown.as_deref())
}

/// Scan `pages` until the first page with a match, then fall back to the
/// tag and username filters.
///
/// The returned `Paged` carries the hits plus the listing-page failures;
/// fallback failures are logged and dropped. The username fallback is only
/// tried when the raw query has no whitespace at all.
pub async fn keyword_scan<F>(
    api: &dyn ArticleApi,
    pages: &F,
    query: &str,
    bounds: PageQuery,
) -> Paged
where
    F: PageFetcher + ?Sized,
{
    let needle = query.to_lowercase();
    if needle.trim().is_empty() {
        return Paged::default();
    }

    let mut found = Vec::new();
    let mut paged = walk_pages(pages, bounds, |page| {
        found.extend(page.into_iter().filter(|a| matches(a, &needle)));
        if found.is_empty() {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    })
    .await;
    tracing::debug!(
        target: "devto",
        query,
        pages = paged.attempts,
        hits = found.len(),
        "keyword scan"
    );

    if found.is_empty() {
        let tag = needle.trim().to_string();
        match api.list(&Listing::Tag(tag), PageRequest::first()).await {
            Ok(items) => found.extend(items),
            Err(e) => tracing::debug!(target: "devto", error = %e, "tag fallback failed"),
        }
    }

    if found.is_empty() && !query.contains(char::is_whitespace) {
        match api
            .list(&Listing::Username(needle.clone()), PageRequest::first())
            .await
        {
            Ok(items) => found.extend(items),
            Err(e) => tracing::debug!(target: "devto", error = %e, "username fallback failed"),
        }
    }

    paged.items = found;
    paged
}
