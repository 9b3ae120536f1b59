// src/paging.rs
//! Sequential multi-page aggregation over a page-fetch capability.

use std::ops::ControlFlow;

use async_trait::async_trait;

use crate::error::{ApiError, Result};
use crate::metrics;
use crate::model::Article;
use crate::remote::{ArticleApi, Listing, PageRequest};

/// Narrow capability: fetch one page by number.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, page: u32) -> Result<Vec<Article>>;

    /// Used in log lines only.
    fn describe(&self) -> String {
        "listing".to_string()
    }
}

/// Page bounds for one traversal. Pages `start ..= start + max_pages - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub start: u32,
    pub per_page: u32,
    pub max_pages: u32,
}

impl PageQuery {
    pub fn new(start: u32, per_page: u32, max_pages: u32) -> Self {
        Self {
            start: start.max(1),
            per_page: per_page.max(1),
            max_pages,
        }
    }

    /// Last page number to visit, or `None` when there is nothing to visit.
    fn last_page(&self) -> Option<u32> {
        if self.max_pages == 0 {
            return None;
        }
        Some(self.start.saturating_add(self.max_pages - 1))
    }
}

#[derive(Debug)]
pub struct PageFailure {
    pub page: u32,
    pub error: ApiError,
}

/// Everything one traversal produced, including pages it had to skip.
#[derive(Debug, Default)]
pub struct Paged {
    pub items: Vec<Article>,
    pub failures: Vec<PageFailure>,
    /// Fetch attempts made, failed ones included.
    pub attempts: u32,
}

impl Paged {
    /// Skipped pages stay silent unless nothing at all came back.
    pub fn into_result(mut self) -> Result<Vec<Article>> {
        if self.items.is_empty() {
            if let Some(last) = self.failures.pop() {
                return Err(last.error);
            }
        }
        Ok(self.items)
    }
}

/// Walk pages in order, handing each non-empty page to `visit`.
///
/// Stops on the first empty page, after `max_pages`, or when `visit` breaks.
/// A failed fetch is logged, recorded and skipped; it is never retried.
pub async fn walk_pages<F, V>(fetcher: &F, query: PageQuery, mut visit: V) -> Paged
where
    F: PageFetcher + ?Sized,
    V: FnMut(Vec<Article>) -> ControlFlow<()>,
{
    let mut out = Paged::default();
    let Some(last) = query.last_page() else {
        return out;
    };

    let mut current = query.start;
    while current <= last {
        out.attempts += 1;
        match fetcher.fetch(current).await {
            Ok(items) if items.is_empty() => break,
            Ok(items) => {
                tracing::trace!(target: "devto", page = current, n = items.len(), "page fetched");
                if visit(items).is_break() {
                    break;
                }
            }
            Err(error) => {
                tracing::warn!(
                    target: "devto",
                    page = current,
                    listing = %fetcher.describe(),
                    error = %error,
                    "page fetch failed; skipping"
                );
                metrics::record_page_failure();
                out.failures.push(PageFailure {
                    page: current,
                    error,
                });
            }
        }
        if current == u32::MAX {
            break;
        }
        current += 1;
    }
    out
}

/// Concatenate every page in range.
pub async fn aggregate<F>(fetcher: &F, query: PageQuery) -> Paged
where
    F: PageFetcher + ?Sized,
{
    let mut items = Vec::new();
    let mut paged = walk_pages(fetcher, query, |page| {
        items.extend(page);
        ControlFlow::Continue(())
    })
    .await;
    paged.items = items;
    paged
}

/// Pages of one remote listing at a fixed page size.
pub struct ListingPages<'a> {
    api: &'a dyn ArticleApi,
    listing: Listing,
    per_page: Option<u32>,
}

impl<'a> ListingPages<'a> {
    pub fn new(api: &'a dyn ArticleApi, listing: Listing, per_page: Option<u32>) -> Self {
        Self {
            api,
            listing,
            per_page,
        }
    }
}

#[async_trait]
impl PageFetcher for ListingPages<'_> {
    async fn fetch(&self, page: u32) -> Result<Vec<Article>> {
        self.api
            .list(
                &self.listing,
                PageRequest {
                    page,
                    per_page: self.per_page,
                },
            )
            .await
    }

    fn describe(&self) -> String {
        self.listing.label()
    }
}
