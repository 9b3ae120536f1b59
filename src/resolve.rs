// src/resolve.rs
//! Fallback resolution for lookups the remote API cannot answer directly.
//!
//! Unpublished articles are invisible to the public endpoints and there is no
//! lookup-by-title, so both degrade to a linear scan of the caller's own
//! articles (`/articles/me/all`). That scan costs one request per page.

use std::ops::ControlFlow;

use crate::error::{ApiError, Result};
use crate::metrics;
use crate::model::Article;
use crate::paging::{walk_pages, ListingPages, PageFetcher, PageQuery};
use crate::remote::{ArticleApi, Listing, Lookup};
use crate::search::keyword_scan;

pub struct Resolver<'a> {
    api: &'a dyn ArticleApi,
    owned: PageQuery,
    search: PageQuery,
}

impl<'a> Resolver<'a> {
    /// `owned` bounds the scan of the caller's articles, `search` the keyword scan.
    pub fn new(api: &'a dyn ArticleApi, owned: PageQuery, search: PageQuery) -> Self {
        Self { api, owned, search }
    }

    /// Direct lookup, then the owned-corpus scan on not-found only.
    pub async fn by_id(&self, id: &str) -> Result<Article> {
        let target = id.trim();
        match self.api.article(target).await {
            Lookup::Found(a) => return Ok(a),
            Lookup::Failed(e) => return Err(e),
            Lookup::NotFound => {}
        }
        if !self.api.authenticated() {
            return Err(ApiError::not_found("article", target));
        }

        metrics::record_fallback_scan("id");
        tracing::info!(target: "devto", id = target, "direct lookup 404; scanning own articles");
        self.first_owned(|a| a.id_string().as_deref() == Some(target))
            .await
            .ok_or_else(|| ApiError::not_found("article", target))
    }

    /// Keyword scan for an exact title, then a case-insensitive scan of the
    /// caller's own articles.
    pub async fn by_title(&self, title: &str) -> Result<Article> {
        let target = title.trim();
        if target.is_empty() {
            return Err(ApiError::InvalidInput("title must not be empty".into()));
        }

        let popular = ListingPages::new(self.api, Listing::Popular, Some(self.search.per_page));
        let scan = keyword_scan(self.api, &popular, target, self.search).await;
        if let Some(hit) = scan.items.into_iter().find(|a| a.title.as_deref() == Some(target)) {
            return Ok(hit);
        }
        if !self.api.authenticated() {
            return Err(ApiError::not_found("article", target));
        }

        metrics::record_fallback_scan("title");
        tracing::info!(target: "devto", title = target, "no exact public match; scanning own articles");
        let lowered = target.to_lowercase();
        self.first_owned(|a| a.title_str().to_lowercase() == lowered)
            .await
            .ok_or_else(|| ApiError::not_found("article", target))
    }

    /// First owned article satisfying `pred`; stops fetching once found.
    async fn first_owned<P>(&self, pred: P) -> Option<Article>
    where
        P: Fn(&Article) -> bool + Send + Sync,
    {
        let pages = ListingPages::new(self.api, Listing::MineAll, Some(self.owned.per_page));
        first_match(&pages, self.owned, pred).await
    }
}

pub(crate) async fn first_match<F, P>(pages: &F, bounds: PageQuery, pred: P) -> Option<Article>
where
    F: PageFetcher + ?Sized,
    P: Fn(&Article) -> bool + Send + Sync,
{
    let mut hit = None;
    walk_pages(pages, bounds, |page| {
        hit = page.into_iter().find(&pred);
        if hit.is_some() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .await;
    hit
}
