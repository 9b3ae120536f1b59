// src/service.rs
//! Article operations shared by the REST and MCP surfaces.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::instrument;

use crate::config::PagingDefaults;
use crate::error::{ApiError, Result};
use crate::model::{Article, ArticleChanges, ArticlePayload, NewArticle};
use crate::paging::{aggregate, ListingPages, PageQuery};
use crate::remote::{ArticleApi, Listing};
use crate::resolve::Resolver;
use crate::search::keyword_scan;
use crate::shape::{self, ArticleDetail, ArticleSummary, UserProfile, WriteResult};

const MAX_PER_PAGE: i64 = 1000;

/// Caller-supplied page bounds; missing values fall back to `PagingDefaults`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub per_page: Option<i64>,
    #[serde(default)]
    pub max_pages: Option<i64>,
}

impl PageParams {
    /// Negative `max_pages` means "visit nothing".
    pub fn resolve(&self, per_page: u32, max_pages: u32) -> PageQuery {
        let clamp_u32 = |v: i64| u32::try_from(v.max(0)).unwrap_or(u32::MAX);
        PageQuery::new(
            clamp_u32(self.page.unwrap_or(1)),
            clamp_u32(
                self.per_page
                    .map(|n| n.clamp(1, MAX_PER_PAGE))
                    .unwrap_or(i64::from(per_page)),
            ),
            self.max_pages.map(clamp_u32).unwrap_or(max_pages),
        )
    }
}

pub type Clock = fn() -> DateTime<Utc>;

#[derive(Clone)]
pub struct ArticleService {
    api: Arc<dyn ArticleApi>,
    paging: PagingDefaults,
    clock: Clock,
}

impl ArticleService {
    pub fn new(api: Arc<dyn ArticleApi>, paging: PagingDefaults) -> Self {
        Self {
            api,
            paging,
            clock: Utc::now,
        }
    }

    /// Replace the time source used for the scheduled flag.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn authenticated(&self) -> bool {
        self.api.authenticated()
    }

    fn require_auth(&self) -> Result<()> {
        if self.api.authenticated() {
            Ok(())
        } else {
            Err(ApiError::AuthMissing)
        }
    }

    fn default_query(&self, p: PageParams) -> PageQuery {
        p.resolve(self.paging.per_page, self.paging.max_pages)
    }

    fn resolver(&self) -> Resolver<'_> {
        let owned = PageQuery::new(1, self.paging.owned_per_page, self.paging.owned_max_pages);
        let search = PageQuery::new(1, self.paging.per_page, self.paging.search_max_pages);
        Resolver::new(self.api.as_ref(), owned, search)
    }

    async fn collect(&self, listing: Listing, q: PageQuery) -> Result<Vec<Article>> {
        let pages = ListingPages::new(self.api.as_ref(), listing, Some(q.per_page));
        aggregate(&pages, q).await.into_result()
    }

    // ---- browsing ----

    #[instrument(target = "devto", skip(self))]
    pub async fn browse_latest(&self, p: PageParams) -> Result<Vec<ArticleSummary>> {
        let items = self.collect(Listing::Latest, self.default_query(p)).await?;
        Ok(shape::summaries(&items))
    }

    #[instrument(target = "devto", skip(self))]
    pub async fn browse_popular(&self, p: PageParams) -> Result<Vec<ArticleSummary>> {
        let items = self.collect(Listing::Popular, self.default_query(p)).await?;
        Ok(shape::summaries(&items))
    }

    #[instrument(target = "devto", skip(self))]
    pub async fn browse_by_tag(&self, tag: &str, p: PageParams) -> Result<Vec<ArticleSummary>> {
        let tag = non_empty(tag, "tag")?;
        let items = self
            .collect(Listing::Tag(tag.to_string()), self.default_query(p))
            .await?;
        Ok(shape::summaries(&items))
    }

    #[instrument(target = "devto", skip(self))]
    pub async fn articles_by_user(
        &self,
        username: &str,
        p: PageParams,
    ) -> Result<Vec<ArticleSummary>> {
        let username = non_empty(username, "username")?;
        let q = p.resolve(self.paging.per_page, self.paging.search_max_pages);
        let items = self.collect(Listing::Username(username.to_string()), q).await?;
        Ok(shape::summaries(&items))
    }

    /// Keyword scan; see `search::keyword_scan` for the early-exit rule.
    #[instrument(target = "devto", skip(self))]
    pub async fn search(&self, query: &str, p: PageParams) -> Result<Vec<ArticleSummary>> {
        non_empty(query, "query")?;
        let q = p.resolve(self.paging.per_page, self.paging.search_max_pages);
        let pages = ListingPages::new(self.api.as_ref(), Listing::Popular, Some(q.per_page));
        let hits = keyword_scan(self.api.as_ref(), &pages, query, q)
            .await
            .into_result()?;
        Ok(hits
            .iter()
            .map(|a| ArticleSummary {
                match_type: Some("search_result"),
                ..shape::summary(a)
            })
            .collect())
    }

    // ---- reading ----

    #[instrument(target = "devto", skip(self))]
    pub async fn get_article(&self, id: &str) -> Result<ArticleDetail> {
        let id = non_empty(id, "id")?;
        let a = self.resolver().by_id(id).await?;
        Ok(shape::detail(&a, (self.clock)()))
    }

    #[instrument(target = "devto", skip(self))]
    pub async fn get_article_by_title(&self, title: &str) -> Result<ArticleDetail> {
        let a = self.resolver().by_title(title).await?;
        Ok(shape::detail(&a, (self.clock)()))
    }

    #[instrument(target = "devto", skip(self))]
    pub async fn user_profile(&self, username: &str) -> Result<UserProfile> {
        let username = non_empty(username, "username")?;
        let u = self.api.user_by_username(username).await?;
        Ok(shape::profile(&u))
    }

    // ---- the caller's own articles ----

    #[instrument(target = "devto", skip(self))]
    pub async fn list_mine(&self, p: PageParams) -> Result<Vec<ArticleSummary>> {
        self.require_auth()?;
        let items = self.collect(Listing::Mine, self.default_query(p)).await?;
        Ok(shape::summaries(&items))
    }

    #[instrument(target = "devto", skip(self))]
    pub async fn list_unpublished(&self, p: PageParams) -> Result<Vec<ArticleSummary>> {
        self.require_auth()?;
        let items = self
            .collect(Listing::MineUnpublished, self.default_query(p))
            .await?;
        Ok(shape::summaries(&items))
    }

    #[instrument(target = "devto", skip(self))]
    pub async fn list_all_mine(&self, p: PageParams) -> Result<Vec<ArticleSummary>> {
        self.require_auth()?;
        let items = self.collect(Listing::MineAll, self.default_query(p)).await?;
        Ok(shape::summaries(&items))
    }

    /// Drafts: every owned article whose published flag is false or absent.
    #[instrument(target = "devto", skip(self))]
    pub async fn list_drafts(&self, p: PageParams) -> Result<Vec<ArticleSummary>> {
        self.require_auth()?;
        let items = self.collect(Listing::MineAll, self.default_query(p)).await?;
        Ok(items
            .iter()
            .filter(|a| !shape::is_published(a))
            .map(shape::summary)
            .collect())
    }

    #[instrument(target = "devto", skip(self))]
    pub async fn list_scheduled(&self, p: PageParams) -> Result<Vec<ArticleSummary>> {
        self.require_auth()?;
        let items = self.collect(Listing::MineAll, self.default_query(p)).await?;
        let now = (self.clock)();
        Ok(items
            .iter()
            .filter(|a| shape::is_scheduled(a, now))
            .map(shape::summary)
            .collect())
    }

    // ---- writing ----

    #[instrument(target = "devto", skip(self, new), fields(title = %new.title))]
    pub async fn create(&self, new: NewArticle) -> Result<WriteResult> {
        self.require_auth()?;
        non_empty(&new.title, "title")?;
        let created = self.api.create(&ArticlePayload::from(&new)).await?;
        tracing::info!(target: "devto", id = ?created.id, "article created");
        Ok(shape::write_result(&created))
    }

    #[instrument(target = "devto", skip(self, changes))]
    pub async fn update(&self, id: &str, changes: ArticleChanges) -> Result<WriteResult> {
        self.require_auth()?;
        let id = non_empty(id, "id")?;
        if changes.is_empty() {
            return Err(ApiError::InvalidInput("no changes given".into()));
        }
        let updated = self.api.update(id, &ArticlePayload::from(&changes)).await?;
        tracing::info!(target: "devto", id, "article updated");
        Ok(shape::write_result(&updated))
    }

    #[instrument(target = "devto", skip(self, changes))]
    pub async fn update_by_title(
        &self,
        title: &str,
        changes: ArticleChanges,
    ) -> Result<WriteResult> {
        self.require_auth()?;
        if changes.is_empty() {
            return Err(ApiError::InvalidInput("no changes given".into()));
        }
        let target = self.resolver().by_title(title).await?;
        let id = target
            .id_string()
            .ok_or_else(|| ApiError::not_found("article id for title", title.trim()))?;
        self.update(&id, changes).await
    }

    pub async fn set_published(&self, id: &str, published: bool) -> Result<WriteResult> {
        self.update(id, ArticleChanges::publish(published)).await
    }

    pub async fn set_published_by_title(
        &self,
        title: &str,
        published: bool,
    ) -> Result<WriteResult> {
        self.update_by_title(title, ArticleChanges::publish(published))
            .await
    }
}

fn non_empty<'a>(v: &'a str, field: &str) -> Result<&'a str> {
    let v = v.trim();
    if v.is_empty() {
        Err(ApiError::InvalidInput(format!("{field} must not be empty")))
    } else {
        Ok(v)
    }
}
