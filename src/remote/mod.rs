// src/remote/mod.rs
//! Remote article service abstraction.
//!
//! `ArticleApi` is the seam between the core (paging, lookup, search) and the
//! network; `client::DevToClient` is the reqwest implementation, tests use stubs.

pub mod client;

use async_trait::async_trait;

use crate::error::{ApiError, Result};
use crate::model::{Article, ArticlePayload, User};

pub use client::DevToClient;

/// One paged listing endpoint of the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Latest,
    Popular,
    Tag(String),
    Username(String),
    Mine,
    MineUnpublished,
    MineAll,
}

impl Listing {
    pub fn path(&self) -> &'static str {
        match self {
            Listing::Latest => "/articles/latest",
            Listing::Popular | Listing::Tag(_) | Listing::Username(_) => "/articles",
            Listing::Mine => "/articles/me",
            Listing::MineUnpublished => "/articles/me/unpublished",
            Listing::MineAll => "/articles/me/all",
        }
    }

    /// Listings scoped to the caller's own corpus need the API key.
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Listing::Mine | Listing::MineUnpublished | Listing::MineAll
        )
    }

    pub fn filter(&self) -> Option<(&'static str, &str)> {
        match self {
            Listing::Tag(t) => Some(("tag", t.as_str())),
            Listing::Username(u) => Some(("username", u.as_str())),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Listing::Latest => "latest".into(),
            Listing::Popular => "popular".into(),
            Listing::Tag(t) => format!("tag '{t}'"),
            Listing::Username(u) => format!("user '{u}'"),
            Listing::Mine => "mine".into(),
            Listing::MineUnpublished => "mine/unpublished".into(),
            Listing::MineAll => "mine/all".into(),
        }
    }
}

/// Page coordinates for one listing call. `per_page = None` leaves the
/// remote default in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: Option<u32>,
}

impl PageRequest {
    pub fn first() -> Self {
        Self {
            page: 1,
            per_page: None,
        }
    }
}

/// Tagged result of a direct single-item lookup, so callers branch on
/// not-found explicitly instead of inspecting error payloads.
#[derive(Debug)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
    Failed(ApiError),
}

impl<T> Lookup<T> {
    pub fn from_result(r: Result<T>) -> Self {
        match r {
            Ok(v) => Lookup::Found(v),
            Err(e) if e.is_not_found() => Lookup::NotFound,
            Err(e) => Lookup::Failed(e),
        }
    }
}

#[async_trait]
pub trait ArticleApi: Send + Sync {
    /// Whether calls carry a credential.
    fn authenticated(&self) -> bool;

    async fn list(&self, listing: &Listing, page: PageRequest) -> Result<Vec<Article>>;

    async fn article(&self, id: &str) -> Lookup<Article>;

    async fn user_by_username(&self, username: &str) -> Result<User>;

    async fn create(&self, payload: &ArticlePayload) -> Result<Article>;

    async fn update(&self, id: &str, payload: &ArticlePayload) -> Result<Article>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_listings_need_auth() {
        assert!(Listing::MineAll.requires_auth());
        assert!(Listing::MineUnpublished.requires_auth());
        assert!(!Listing::Tag("rust".into()).requires_auth());
        assert_eq!(Listing::Username("ben".into()).filter(), Some(("username", "ben")));
        assert_eq!(Listing::Popular.path(), "/articles");
    }

    #[test]
    fn lookup_tags_not_found_separately() {
        let nf: Lookup<()> = Lookup::from_result(Err(ApiError::not_found("article", "1")));
        assert!(matches!(nf, Lookup::NotFound));
        let other: Lookup<()> = Lookup::from_result(Err(ApiError::Upstream {
            status: 500,
            message: "boom".into(),
        }));
        assert!(matches!(other, Lookup::Failed(ApiError::Upstream { status: 500, .. })));
    }
}
