// tests/common/mod.rs
//
// In-memory ArticleApi stub shared by the integration tests.
// Listings are keyed by `Listing::label()`; every call is recorded so tests
// can assert on fetch counts (early exit, no remote call before auth, ...).

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;

use devto_mcp::config::PagingDefaults;
use devto_mcp::error::{ApiError, Result};
use devto_mcp::model::{Article, ArticlePayload, ArticleUser, ItemId, User};
use devto_mcp::remote::{ArticleApi, Listing, Lookup, PageRequest};
use devto_mcp::service::ArticleService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(String, u32),
    Article(String),
    User(String),
    Create,
    Update(String),
}

#[derive(Default)]
pub struct StubApi {
    pub authed: bool,
    listings: HashMap<String, Vec<Vec<Article>>>,
    failing: HashSet<(String, u32)>,
    direct: HashMap<String, Article>,
    direct_error: Option<u16>,
    users: HashMap<String, User>,
    pub calls: Mutex<Vec<Call>>,
    pub payloads: Mutex<Vec<serde_json::Value>>,
}

impl StubApi {
    pub fn new(authed: bool) -> Self {
        Self {
            authed,
            ..Self::default()
        }
    }

    /// Pages for `listing`, page 1 first. Pages past the end come back empty.
    pub fn with_pages(mut self, listing: Listing, pages: Vec<Vec<Article>>) -> Self {
        self.listings.insert(listing.label(), pages);
        self
    }

    pub fn failing_page(mut self, listing: Listing, page: u32) -> Self {
        self.failing.insert((listing.label(), page));
        self
    }

    /// Visible to the direct by-id lookup.
    pub fn with_public(mut self, a: Article) -> Self {
        let id = a.id_string().unwrap_or_default();
        self.direct.insert(id, a);
        self
    }

    /// Direct lookups fail with this upstream status instead of 404.
    pub fn direct_fails_with(mut self, status: u16) -> Self {
        self.direct_error = Some(status);
        self
    }

    pub fn with_user(mut self, u: User) -> Self {
        let name = u.username.clone().unwrap_or_default();
        self.users.insert(name, u);
        self
    }

    pub fn into_service(self) -> (Arc<StubApi>, ArticleService) {
        let api = Arc::new(self);
        let svc = ArticleService::new(api.clone(), paging()).with_clock(fixed_now);
        (api, svc)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn list_calls(&self, listing: &Listing) -> Vec<u32> {
        let label = listing.label();
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                Call::List(l, p) if *l == label => Some(*p),
                _ => None,
            })
            .collect()
    }

    fn record(&self, c: Call) {
        self.calls.lock().push(c);
    }

    fn echo(&self, id: u64, payload: &ArticlePayload) -> Article {
        let v = serde_json::to_value(payload).unwrap_or_default();
        self.payloads.lock().push(v.clone());
        let fields = &v["article"];
        Article {
            id: Some(ItemId::Number(id)),
            title: fields["title"].as_str().map(str::to_string),
            published: fields["published"].as_bool(),
            url: Some(format!("https://dev.to/stub/{id}")),
            ..Article::default()
        }
    }
}

#[async_trait]
impl ArticleApi for StubApi {
    fn authenticated(&self) -> bool {
        self.authed
    }

    async fn list(&self, listing: &Listing, page: PageRequest) -> Result<Vec<Article>> {
        let label = listing.label();
        self.record(Call::List(label.clone(), page.page));
        if listing.requires_auth() && !self.authed {
            return Err(ApiError::AuthMissing);
        }
        if self.failing.contains(&(label.clone(), page.page)) {
            return Err(ApiError::Upstream {
                status: 503,
                message: "stub outage".into(),
            });
        }
        Ok(self
            .listings
            .get(&label)
            .and_then(|pages| pages.get(page.page as usize - 1))
            .cloned()
            .unwrap_or_default())
    }

    async fn article(&self, id: &str) -> Lookup<Article> {
        self.record(Call::Article(id.to_string()));
        if let Some(status) = self.direct_error {
            return Lookup::Failed(ApiError::Upstream {
                status,
                message: "stub failure".into(),
            });
        }
        match self.direct.get(id) {
            Some(a) => Lookup::Found(a.clone()),
            None => Lookup::NotFound,
        }
    }

    async fn user_by_username(&self, username: &str) -> Result<User> {
        self.record(Call::User(username.to_string()));
        self.users
            .get(username)
            .cloned()
            .ok_or_else(|| ApiError::not_found("user", username))
    }

    async fn create(&self, payload: &ArticlePayload) -> Result<Article> {
        self.record(Call::Create);
        Ok(self.echo(999, payload))
    }

    async fn update(&self, id: &str, payload: &ArticlePayload) -> Result<Article> {
        self.record(Call::Update(id.to_string()));
        let n = id.parse().unwrap_or(0);
        Ok(self.echo(n, payload))
    }
}

pub fn paging() -> PagingDefaults {
    PagingDefaults {
        per_page: 10,
        max_pages: 5,
        search_max_pages: 5,
        owned_per_page: 10,
        owned_max_pages: 5,
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn article(id: u64, title: &str) -> Article {
    Article {
        id: Some(ItemId::Number(id)),
        title: Some(title.to_string()),
        published: Some(true),
        user: Some(ArticleUser {
            username: Some("author".into()),
            name: None,
        }),
        url: Some(format!("https://dev.to/author/{id}")),
        ..Article::default()
    }
}

pub fn draft(id: u64, title: &str) -> Article {
    Article {
        published: Some(false),
        ..article(id, title)
    }
}

pub fn page_of(start_id: u64, n: u64, prefix: &str) -> Vec<Article> {
    (start_id..start_id + n)
        .map(|i| article(i, &format!("{prefix} {i}")))
        .collect()
}
