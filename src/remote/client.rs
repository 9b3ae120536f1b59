// src/remote/client.rs
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;

use super::{ArticleApi, Listing, Lookup, PageRequest};
use crate::config::RemoteConfig;
use crate::error::{ApiError, Result};
use crate::metrics;
use crate::model::{Article, ArticlePayload, User};

/// Upstream error bodies are echoed back to callers; keep them short.
const MAX_ERROR_BODY: usize = 300;

/// reqwest-backed Dev.to client. One instance per process, shared behind `Arc`.
pub struct DevToClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl DevToClient {
    pub fn new(cfg: &RemoteConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("devto-mcp/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(cfg.timeout_secs.clamp(1, 4)))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|source| ApiError::Transport {
                path: "client initialization".to_string(),
                source,
            })?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone().filter(|k| !k.trim().is_empty()),
        })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&ArticlePayload>,
        what: &'static str,
        key: &str,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self
            .http
            .request(method.clone(), &url)
            .header(header::ACCEPT, "application/json");
        if let Some(k) = &self.api_key {
            req = req.header("api-key", k);
        }
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(b) = body {
            req = req.json(b);
        }

        let t0 = Instant::now();
        let resp = match req.send().await {
            Ok(r) => r,
            Err(source) => {
                metrics::record_request(method.as_str(), "transport_error", t0.elapsed());
                tracing::warn!(target: "devto", %method, path, error = %source, "remote call failed");
                return Err(ApiError::Transport {
                    path: path.to_string(),
                    source,
                });
            }
        };
        let status = resp.status();
        let text = resp.text().await.map_err(|source| ApiError::Transport {
            path: path.to_string(),
            source,
        })?;
        metrics::record_request(method.as_str(), status.as_str(), t0.elapsed());
        tracing::debug!(
            target: "devto",
            %method,
            path,
            status = status.as_u16(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "remote call"
        );

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::not_found(what, key));
        }
        if !status.is_success() {
            return Err(ApiError::Upstream {
                status: status.as_u16(),
                message: upstream_message(status, &text),
            });
        }
        serde_json::from_str(&text).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    fn require_key(&self) -> Result<()> {
        if self.api_key.is_none() {
            return Err(ApiError::AuthMissing);
        }
        Ok(())
    }
}

/// Dev.to errors look like `{"error": "...", "status": 422}`; fall back to raw text.
fn upstream_message(status: StatusCode, text: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string));
    let msg = from_json.unwrap_or_else(|| text.trim().to_string());
    if msg.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string();
    }
    msg.chars().take(MAX_ERROR_BODY).collect()
}

/// Ids are interpolated into the path, so only plain tokens are allowed.
fn check_id(id: &str) -> Result<&str> {
    let id = id.trim();
    let ok = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(id)
    } else {
        Err(ApiError::InvalidInput(format!("invalid article id '{id}'")))
    }
}

#[async_trait]
impl ArticleApi for DevToClient {
    fn authenticated(&self) -> bool {
        self.api_key.is_some()
    }

    async fn list(&self, listing: &Listing, page: PageRequest) -> Result<Vec<Article>> {
        if listing.requires_auth() {
            self.require_key()?;
        }
        let mut query = vec![("page", page.page.to_string())];
        if let Some(n) = page.per_page {
            query.push(("per_page", n.to_string()));
        }
        if let Some((k, v)) = listing.filter() {
            query.push((k, v.to_string()));
        }
        self.send(
            Method::GET,
            listing.path(),
            &query,
            None,
            "listing",
            &listing.label(),
        )
        .await
    }

    async fn article(&self, id: &str) -> Lookup<Article> {
        let id = match check_id(id) {
            Ok(id) => id,
            Err(e) => return Lookup::Failed(e),
        };
        let path = format!("/articles/{id}");
        Lookup::from_result(self.send(Method::GET, &path, &[], None, "article", id).await)
    }

    async fn user_by_username(&self, username: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ApiError::InvalidInput("username must not be empty".into()));
        }
        self.send(
            Method::GET,
            "/users/by_username",
            &[("url", username.to_string())],
            None,
            "user",
            username,
        )
        .await
    }

    async fn create(&self, payload: &ArticlePayload) -> Result<Article> {
        self.require_key()?;
        self.send(Method::POST, "/articles", &[], Some(payload), "article", "new")
            .await
    }

    async fn update(&self, id: &str, payload: &ArticlePayload) -> Result<Article> {
        self.require_key()?;
        let id = check_id(id)?;
        let path = format!("/articles/{id}");
        self.send(Method::PUT, &path, &[], Some(payload), "article", id)
            .await
    }
}
