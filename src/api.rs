// src/api.rs
//! REST surface plus the HTTP transport for MCP.

use std::sync::Arc;

use shuttle_axum::axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::error::{ApiError, Result};
use crate::mcp::McpHandler;
use crate::model::{ArticleChanges, NewArticle, TitleUpdate};
use crate::service::{ArticleService, PageParams};
use crate::shape::{ArticleDetail, ArticleSummary, UserProfile, WriteResult};

#[derive(Clone)]
pub struct AppState {
    service: Arc<ArticleService>,
    mcp: Arc<McpHandler>,
}

impl AppState {
    pub fn new(service: ArticleService) -> Self {
        let service = Arc::new(service);
        let mcp = Arc::new(McpHandler::new(Arc::clone(&service)));
        Self { service, mcp }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status()).unwrap_or(StatusCode::BAD_GATEWAY);
        if status.is_server_error() {
            tracing::warn!(target: "devto", status = status.as_u16(), error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

const ENDPOINTS: &[&str] = &[
    "GET /health",
    "GET /articles/latest",
    "GET /articles/popular",
    "GET /articles/search?q=",
    "GET /articles/by-title?title=",
    "PUT /articles/by-title",
    "POST /articles/by-title/publish",
    "POST /articles/by-title/unpublish",
    "GET /articles/tag/{tag}",
    "GET /articles/user/{username}",
    "GET /articles/{id}",
    "POST /articles",
    "PUT /articles/{id}",
    "POST /articles/{id}/publish",
    "POST /articles/{id}/unpublish",
    "GET /me/articles",
    "GET /me/articles/unpublished",
    "GET /me/articles/drafts",
    "GET /me/articles/scheduled",
    "GET /me/articles/all",
    "GET /users/{username}",
    "POST /mcp",
];

pub fn router(service: ArticleService) -> Router {
    create_router(AppState::new(service))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(info))
        .route("/health", get(health))
        .route("/articles", post(create_article))
        .route("/articles/latest", get(latest))
        .route("/articles/popular", get(popular))
        .route("/articles/search", get(search))
        .route("/articles/by-title", get(article_by_title).put(update_by_title))
        .route("/articles/by-title/publish", post(publish_by_title))
        .route("/articles/by-title/unpublish", post(unpublish_by_title))
        .route("/articles/tag/{tag}", get(by_tag))
        .route("/articles/user/{username}", get(by_user))
        .route("/articles/{id}", get(article).put(update_article))
        .route("/articles/{id}/publish", post(publish))
        .route("/articles/{id}/unpublish", post(unpublish))
        .route("/me/articles", get(my_published))
        .route("/me/articles/unpublished", get(my_unpublished))
        .route("/me/articles/drafts", get(my_drafts))
        .route("/me/articles/scheduled", get(my_scheduled))
        .route("/me/articles/all", get(my_all))
        .route("/users/{username}", get(user_profile))
        .route("/mcp", post(mcp))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "name": "devto-mcp",
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "version": env!("CARGO_PKG_VERSION"),
        "authenticated": state.service.authenticated(),
        "endpoints": ENDPOINTS,
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "devto-mcp",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ---- browsing ----

type Listing = Result<Json<Vec<ArticleSummary>>>;

async fn latest(State(s): State<AppState>, Query(p): Query<PageParams>) -> Listing {
    Ok(Json(s.service.browse_latest(p).await?))
}

async fn popular(State(s): State<AppState>, Query(p): Query<PageParams>) -> Listing {
    Ok(Json(s.service.browse_popular(p).await?))
}

async fn by_tag(
    State(s): State<AppState>,
    Path(tag): Path<String>,
    Query(p): Query<PageParams>,
) -> Listing {
    Ok(Json(s.service.browse_by_tag(&tag, p).await?))
}

async fn by_user(
    State(s): State<AppState>,
    Path(username): Path<String>,
    Query(p): Query<PageParams>,
) -> Listing {
    Ok(Json(s.service.articles_by_user(&username, p).await?))
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

// Page bounds come from a second extractor; serde_urlencoded cannot parse
// numbers through `#[serde(flatten)]`.
async fn search(
    State(s): State<AppState>,
    Query(sq): Query<SearchQuery>,
    Query(p): Query<PageParams>,
) -> Listing {
    Ok(Json(s.service.search(&sq.q, p).await?))
}

// ---- reading ----

#[derive(Deserialize)]
struct TitleQuery {
    #[serde(default)]
    title: String,
}

async fn article(State(s): State<AppState>, Path(id): Path<String>) -> Result<Json<ArticleDetail>> {
    Ok(Json(s.service.get_article(&id).await?))
}

async fn article_by_title(
    State(s): State<AppState>,
    Query(q): Query<TitleQuery>,
) -> Result<Json<ArticleDetail>> {
    Ok(Json(s.service.get_article_by_title(&q.title).await?))
}

async fn user_profile(
    State(s): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserProfile>> {
    Ok(Json(s.service.user_profile(&username).await?))
}

// ---- own articles ----

async fn my_published(State(s): State<AppState>, Query(p): Query<PageParams>) -> Listing {
    Ok(Json(s.service.list_mine(p).await?))
}

async fn my_unpublished(State(s): State<AppState>, Query(p): Query<PageParams>) -> Listing {
    Ok(Json(s.service.list_unpublished(p).await?))
}

async fn my_drafts(State(s): State<AppState>, Query(p): Query<PageParams>) -> Listing {
    Ok(Json(s.service.list_drafts(p).await?))
}

async fn my_scheduled(State(s): State<AppState>, Query(p): Query<PageParams>) -> Listing {
    Ok(Json(s.service.list_scheduled(p).await?))
}

async fn my_all(State(s): State<AppState>, Query(p): Query<PageParams>) -> Listing {
    Ok(Json(s.service.list_all_mine(p).await?))
}

// ---- writing ----

type Written = Result<Json<WriteResult>>;

async fn create_article(
    State(s): State<AppState>,
    Json(body): Json<NewArticle>,
) -> Result<(StatusCode, Json<WriteResult>)> {
    Ok((StatusCode::CREATED, Json(s.service.create(body).await?)))
}

async fn update_article(
    State(s): State<AppState>,
    Path(id): Path<String>,
    Json(changes): Json<ArticleChanges>,
) -> Written {
    Ok(Json(s.service.update(&id, changes).await?))
}

async fn update_by_title(State(s): State<AppState>, Json(body): Json<TitleUpdate>) -> Written {
    let (title, changes) = body.into_parts();
    Ok(Json(s.service.update_by_title(&title, changes).await?))
}

async fn publish(State(s): State<AppState>, Path(id): Path<String>) -> Written {
    Ok(Json(s.service.set_published(&id, true).await?))
}

async fn unpublish(State(s): State<AppState>, Path(id): Path<String>) -> Written {
    Ok(Json(s.service.set_published(&id, false).await?))
}

#[derive(Deserialize)]
struct TitleBody {
    title: String,
}

async fn publish_by_title(State(s): State<AppState>, Json(b): Json<TitleBody>) -> Written {
    Ok(Json(s.service.set_published_by_title(&b.title, true).await?))
}

async fn unpublish_by_title(State(s): State<AppState>, Json(b): Json<TitleBody>) -> Written {
    Ok(Json(s.service.set_published_by_title(&b.title, false).await?))
}

// ---- MCP over HTTP ----

async fn mcp(State(s): State<AppState>, body: String) -> Response {
    match s.mcp.handle_json(&body).await {
        Some(reply) => ([(header::CONTENT_TYPE, "application/json")], reply).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
