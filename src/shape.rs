// src/shape.rs
//! Response shaping: raw records → stable list/detail projections.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::model::{Article, ItemId, User};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleSummary {
    pub id: Option<ItemId>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub published_at: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_type: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub summary: ArticleSummary,
    pub body_markdown: Option<String>,
    pub body_html: Option<String>,
    pub content: Option<String>,
    pub comments_count: u64,
    pub public_reactions_count: u64,
    pub page_views_count: u64,
    pub scheduled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub name: String,
    pub username: String,
    pub bio: String,
    pub location: String,
    pub joined_at: String,
    pub twitter_username: String,
    pub github_username: String,
    pub website_url: String,
}

/// Outcome of a create/update call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteResult {
    pub title: Option<String>,
    pub id: Option<ItemId>,
    pub url: Option<String>,
    pub status: &'static str,
}

/// Absent or null flag counts as unpublished.
pub fn is_published(a: &Article) -> bool {
    a.published.unwrap_or(false)
}

/// Published with a `published_at` that sorts after `now` (ISO-8601, second precision).
/// A published record without a timestamp is not scheduled.
pub fn is_scheduled(a: &Article, now: DateTime<Utc>) -> bool {
    if !is_published(a) {
        return false;
    }
    let now_iso = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    a.published_at
        .as_deref()
        .is_some_and(|ts| ts > now_iso.as_str())
}

pub fn summary(a: &Article) -> ArticleSummary {
    ArticleSummary {
        id: a.id.clone(),
        title: a.title.clone(),
        url: a.url.clone(),
        published_at: a.published_at.clone(),
        description: a.description.clone(),
        tags: a.tag_names(),
        author: a.username().map(str::to_string),
        published: is_published(a),
        match_type: None,
    }
}

pub fn summaries(items: &[Article]) -> Vec<ArticleSummary> {
    items.iter().map(summary).collect()
}

pub fn detail(a: &Article, now: DateTime<Utc>) -> ArticleDetail {
    let content = a
        .body_markdown
        .clone()
        .filter(|s| !s.is_empty())
        .or_else(|| a.body_html.clone());
    ArticleDetail {
        summary: summary(a),
        body_markdown: a.body_markdown.clone(),
        body_html: a.body_html.clone(),
        content,
        comments_count: a.comments_count.unwrap_or(0),
        public_reactions_count: a.public_reactions_count.unwrap_or(0),
        page_views_count: a.page_views_count.unwrap_or(0),
        scheduled: is_scheduled(a, now),
    }
}

pub fn profile(u: &User) -> UserProfile {
    let s = |v: &Option<String>| v.clone().unwrap_or_default();
    UserProfile {
        name: u.name.clone().unwrap_or_else(|| "Unknown".to_string()),
        username: u.username.clone().unwrap_or_else(|| "unknown".to_string()),
        bio: u
            .summary
            .clone()
            .unwrap_or_else(|| "No bio available.".to_string()),
        location: s(&u.location),
        joined_at: s(&u.joined_at),
        twitter_username: s(&u.twitter_username),
        github_username: s(&u.github_username),
        website_url: s(&u.website_url),
    }
}

pub fn write_result(a: &Article) -> WriteResult {
    WriteResult {
        title: a.title.clone(),
        id: a.id.clone(),
        url: a.url.clone(),
        status: if is_published(a) { "Published" } else { "Draft" },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArticleUser, TagList};
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn iso(t: DateTime<Utc>) -> String {
        t.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    #[test]
    fn missing_flag_is_unpublished() {
        let a = Article::default();
        assert!(!is_published(&a));
        assert!(!summary(&a).published);
    }

    #[test]
    fn one_second_ahead_is_scheduled() {
        let now = fixed_now();
        let future = Article {
            published: Some(true),
            published_at: Some(iso(now + Duration::seconds(1))),
            ..Article::default()
        };
        let past = Article {
            published_at: Some(iso(now - Duration::seconds(1))),
            ..future.clone()
        };
        assert!(is_scheduled(&future, now));
        assert!(!is_scheduled(&past, now));
    }

    #[test]
    fn unpublished_or_untimed_is_never_scheduled() {
        let now = fixed_now();
        let draft = Article {
            published: Some(false),
            published_at: Some(iso(now + Duration::days(3))),
            ..Article::default()
        };
        let untimed = Article {
            published: Some(true),
            ..Article::default()
        };
        assert!(!is_scheduled(&draft, now));
        assert!(!is_scheduled(&untimed, now));
    }

    #[test]
    fn detail_prefers_markdown_for_content() {
        let a = Article {
            id: Some(ItemId::Number(7)),
            title: Some("T".into()),
            body_markdown: Some("# md".into()),
            body_html: Some("<h1>md</h1>".into()),
            tag_list: Some(TagList::Csv("a, b,c".into())),
            user: Some(ArticleUser {
                username: Some("ferris".into()),
                name: None,
            }),
            ..Article::default()
        };
        let d = detail(&a, fixed_now());
        assert_eq!(d.content.as_deref(), Some("# md"));
        assert_eq!(d.summary.tags, vec!["a", "b", "c"]);
        assert_eq!(d.summary.author.as_deref(), Some("ferris"));

        let html_only = Article {
            body_markdown: None,
            ..a
        };
        assert_eq!(
            detail(&html_only, fixed_now()).content.as_deref(),
            Some("<h1>md</h1>")
        );
    }

    #[test]
    fn detail_serializes_flat() {
        let a: Article = serde_json::from_value(json!({
            "id": 3, "title": "x", "published": true, "body_markdown": "b"
        }))
        .unwrap();
        let v = serde_json::to_value(detail(&a, fixed_now())).unwrap();
        assert_eq!(v["id"], json!(3));
        assert_eq!(v["content"], json!("b"));
        assert_eq!(v["published"], json!(true));
        assert!(v.get("match_type").is_none());
    }

    #[test]
    fn write_result_reports_draft_or_published() {
        let mut a = Article::default();
        assert_eq!(write_result(&a).status, "Draft");
        a.published = Some(true);
        assert_eq!(write_result(&a).status, "Published");
    }
}
