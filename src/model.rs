// src/model.rs
//! Wire records of the Dev.to API and the write payloads we send back.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Dev.to hands out numeric ids; callers of both surfaces may pass strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{n}"),
            ItemId::Text(s) => f.write_str(s.trim()),
        }
    }
}

impl From<u64> for ItemId {
    fn from(n: u64) -> Self {
        ItemId::Number(n)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::Text(s.to_string())
    }
}

/// Tags arrive either as a JSON array or as `"a, b, c"` depending on endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagList {
    List(Vec<String>),
    Csv(String),
}

impl TagList {
    /// Ordered, trimmed, non-empty tag names.
    pub fn normalized(&self) -> Vec<String> {
        match self {
            TagList::List(items) => clean_tags(items.iter().map(String::as_str)),
            TagList::Csv(s) => split_tags(s),
        }
    }
}

/// Split a comma-separated tag string.
pub fn split_tags(s: &str) -> Vec<String> {
    clean_tags(s.split(','))
}

fn clean_tags<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Loosely typed article record; every field may be missing or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub id: Option<ItemId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub body_markdown: Option<String>,
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default)]
    pub published: Option<bool>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub tag_list: Option<TagList>,
    #[serde(default)]
    pub tags: Option<TagList>,
    #[serde(default)]
    pub user: Option<ArticleUser>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub canonical_url: Option<String>,
    #[serde(default)]
    pub comments_count: Option<u64>,
    #[serde(default)]
    pub public_reactions_count: Option<u64>,
    #[serde(default)]
    pub page_views_count: Option<u64>,
}

impl Article {
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(ItemId::to_string)
    }

    pub fn title_str(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.username.as_deref())
    }

    /// `tag_list` wins; `tags` is consulted only when `tag_list` is absent.
    pub fn tag_names(&self) -> Vec<String> {
        self.tag_list
            .as_ref()
            .or(self.tags.as_ref())
            .map(TagList::normalized)
            .unwrap_or_default()
    }
}

/// Public profile as returned by `/users/by_username`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub joined_at: Option<String>,
    #[serde(default)]
    pub twitter_username: Option<String>,
    #[serde(default)]
    pub github_username: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
}

/// Input for `create_article`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    /// Comma-separated, e.g. `"rust,webdev"`.
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub published: Option<bool>,
}

/// Partial update; `None` fields are left untouched remotely.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleChanges {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub published: Option<bool>,
}

impl ArticleChanges {
    pub fn publish(published: bool) -> Self {
        Self {
            published: Some(published),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.tags.is_none()
            && self.published.is_none()
    }
}

/// Update addressed by current title; `new_title` renames.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleUpdate {
    pub title: String,
    #[serde(default)]
    pub new_title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub published: Option<bool>,
}

impl TitleUpdate {
    pub fn into_parts(self) -> (String, ArticleChanges) {
        let changes = ArticleChanges {
            title: self.new_title,
            content: self.content,
            tags: self.tags,
            published: self.published,
        };
        (self.title, changes)
    }
}

/// Body sent to `POST /articles` and `PUT /articles/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct ArticlePayload {
    pub article: ArticleFields,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ArticleFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_markdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl From<&NewArticle> for ArticlePayload {
    fn from(a: &NewArticle) -> Self {
        Self {
            article: ArticleFields {
                title: Some(a.title.clone()),
                body_markdown: Some(a.content.clone()),
                published: Some(a.published.unwrap_or(false)),
                tags: Some(a.tags.as_deref().map(split_tags).unwrap_or_default()),
            },
        }
    }
}

impl From<&ArticleChanges> for ArticlePayload {
    fn from(c: &ArticleChanges) -> Self {
        Self {
            article: ArticleFields {
                title: c.title.clone(),
                body_markdown: c.content.clone(),
                published: c.published,
                tags: c.tags.as_deref().map(split_tags),
            },
        }
    }
}
