// src/mcp/tools.rs
//! Tool table: name, description, input schema and the service call behind it.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ApiError, Result};
use crate::model::{ArticleChanges, ItemId, NewArticle, TitleUpdate};
use crate::service::{ArticleService, PageParams};

pub type ToolFuture = Pin<Box<dyn Future<Output = Result<Value>> + Send>>;

pub struct ToolDef {
    pub name: &'static str,
    pub description: &'static str,
    schema: fn() -> Value,
    run: fn(Arc<ArticleService>, Value) -> ToolFuture,
}

impl ToolDef {
    pub fn input_schema(&self) -> Value {
        (self.schema)()
    }

    pub fn execute(&self, svc: Arc<ArticleService>, args: Value) -> ToolFuture {
        (self.run)(svc, args)
    }

    pub fn listing(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema(),
        })
    }
}

// ---- argument shapes ----

#[derive(Deserialize)]
struct TagArgs {
    tag: String,
    #[serde(flatten)]
    page: PageParams,
}

#[derive(Deserialize)]
struct UserArgs {
    username: String,
    #[serde(flatten)]
    page: PageParams,
}

#[derive(Deserialize)]
struct QueryArgs {
    query: String,
    #[serde(flatten)]
    page: PageParams,
}

#[derive(Deserialize)]
struct IdArgs {
    id: ItemId,
}

#[derive(Deserialize)]
struct ArticleIdArgs {
    article_id: ItemId,
}

#[derive(Deserialize)]
struct TitleArgs {
    title: String,
}

#[derive(Deserialize)]
struct UsernameArgs {
    username: String,
}

#[derive(Deserialize)]
struct UpdateArgs {
    id: ItemId,
    #[serde(flatten)]
    changes: ArticleChanges,
}

fn parse<T: DeserializeOwned>(args: Value) -> Result<T> {
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args).map_err(|e| ApiError::InvalidInput(e.to_string()))
}

fn to_json<T: Serialize>(v: T) -> Result<Value> {
    Ok(serde_json::to_value(v).unwrap_or(Value::Null))
}

// ---- schemas ----

fn page_props(default_max: u32) -> Value {
    json!({
        "page": { "type": "integer", "description": "Starting page number for pagination", "default": 1 },
        "per_page": { "type": "integer", "description": "Number of articles per page", "default": 30 },
        "max_pages": { "type": "integer", "description": "Maximum number of pages to search", "default": default_max }
    })
}

fn object(props: Value, required: &[&str]) -> Value {
    json!({ "type": "object", "properties": props, "required": required })
}

fn with_pages(mut props: Value, default_max: u32) -> Value {
    if let (Some(map), Value::Object(pages)) = (props.as_object_mut(), page_props(default_max)) {
        map.extend(pages);
    }
    props
}

fn paged_schema() -> Value {
    object(page_props(10), &[])
}

fn id_schema() -> Value {
    object(
        json!({ "id": { "type": ["string", "integer"], "description": "The ID of the article" } }),
        &["id"],
    )
}

fn title_schema() -> Value {
    object(
        json!({ "title": { "type": "string", "description": "Exact title of the article" } }),
        &["title"],
    )
}

fn change_props() -> Value {
    json!({
        "content": { "type": "string", "description": "New markdown content" },
        "tags": { "type": "string", "description": "New comma-separated list of tags" },
        "published": { "type": "boolean", "description": "New publish status" }
    })
}

fn merge(mut a: Value, b: Value) -> Value {
    if let (Some(map), Value::Object(extra)) = (a.as_object_mut(), b) {
        map.extend(extra);
    }
    a
}

// ---- the table ----

pub fn all() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "browse_latest_articles",
            description: "Get the most recent articles from Dev.to across multiple pages.",
            schema: paged_schema,
            run: |svc, args| {
                Box::pin(async move { to_json(svc.browse_latest(parse(args)?).await?) })
            },
        },
        ToolDef {
            name: "browse_popular_articles",
            description: "Get the most popular articles from Dev.to across multiple pages.",
            schema: paged_schema,
            run: |svc, args| {
                Box::pin(async move { to_json(svc.browse_popular(parse(args)?).await?) })
            },
        },
        ToolDef {
            name: "browse_articles_by_tag",
            description: "Get articles with a specific tag across multiple pages.",
            schema: || {
                object(
                    with_pages(
                        json!({ "tag": { "type": "string", "description": "The tag to filter articles by" } }),
                        10,
                    ),
                    &["tag"],
                )
            },
            run: |svc, args| {
                Box::pin(async move {
                    let a: TagArgs = parse(args)?;
                    to_json(svc.browse_by_tag(&a.tag, a.page).await?)
                })
            },
        },
        ToolDef {
            name: "search_articles_by_user",
            description: "Get all articles published by a specific Dev.to user.",
            schema: || {
                object(
                    with_pages(
                        json!({ "username": { "type": "string", "description": "The Dev.to username" } }),
                        30,
                    ),
                    &["username"],
                )
            },
            run: |svc, args| {
                Box::pin(async move {
                    let a: UserArgs = parse(args)?;
                    to_json(svc.articles_by_user(&a.username, a.page).await?)
                })
            },
        },
        ToolDef {
            name: "search_articles",
            description: "Search Dev.to articles by keyword in title, description, tags, author \
                          or body. Stops at the first page that has any match, so results are \
                          not exhaustive; falls back to tag and username filters.",
            schema: || {
                object(
                    with_pages(
                        json!({ "query": { "type": "string", "description": "The search term" } }),
                        30,
                    ),
                    &["query"],
                )
            },
            run: |svc, args| {
                Box::pin(async move {
                    let a: QueryArgs = parse(args)?;
                    to_json(svc.search(&a.query, a.page).await?)
                })
            },
        },
        ToolDef {
            name: "get_article",
            description: "Get a specific article by ID. Unpublished articles are found by \
                          scanning your own articles, one request per page.",
            schema: id_schema,
            run: |svc, args| {
                Box::pin(async move {
                    let a: IdArgs = parse(args)?;
                    to_json(svc.get_article(&a.id.to_string()).await?)
                })
            },
        },
        ToolDef {
            name: "get_article_by_id",
            description: "Get a specific article by ID (string version).",
            schema: || {
                object(
                    json!({ "article_id": { "type": "string", "description": "The ID of the article to retrieve" } }),
                    &["article_id"],
                )
            },
            run: |svc, args| {
                Box::pin(async move {
                    let a: ArticleIdArgs = parse(args)?;
                    to_json(svc.get_article(&a.article_id.to_string()).await?)
                })
            },
        },
        ToolDef {
            name: "get_article_by_title",
            description: "Get an article by its exact title. Searches public articles first, \
                          then scans all of your own articles (slow for large accounts).",
            schema: title_schema,
            run: |svc, args| {
                Box::pin(async move {
                    let a: TitleArgs = parse(args)?;
                    to_json(svc.get_article_by_title(&a.title).await?)
                })
            },
        },
        ToolDef {
            name: "get_user_profile",
            description: "Get profile information for a Dev.to user.",
            schema: || {
                object(
                    json!({ "username": { "type": "string", "description": "The username of the Dev.to user" } }),
                    &["username"],
                )
            },
            run: |svc, args| {
                Box::pin(async move {
                    let a: UsernameArgs = parse(args)?;
                    to_json(svc.user_profile(&a.username).await?)
                })
            },
        },
        ToolDef {
            name: "list_my_articles",
            description: "List your published articles across multiple pages.",
            schema: paged_schema,
            run: |svc, args| Box::pin(async move { to_json(svc.list_mine(parse(args)?).await?) }),
        },
        ToolDef {
            name: "list_my_unpublished_articles",
            description: "List your unpublished articles across multiple pages.",
            schema: paged_schema,
            run: |svc, args| {
                Box::pin(async move { to_json(svc.list_unpublished(parse(args)?).await?) })
            },
        },
        ToolDef {
            name: "list_all_my_articles",
            description: "List all of your articles, published or not.",
            schema: paged_schema,
            run: |svc, args| {
                Box::pin(async move { to_json(svc.list_all_mine(parse(args)?).await?) })
            },
        },
        ToolDef {
            name: "list_my_draft_articles",
            description: "List your draft (unpublished) articles.",
            schema: paged_schema,
            run: |svc, args| Box::pin(async move { to_json(svc.list_drafts(parse(args)?).await?) }),
        },
        ToolDef {
            name: "list_my_scheduled_articles",
            description: "List your articles scheduled for future publication.",
            schema: paged_schema,
            run: |svc, args| {
                Box::pin(async move { to_json(svc.list_scheduled(parse(args)?).await?) })
            },
        },
        ToolDef {
            name: "create_article",
            description: "Create a new article on Dev.to.",
            schema: || {
                object(
                    json!({
                        "title": { "type": "string", "description": "The title of the article" },
                        "content": { "type": "string", "description": "The markdown content of the article" },
                        "tags": { "type": "string", "description": "Comma-separated list of tags (e.g., 'python,webdev')", "default": "" },
                        "published": { "type": "boolean", "description": "Whether to publish immediately", "default": false }
                    }),
                    &["title", "content"],
                )
            },
            run: |svc, args| {
                Box::pin(async move {
                    let a: NewArticle = parse(args)?;
                    to_json(svc.create(a).await?)
                })
            },
        },
        ToolDef {
            name: "update_article",
            description: "Update an existing article on Dev.to.",
            schema: || {
                object(
                    merge(
                        json!({
                            "id": { "type": ["string", "integer"], "description": "The ID of the article to update" },
                            "title": { "type": "string", "description": "New title for the article" }
                        }),
                        change_props(),
                    ),
                    &["id"],
                )
            },
            run: |svc, args| {
                Box::pin(async move {
                    let a: UpdateArgs = parse(args)?;
                    to_json(svc.update(&a.id.to_string(), a.changes).await?)
                })
            },
        },
        ToolDef {
            name: "update_article_by_title",
            description: "Update an article found by its exact title.",
            schema: || {
                object(
                    merge(
                        json!({
                            "title": { "type": "string", "description": "Current title of the article" },
                            "new_title": { "type": "string", "description": "New title for the article" }
                        }),
                        change_props(),
                    ),
                    &["title"],
                )
            },
            run: |svc, args| {
                Box::pin(async move {
                    let (title, changes) = parse::<TitleUpdate>(args)?.into_parts();
                    to_json(svc.update_by_title(&title, changes).await?)
                })
            },
        },
        ToolDef {
            name: "publish_article",
            description: "Publish an article by ID.",
            schema: id_schema,
            run: |svc, args| {
                Box::pin(async move {
                    let a: IdArgs = parse(args)?;
                    to_json(svc.set_published(&a.id.to_string(), true).await?)
                })
            },
        },
        ToolDef {
            name: "unpublish_article",
            description: "Unpublish an article by ID.",
            schema: id_schema,
            run: |svc, args| {
                Box::pin(async move {
                    let a: IdArgs = parse(args)?;
                    to_json(svc.set_published(&a.id.to_string(), false).await?)
                })
            },
        },
        ToolDef {
            name: "publish_article_by_title",
            description: "Publish an article found by its exact title.",
            schema: title_schema,
            run: |svc, args| {
                Box::pin(async move {
                    let a: TitleArgs = parse(args)?;
                    to_json(svc.set_published_by_title(&a.title, true).await?)
                })
            },
        },
        ToolDef {
            name: "unpublish_article_by_title",
            description: "Unpublish an article found by its exact title.",
            schema: title_schema,
            run: |svc, args| {
                Box::pin(async move {
                    let a: TitleArgs = parse(args)?;
                    to_json(svc.set_published_by_title(&a.title, false).await?)
                })
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique_and_schemas_are_objects() {
        let tools = all();
        let names: HashSet<_> = tools.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), tools.len());
        for t in &tools {
            assert_eq!(t.input_schema()["type"], "object", "{}", t.name);
        }
    }

    #[test]
    fn paged_tools_expose_page_bounds() {
        let tools = all();
        let by_tag = tools
            .iter()
            .find(|t| t.name == "browse_articles_by_tag")
            .unwrap();
        let schema = by_tag.input_schema();
        assert!(schema["properties"]["max_pages"].is_object());
        assert_eq!(schema["required"], json!(["tag"]));
    }

    #[test]
    fn bad_arguments_become_invalid_input() {
        let err = parse::<IdArgs>(json!({ "nope": 1 })).err().unwrap();
        assert_eq!(err.status(), 400);
        let p: PageParams = parse(Value::Null).unwrap();
        assert!(p.page.is_none());
    }
}
