// src/mcp/prompts.rs
//! Prompt templates offered through `prompts/list` and `prompts/get`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PromptArg {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PromptDef {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: &'static [PromptArg],
}

const fn req(name: &'static str, description: &'static str) -> PromptArg {
    PromptArg {
        name,
        description,
        required: true,
    }
}

const fn opt(name: &'static str, description: &'static str) -> PromptArg {
    PromptArg {
        name,
        description,
        required: false,
    }
}

const ARTICLE_ID: PromptArg = req("article_id", "Dev.to article id");
const ID: PromptArg = req("id", "Dev.to article id");
const TITLE: PromptArg = req("title", "Exact article title");
const USERNAME: PromptArg = req("username", "Dev.to username");
const PAGE: PromptArg = opt("page", "Starting page (default 1)");
const PER_PAGE: PromptArg = opt("per_page", "Articles per page (default 30)");
const CHANGES: [PromptArg; 4] = [
    opt("new_title", "New title"),
    opt("content", "New markdown content"),
    opt("tags", "New comma-separated tags"),
    opt("published", "true to publish, false to keep as draft"),
];

pub const PROMPTS: &[PromptDef] = &[
    PromptDef {
        name: "get_article_prompt",
        description: "Fetch an article by id and summarize it",
        arguments: &[ARTICLE_ID],
    },
    PromptDef {
        name: "get_article_by_id_prompt",
        description: "Fetch an article by id and summarize it",
        arguments: &[ARTICLE_ID],
    },
    PromptDef {
        name: "get_article_by_title_prompt",
        description: "Fetch an article by title and summarize it",
        arguments: &[req("article_title", "Exact article title")],
    },
    PromptDef {
        name: "list_my_articles_prompt",
        description: "List your published articles",
        arguments: &[PAGE, PER_PAGE],
    },
    PromptDef {
        name: "list_my_draft_articles_prompt",
        description: "List your draft articles",
        arguments: &[PAGE, PER_PAGE],
    },
    PromptDef {
        name: "list_my_unpublished_articles_prompt",
        description: "List your unpublished articles",
        arguments: &[PAGE, PER_PAGE],
    },
    PromptDef {
        name: "list_my_scheduled_articles_prompt",
        description: "List your scheduled articles",
        arguments: &[PAGE, PER_PAGE],
    },
    PromptDef {
        name: "create_article_prompt",
        description: "Create a new article",
        arguments: &[
            req("title", "Article title"),
            req("content", "Markdown content"),
            opt("tags", "Comma-separated tags"),
            opt("published", "true to publish immediately"),
        ],
    },
    PromptDef {
        name: "update_article_prompt",
        description: "Update an article by id",
        arguments: &[
            ID,
            opt("title", "New title"),
            CHANGES[1],
            CHANGES[2],
            CHANGES[3],
        ],
    },
    PromptDef {
        name: "update_article_by_title_prompt",
        description: "Update an article found by title",
        arguments: &[TITLE, CHANGES[0], CHANGES[1], CHANGES[2], CHANGES[3]],
    },
    PromptDef {
        name: "delete_article_prompt",
        description: "Delete an article by id",
        arguments: &[ID],
    },
    PromptDef {
        name: "publish_article_prompt",
        description: "Publish an article by id",
        arguments: &[ARTICLE_ID],
    },
    PromptDef {
        name: "publish_article_by_title_prompt",
        description: "Publish an article found by title",
        arguments: &[TITLE],
    },
    PromptDef {
        name: "unpublish_article_prompt",
        description: "Unpublish an article by id",
        arguments: &[ARTICLE_ID],
    },
    PromptDef {
        name: "unpublish_article_by_title_prompt",
        description: "Unpublish an article found by title",
        arguments: &[TITLE],
    },
    PromptDef {
        name: "search_articles_prompt",
        description: "Search articles and summarize the findings",
        arguments: &[req("query", "Search term")],
    },
    PromptDef {
        name: "analyze_article",
        description: "Analyze an article by id",
        arguments: &[ARTICLE_ID],
    },
    PromptDef {
        name: "get_user_profile_prompt",
        description: "Fetch a user profile and summarize it",
        arguments: &[USERNAME],
    },
    PromptDef {
        name: "analyze_user_profile",
        description: "Analyze a user profile",
        arguments: &[USERNAME],
    },
    PromptDef {
        name: "analyze_user_profile_by_id",
        description: "Analyze a user profile by user id",
        arguments: &[req("user_id", "Dev.to user id")],
    },
];

pub fn find(name: &str) -> Option<&'static PromptDef> {
    PROMPTS.iter().find(|p| p.name == name)
}

/// Prompt arguments arrive as strings per MCP, but accept JSON scalars too.
struct Args<'a>(&'a Map<String, Value>);

impl Args<'_> {
    fn opt_str(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    fn req_str(&self, key: &str) -> Result<String> {
        self.opt_str(key)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ApiError::InvalidInput(format!("missing prompt argument '{key}'")))
    }

    fn opt_u32(&self, key: &str, default: u32) -> u32 {
        self.opt_str(key)
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(default)
    }

    fn opt_bool(&self, key: &str) -> Option<bool> {
        match self.0.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

fn listing(kind: &str, args: &Args<'_>) -> String {
    let page = args.opt_u32("page", 1);
    let per_page = args.opt_u32("per_page", 30);
    match (page == 1, per_page == 30) {
        (true, true) => format!("Please list my {kind} articles on Dev.to."),
        (true, false) => {
            format!("Please list my {kind} articles on Dev.to, showing {per_page} articles per page.")
        }
        (false, true) => {
            format!("Please list my {kind} articles on Dev.to, starting from page {page}.")
        }
        (false, false) => format!(
            "Please list my {kind} articles on Dev.to, showing {per_page} articles per page starting from page {page}."
        ),
    }
}

fn change_list(args: &Args<'_>, title_key: &str) -> Vec<String> {
    let mut changes = Vec::new();
    if let Some(t) = args.opt_str(title_key) {
        changes.push(format!("new title: '{t}'"));
    }
    if let Some(c) = args.opt_str("content") {
        changes.push(format!("new content: {c}"));
    }
    if let Some(t) = args.opt_str("tags") {
        changes.push(format!("new tags: {t}"));
    }
    if let Some(p) = args.opt_bool("published") {
        changes.push(if p { "publish it" } else { "save as draft" }.to_string());
    }
    changes
}

/// Render prompt `name` with `args`.
pub fn render(name: &str, args: &Map<String, Value>) -> Result<String> {
    let a = Args(args);
    let summarize = |what: &str| {
        format!("{what} and provide a summary of its key points and insights.")
    };
    let text = match name {
        "get_article_prompt" | "get_article_by_id_prompt" => summarize(&format!(
            "Please get the Dev.to article with ID {}",
            a.req_str("article_id")?
        )),
        "get_article_by_title_prompt" => summarize(&format!(
            "Please get the Dev.to article with title '{}'",
            a.req_str("article_title")?
        )),
        "analyze_article" => summarize(&format!(
            "Please analyze the Dev.to article with ID {}",
            a.req_str("article_id")?
        )),
        "list_my_articles_prompt" => listing("published", &a),
        "list_my_draft_articles_prompt" => listing("draft", &a),
        "list_my_unpublished_articles_prompt" => listing("unpublished", &a),
        "list_my_scheduled_articles_prompt" => listing("scheduled", &a),
        "create_article_prompt" => {
            let mut p = format!(
                "Please create a new article on Dev.to with title '{}' and content: {}",
                a.req_str("title")?,
                a.req_str("content")?
            );
            if let Some(tags) = a.opt_str("tags").filter(|t| !t.is_empty()) {
                p.push_str(&format!(", tagged with: {tags}"));
            }
            if a.opt_bool("published").unwrap_or(false) {
                p.push_str(" and publish it immediately");
            } else {
                p.push_str(" as a draft");
            }
            p + "."
        }
        "update_article_prompt" => format!(
            "Please update the article with ID {} on Dev.to with the following changes: {}.",
            a.req_str("id")?,
            change_list(&a, "title").join(", ")
        ),
        "update_article_by_title_prompt" => {
            let mut p = format!(
                "Please update the article with title '{}' on Dev.to",
                a.req_str("title")?
            );
            let changes = change_list(&a, "new_title");
            if !changes.is_empty() {
                p.push_str(" with the following changes: ");
                p.push_str(&changes.join(", "));
            }
            p + "."
        }
        "delete_article_prompt" => format!(
            "Please delete the article with ID {} on Dev.to.",
            a.req_str("id")?
        ),
        "publish_article_prompt" => format!(
            "Please publish the article with ID {} on Dev.to.",
            a.req_str("article_id")?
        ),
        "publish_article_by_title_prompt" => format!(
            "Please publish the article with title '{}' on Dev.to.",
            a.req_str("title")?
        ),
        "unpublish_article_prompt" => format!(
            "Please unpublish the article with ID {} on Dev.to.",
            a.req_str("article_id")?
        ),
        "unpublish_article_by_title_prompt" => format!(
            "Please unpublish the article with title '{}' on Dev.to.",
            a.req_str("title")?
        ),
        "search_articles_prompt" => format!(
            "Please search for articles on Dev.to about {} and summarize the key findings.",
            a.req_str("query")?
        ),
        "get_user_profile_prompt" => summarize(&format!(
            "Please get the Dev.to user profile with username {}",
            a.req_str("username")?
        )),
        "analyze_user_profile" => summarize(&format!(
            "Please analyze the Dev.to user profile with username {}",
            a.req_str("username")?
        )),
        "analyze_user_profile_by_id" => summarize(&format!(
            "Please analyze the Dev.to user profile with ID {}",
            a.req_str("user_id")?
        )),
        other => {
            return Err(ApiError::InvalidInput(format!("unknown prompt '{other}'")));
        }
    };
    Ok(text)
}
