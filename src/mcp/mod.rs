// src/mcp/mod.rs
//! JSON-RPC 2.0 handler for the Model Context Protocol.
//!
//! Transport-agnostic: `POST /mcp` and the stdio binary both feed raw JSON
//! into [`McpHandler::handle_json`].

pub mod prompts;
pub mod tools;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

use crate::error::ApiError;
use crate::service::ArticleService;

use self::tools::ToolDef;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const TOOL_FAILED: i32 = -32000;

const INSTRUCTIONS: &str = "Tools for reading and writing Dev.to articles. Listing tools \
aggregate several pages sequentially. Lookups by title, and lookups of unpublished \
articles by id, scan your own articles one page per request. Writing and listing \
your own articles requires DEVTO_API_KEY.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpRequest {
    #[serde(default)]
    pub jsonrpc: String,
    /// `None` only when the member is absent; an explicit `null` is still a request.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

fn present<'de, D>(d: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(d).map(Some)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    /// Always written; parse errors reply with `"id": null`.
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl McpResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(McpError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Tool failure carrying the HTTP-equivalent status in `data.status`.
    pub fn failure(id: Option<Value>, err: &ApiError) -> Self {
        let code = match err {
            ApiError::InvalidInput(_) => INVALID_PARAMS,
            _ => TOOL_FAILED,
        };
        let mut resp = Self::error(id, code, err.to_string());
        if let Some(e) = resp.error.as_mut() {
            e.data = Some(json!({ "status": err.status() }));
        }
        resp
    }
}

#[derive(Debug, Clone, Serialize)]
struct ServerInfo {
    name: &'static str,
    version: &'static str,
}

pub struct McpHandler {
    service: Arc<ArticleService>,
    tools: HashMap<&'static str, ToolDef>,
    order: Vec<&'static str>,
    server_info: ServerInfo,
}

impl McpHandler {
    pub fn new(service: Arc<ArticleService>) -> Self {
        let defs = tools::all();
        let order = defs.iter().map(|t| t.name).collect();
        let tools = defs.into_iter().map(|t| (t.name, t)).collect();
        Self {
            service,
            tools,
            order,
            server_info: ServerInfo {
                name: "devto-mcp",
                version: env!("CARGO_PKG_VERSION"),
            },
        }
    }

    /// Tool names in registration order.
    pub fn tool_names(&self) -> &[&'static str] {
        &self.order
    }

    /// Dispatch one request. Notifications (no `id`) yield `None`.
    pub async fn handle(&self, request: McpRequest) -> Option<McpResponse> {
        let Some(id) = request.id else {
            tracing::debug!(target: "devto", method = %request.method, "mcp notification");
            return None;
        };
        let id = Some(id);
        let resp = match request.method.as_str() {
            "initialize" => self.initialize(id),
            "ping" => McpResponse::success(id, json!({})),
            "tools/list" => self.list_tools(id),
            "tools/call" => self.call_tool(id, request.params).await,
            "prompts/list" => McpResponse::success(id, json!({ "prompts": prompts::PROMPTS })),
            "prompts/get" => self.get_prompt(id, &request.params),
            other => {
                McpResponse::error(id, METHOD_NOT_FOUND, format!("Method not found: {other}"))
            }
        };
        Some(resp)
    }

    /// Parse and handle one JSON message; `None` when no reply is due.
    pub async fn handle_json(&self, raw: &str) -> Option<String> {
        let resp = match serde_json::from_str::<McpRequest>(raw) {
            Ok(req) => self.handle(req).await?,
            Err(e) => McpResponse::error(None, PARSE_ERROR, format!("Parse error: {e}")),
        };
        Some(serde_json::to_string(&resp).unwrap_or_default())
    }

    fn initialize(&self, id: Option<Value>) -> McpResponse {
        McpResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "serverInfo": self.server_info,
                "capabilities": {
                    "tools": {},
                    "prompts": {}
                },
                "instructions": INSTRUCTIONS,
            }),
        )
    }

    fn list_tools(&self, id: Option<Value>) -> McpResponse {
        let tools: Vec<Value> = self
            .order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(ToolDef::listing)
            .collect();
        McpResponse::success(id, json!({ "tools": tools }))
    }

    async fn call_tool(&self, id: Option<Value>, params: Value) -> McpResponse {
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return McpResponse::error(id, INVALID_PARAMS, "Missing tool name");
        };
        let Some(tool) = self.tools.get(name) else {
            return McpResponse::error(id, INVALID_PARAMS, format!("Unknown tool: {name}"));
        };
        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        match tool.execute(Arc::clone(&self.service), arguments).await {
            Ok(result) => McpResponse::success(
                id,
                json!({
                    "content": [{
                        "type": "text",
                        "text": serde_json::to_string_pretty(&result).unwrap_or_default()
                    }]
                }),
            ),
            Err(e) => {
                tracing::warn!(target: "devto", tool = name, status = e.status(), error = %e, "tool failed");
                McpResponse::failure(id, &e)
            }
        }
    }

    fn get_prompt(&self, id: Option<Value>, params: &Value) -> McpResponse {
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return McpResponse::error(id, INVALID_PARAMS, "Missing prompt name");
        };
        let Some(def) = prompts::find(name) else {
            return McpResponse::error(id, INVALID_PARAMS, format!("Unknown prompt: {name}"));
        };
        let empty = Map::new();
        let args = params
            .get("arguments")
            .and_then(Value::as_object)
            .unwrap_or(&empty);
        match prompts::render(def.name, args) {
            Ok(text) => McpResponse::success(
                id,
                json!({
                    "description": def.description,
                    "messages": [{
                        "role": "user",
                        "content": { "type": "text", "text": text }
                    }]
                }),
            ),
            Err(e) => McpResponse::failure(id, &e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_and_error_are_exclusive() {
        let ok = McpResponse::success(Some(json!(1)), json!({ "ok": true }));
        assert!(ok.error.is_none() && ok.result.is_some());
        let err = McpResponse::error(Some(json!(1)), METHOD_NOT_FOUND, "nope");
        assert!(err.error.is_some() && err.result.is_none());
    }

    #[test]
    fn failure_carries_status() {
        let resp = McpResponse::failure(Some(json!(3)), &ApiError::AuthMissing);
        let e = resp.error.unwrap();
        assert_eq!(e.code, TOOL_FAILED);
        assert_eq!(e.data.unwrap()["status"], 401);

        let resp = McpResponse::failure(None, &ApiError::InvalidInput("bad".into()));
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);
    }

    #[test]
    fn request_without_id_parses_as_notification() {
        let req: McpRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
                .unwrap();
        assert!(req.id.is_none());
        assert!(req.params.is_null());
    }

    #[test]
    fn null_id_is_kept_apart_from_a_missing_one() {
        let req: McpRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).unwrap();
        assert_eq!(req.id, Some(Value::Null));

        let out = serde_json::to_value(McpResponse::error(None, PARSE_ERROR, "bad")).unwrap();
        assert_eq!(out.get("id"), Some(&Value::Null));
    }
}
