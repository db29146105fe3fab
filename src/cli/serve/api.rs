//! JSON endpoints used by the tool pages.
//!
//! - `GET /api/tools` lists every tool
//! - `POST /api/tools/<slug>` runs one tool on the request body
//!
//! Routing is kept apart from `tiny_http` so it can be tested without a
//! socket.

use serde_json::{Value, json};
use tiny_http::Method;

use crate::config::ToolbenchConfig;
use crate::debug;
use crate::tools::ToolKind;

pub const API_PREFIX: &str = "/api/";

const TOOLS_PATH: &str = "/api/tools";

#[derive(Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
    /// Value of the `Allow` header on 405 responses.
    pub allow: Option<&'static str>,
}

impl ApiResponse {
    fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body,
            allow: None,
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
            allow: None,
        }
    }

    fn method_not_allowed(allow: &'static str) -> Self {
        Self {
            allow: Some(allow),
            ..Self::error(405, "Method not allowed")
        }
    }
}

/// Route an API request. `path` has no query string, `body` is the raw
/// request body.
pub fn handle(method: &Method, path: &str, body: &[u8], config: &ToolbenchConfig) -> ApiResponse {
    let path = path.trim_end_matches('/');

    if path == TOOLS_PATH {
        return match method {
            Method::Get | Method::Head => {
                let tools: Vec<_> = ToolKind::ALL.iter().map(|kind| kind.info()).collect();
                ApiResponse::ok(json!(tools))
            }
            _ => ApiResponse::method_not_allowed("GET"),
        };
    }

    let Some(slug) = path
        .strip_prefix(TOOLS_PATH)
        .and_then(|rest| rest.strip_prefix('/'))
    else {
        return ApiResponse::error(404, format!("No endpoint at {path}"));
    };
    let Some(kind) = ToolKind::from_slug(slug) else {
        return ApiResponse::error(404, format!("Unknown tool `{slug}`"));
    };
    if *method != Method::Post {
        return ApiResponse::method_not_allowed("POST");
    }

    let Ok(body) = std::str::from_utf8(body) else {
        return ApiResponse::error(400, "Request body is not valid UTF-8");
    };
    let input = if body.trim().is_empty() {
        config.tools.default_input(kind)
    } else {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => value,
            Err(e) => return ApiResponse::error(400, format!("Invalid JSON body: {e}")),
        }
    };

    match kind.run_json(input) {
        Ok(output) => ApiResponse::ok(output),
        Err(e) => {
            debug!("api"; "{slug}: {e}");
            ApiResponse::error(400, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    fn call(method: Method, path: &str, body: &str) -> ApiResponse {
        handle(&method, path, body.as_bytes(), &test_parse_config(""))
    }

    #[test]
    fn test_list_tools() {
        let response = call(Method::Get, "/api/tools", "");
        assert_eq!(response.status, 200);
        let tools = response.body.as_array().unwrap();
        assert_eq!(tools.len(), 12);
        assert_eq!(tools[0]["slug"], "base64");
        assert_eq!(tools[0]["storageKey"], "base64Converter");
    }

    #[test]
    fn test_run_tool() {
        let response = call(
            Method::Post,
            "/api/tools/base64",
            r#"{"text": "hello", "mode": "encode"}"#,
        );
        assert_eq!(response.status, 200, "{:?}", response.body);
        assert_eq!(response.body["output"], "aGVsbG8=");
    }

    #[test]
    fn test_run_tool_with_defaults() {
        let response = call(Method::Post, "/api/tools/uuid/", "");
        assert_eq!(response.status, 200, "{:?}", response.body);
    }

    #[test]
    fn test_tool_error_is_400() {
        let response = call(Method::Post, "/api/tools/jwt", r#"{"token": "nope"}"#);
        assert_eq!(response.status, 400);
        assert!(response.body["error"].is_string());

        let response = call(Method::Post, "/api/tools/jwt", "{not json");
        assert_eq!(response.status, 400);
        assert!(
            response.body["error"]
                .as_str()
                .unwrap()
                .starts_with("Invalid JSON body")
        );
    }

    #[test]
    fn test_non_utf8_body_is_400() {
        let config = test_parse_config("");
        let response = handle(&Method::Post, "/api/tools/base64", b"{\"text\": \"\xff\"}", &config);
        assert_eq!(response.status, 400);
        assert_eq!(response.body["error"], "Request body is not valid UTF-8");
    }

    #[test]
    fn test_unknown_and_wrong_method() {
        assert_eq!(call(Method::Post, "/api/tools/hammer", "{}").status, 404);
        assert_eq!(call(Method::Get, "/api/other", "").status, 404);

        let response = call(Method::Get, "/api/tools/qr", "");
        assert_eq!(response.status, 405);
        assert_eq!(response.allow, Some("POST"));
        assert_eq!(call(Method::Delete, "/api/tools", "").status, 405);
    }
}
