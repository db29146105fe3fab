//! HTTP responses.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use super::api::ApiResponse;
use crate::utils::mime::{
    self,
    types::{HTML, JSON, PLAIN},
};

/// Respond with a static file.
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = mime::from_path(path);
    if is_head_request(&request) {
        return send_head(request, 200, content_type);
    }

    let body = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    send_body(request, 200, content_type, body, &[])
}

/// Respond with the site's `404.html`, or plain text if it is missing.
pub fn respond_not_found(request: Request, output_dir: &Path) -> Result<()> {
    let custom = output_dir.join("404.html");
    let body = fs::read(&custom).ok();

    if is_head_request(&request) {
        let mime = if body.is_some() { HTML } else { PLAIN };
        return send_head(request, 404, mime);
    }

    match body {
        Some(body) => send_body(request, 404, HTML, body, &[]),
        None => send_body(request, 404, PLAIN, b"404 Not Found".to_vec(), &[]),
    }
}

/// Respond with 503 while shutting down.
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec(), &[])
}

pub fn respond_json(request: Request, response: &ApiResponse) -> Result<()> {
    let body = serde_json::to_vec(&response.body)?;
    let allow: Vec<(&str, &str)> = response.allow.map(|a| ("Allow", a)).into_iter().collect();
    if is_head_request(&request) {
        return send_head(request, response.status, JSON);
    }
    send_body(request, response.status, JSON, body, &allow)
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(request: Request, status: u16, content_type: &str) -> Result<()> {
    let response = Response::empty(StatusCode(status))
        .with_header(make_header("Content-Type", content_type)?);
    request.respond(response)?;
    Ok(())
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &str,
    body: Vec<u8>,
    extra: &[(&str, &str)],
) -> Result<()> {
    let mut response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type)?)
        .with_header(make_header("Cache-Control", "no-cache")?);
    for (key, value) in extra {
        response.add_header(make_header(key, value)?);
    }
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow!("invalid header {key}: {value}"))
}
