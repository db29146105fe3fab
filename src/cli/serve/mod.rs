//! Local server: the built site plus the tool API.
//!
//! ```text
//! GET  /api/tools          tool list
//! POST /api/tools/<slug>   run a tool
//! GET  /<anything else>    file from the output directory, or 404.html
//! ```

mod api;
mod lifecycle;
mod path;
mod response;

use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use tiny_http::{Request, Server};

use crate::cli::build::log_summary;
use crate::config::ToolbenchConfig;
use crate::core::{is_shutdown, record_request, register_server, requests_served};
use crate::site::build_site;
use crate::utils::plural_count;
use crate::{debug, log};

/// Largest request body the API accepts.
const MAX_BODY: u64 = 16 * 1024 * 1024;

/// Build the site, then serve it until Ctrl+C.
pub fn run(config: &ToolbenchConfig) -> Result<()> {
    let summary = build_site(config, false)?;
    log_summary(config, &summary);

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    register_server(Arc::clone(&server));

    log!("serve"; "http://{}", addr);
    debug!("serve"; "api at http://{}{}tools", addr, api::API_PREFIX);

    run_request_loop(&server, Arc::new(config.clone()))?;

    let served = usize::try_from(requests_served()).unwrap_or(usize::MAX);
    log!("serve"; "stopped after {}", plural_count(served, "request"));
    Ok(())
}

fn run_request_loop(server: &Server, config: Arc<ToolbenchConfig>) -> Result<()> {
    let pool = lifecycle::worker_pool()?;

    for request in server.incoming_requests() {
        if is_shutdown() {
            break;
        }
        let config = Arc::clone(&config);
        pool.spawn(move || {
            record_request();
            if let Err(e) = handle_request(request, &config) {
                log!("serve"; "request error: {e:#}");
            }
        });
    }
    Ok(())
}

fn handle_request(mut request: Request, config: &ToolbenchConfig) -> Result<()> {
    if is_shutdown() {
        return response::respond_unavailable(request);
    }

    let url_path = path::url_path(request.url()).to_string();
    debug!("serve"; "{} {}", request.method(), request.url());

    if url_path.starts_with(api::API_PREFIX) {
        let mut body = Vec::new();
        request
            .as_reader()
            .take(MAX_BODY)
            .read_to_end(&mut body)
            .context("Failed to read request body")?;
        let reply = api::handle(request.method(), &url_path, &body, config);
        return response::respond_json(request, &reply);
    }

    match path::resolve_path(&url_path, &config.build.output) {
        Some(file) => response::respond_file(request, &file),
        None => response::respond_not_found(request, &config.build.output),
    }
}
