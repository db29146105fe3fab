//! Binding and the worker pool.

use std::net::{IpAddr, SocketAddr};

use anyhow::{Result, anyhow};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tiny_http::Server;

use crate::log;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Request handler threads. Tools are CPU bound but short.
const WORKERS: usize = 4;

/// Bind to `interface:base_port`, trying the next ports when it is taken.
pub fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        match Server::http(SocketAddr::new(interface, port)) {
            Ok(server) => {
                let addr = server
                    .server_addr()
                    .to_ip()
                    .unwrap_or_else(|| SocketAddr::new(interface, port));
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, addr.port());
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
        // Port 0 lets the OS pick; retrying it changes nothing.
        if base_port == 0 || port == u16::MAX {
            break;
        }
    }

    Err(anyhow!(
        "Failed to bind {}:{} (tried {} ports): {}",
        interface,
        base_port,
        MAX_PORT_RETRIES,
        last_error.map_or_else(|| "unknown error".to_string(), |e| e.to_string())
    ))
}

pub fn worker_pool() -> Result<ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(WORKERS)
        .thread_name(|i| format!("serve-{i}"))
        .build()
        .map_err(|e| anyhow!("failed to create request thread pool: {e}"))
}
