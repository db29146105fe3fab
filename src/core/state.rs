//! Shutdown and server bookkeeping.
//!
//! - `SHUTDOWN`: Ctrl+C received
//! - `SERVER`: the running dev server, unblocked on shutdown
//! - `REQUESTS`: requests handled so far, reported when the server stops

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use tiny_http::Server;

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

static REQUESTS: AtomicU64 = AtomicU64::new(0);

/// Install the Ctrl+C handler. Call once at program start.
///
/// Before `register_server()` the process exits right away; afterwards the
/// server is unblocked so the request loop can return and clean up.
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        if let Some(server) = SERVER.get() {
            crate::log!("serve"; "shutting down...");
            server.unblock();
        } else {
            std::process::exit(130);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the bound server. Only the first registration sticks.
pub fn register_server(server: Arc<Server>) {
    let _ = SERVER.set(server);
}

pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

pub fn record_request() {
    REQUESTS.fetch_add(1, Ordering::Relaxed);
}

pub fn requests_served() -> u64 {
    REQUESTS.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_counter() {
        let before = requests_served();
        record_request();
        record_request();
        assert!(requests_served() >= before + 2);
    }

    #[test]
    fn test_not_shutdown_by_default() {
        assert!(!is_shutdown());
    }
}
