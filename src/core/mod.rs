//! Process-wide runtime state.

mod state;

pub use state::{
    is_shutdown, record_request, register_server, requests_served, setup_shutdown_handler,
};
