//! Command-line interface.

mod args;
pub mod build;
pub mod common;
pub mod serve;
pub mod state;
pub mod tool;

pub use args::{BuildArgs, Cli, Commands, DEFAULT_CONFIG};
