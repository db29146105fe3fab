//! Path helpers.

pub mod fs;
pub mod slug;

pub use fs::{normalize_path, write_atomic, write_file};
