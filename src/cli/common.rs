//! Input and output helpers shared by the tool subcommands.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::args::TextArgs;

impl TextArgs {
    /// Resolve the text argument: inline text, a file, or stdin for `-`.
    /// `None` when neither was given.
    pub fn read(&self) -> Result<Option<String>> {
        if let Some(path) = &self.file {
            if path.as_os_str() == "-" {
                return read_stdin().map(Some);
            }
            return fs::read_to_string(path)
                .with_context(|| format!("Failed to read `{}`", path.display()))
                .map(Some);
        }
        match self.text.as_deref() {
            Some("-") => read_stdin().map(Some),
            Some(text) => Ok(Some(text.to_string())),
            None => Ok(None),
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin()
        .lock()
        .read_to_string(&mut buf)
        .context("Failed to read stdin")?;
    Ok(buf)
}

/// Print a result to stdout. A closed pipe (e.g. `| head`) is not an error.
pub fn print_stdout(text: &str) -> Result<()> {
    let mut out = io::stdout().lock();
    let result = if text.ends_with('\n') {
        out.write_all(text.as_bytes())
    } else {
        writeln!(out, "{text}")
    };
    match result.and_then(|()| out.flush()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other.context("Failed to write to stdout"),
    }
}

/// Write a result file, creating parent directories.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    crate::utils::path::write_file(path, bytes)
        .with_context(|| format!("Failed to write `{}`", path.display()))
}
