//! Terminal logging with colored prefixes and in-place status lines.
//!
//! Everything here writes to stderr, so tool results on stdout stay clean
//! enough to pipe.
//!
//! - `log!` / `debug!` for prefixed messages
//! - `status_success` / `status_error` for timestamped one-line results
//! - `ProgressLine` for counters that update in place during a build
//!
//! ```ignore
//! log!("serve"; "listening on {}", addr);
//! let progress = ProgressLine::new(&[("tools", 12), ("articles", 3)]);
//! progress.inc("tools");
//! progress.finish();
//! ```

use std::io::{Write, stderr};
use std::sync::LazyLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Stream};
use parking_lot::Mutex;

/// Set by `--verbose`.
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Number of progress lines currently drawn below the cursor.
static BAR_COUNT: AtomicUsize = AtomicUsize::new(0);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Log a message with a colored module prefix
///
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Like `log!`, but only with `--verbose`.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut out = stderr().lock();

    let bar_count = BAR_COUNT.load(Ordering::SeqCst);
    if bar_count > 0 {
        execute!(
            out,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine)
        )
        .ok();
    }

    writeln!(out, "{prefix} {message}").ok();
    out.flush().ok();
}

fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "serve" | "api" => prefix
            .if_supports_color(Stream::Stderr, |p| p.bright_blue().bold().to_string())
            .to_string(),
        "state" | "done" => prefix
            .if_supports_color(Stream::Stderr, |p| p.bright_green().bold().to_string())
            .to_string(),
        "error" => prefix
            .if_supports_color(Stream::Stderr, |p| p.bright_red().bold().to_string())
            .to_string(),
        _ => prefix
            .if_supports_color(Stream::Stderr, |p| p.bright_yellow().bold().to_string())
            .to_string(),
    }
}

// ============================================================================
// Status line
// ============================================================================

fn now() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Timestamped result line; a new status overwrites the previous one.
pub struct StatusLine {
    last_lines: usize,
}

static STATUS: LazyLock<Mutex<StatusLine>> = LazyLock::new(|| Mutex::new(StatusLine::new()));

impl StatusLine {
    pub const fn new() -> Self {
        Self { last_lines: 0 }
    }

    pub fn success(&mut self, message: &str) {
        let symbol = "✓"
            .if_supports_color(Stream::Stderr, |s| s.green().to_string())
            .to_string();
        self.display(&symbol, message);
    }

    pub fn error(&mut self, summary: &str, detail: &str) {
        let symbol = "✗"
            .if_supports_color(Stream::Stderr, |s| s.red().to_string())
            .to_string();
        self.display(&symbol, &join_detail(summary, detail));
    }

    pub fn warning(&mut self, detail: &str) {
        let symbol = "⚠"
            .if_supports_color(Stream::Stderr, |s| s.yellow().to_string())
            .to_string();
        self.display(&symbol, detail);
    }

    fn display(&mut self, symbol: &str, message: &str) {
        let mut out = stderr().lock();

        if self.last_lines > 0 {
            #[allow(clippy::cast_possible_truncation)]
            let lines = self.last_lines as u16;
            execute!(out, cursor::MoveUp(lines), Clear(ClearType::FromCursorDown)).ok();
        }

        let timestamp = format!("[{}]", now());
        let timestamp = timestamp
            .if_supports_color(Stream::Stderr, |t| t.dimmed().to_string())
            .to_string();
        writeln!(out, "{timestamp} {symbol} {message}").ok();
        out.flush().ok();

        self.last_lines = line_count(message);
    }
}

fn join_detail(summary: &str, detail: &str) -> String {
    if detail.is_empty() {
        summary.to_string()
    } else {
        format!("{summary}\n{detail}")
    }
}

fn line_count(message: &str) -> usize {
    message.matches('\n').count() + 1
}

pub fn status_success(message: &str) {
    STATUS.lock().success(message);
}

pub fn status_error(summary: &str, detail: &str) {
    STATUS.lock().error(summary, detail);
}

pub fn status_warning(detail: &str) {
    STATUS.lock().warning(detail);
}

// ============================================================================
// Progress line
// ============================================================================

/// Single-line progress display with multiple counters
///
/// Displays: `[build] tools(4/12) articles(1/3)`
///
/// Uses `try_lock` so worker threads never block on the display; a busy
/// display just skips that refresh.
pub struct ProgressLine {
    counters: Vec<Counter>,
    lock: Mutex<()>,
}

struct Counter {
    name: &'static str,
    total: usize,
    current: AtomicUsize,
}

impl ProgressLine {
    /// Counters with a zero total are left out.
    pub fn new(items: &[(&'static str, usize)]) -> Self {
        let counters = items
            .iter()
            .filter(|(_, total)| *total > 0)
            .map(|&(name, total)| Counter {
                name,
                total,
                current: AtomicUsize::new(0),
            })
            .collect();

        BAR_COUNT.store(1, Ordering::SeqCst);
        let progress = Self {
            counters,
            lock: Mutex::new(()),
        };
        progress.draw(false);
        progress
    }

    pub fn inc(&self, name: &str) {
        if let Some(counter) = self.counters.iter().find(|c| c.name == name) {
            counter.current.fetch_add(1, Ordering::Relaxed);
            if self.lock.try_lock().is_some() {
                self.draw(false);
            }
        }
    }

    fn render(&self) -> String {
        self.counters
            .iter()
            .map(|c| format!("{}({}/{})", c.name, c.current.load(Ordering::Relaxed), c.total))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn draw(&self, newline: bool) {
        let line = format!("{} {}", colorize_prefix("build"), self.render());
        let mut out = stderr().lock();
        execute!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        if newline {
            writeln!(out, "{line}").ok();
        } else {
            write!(out, "{line}").ok();
        }
        out.flush().ok();
    }

    /// Keep the final counts on screen and move to the next line.
    pub fn finish(self) {
        BAR_COUNT.store(0, Ordering::SeqCst);
        {
            let _guard = self.lock.lock();
            self.draw(true);
        }
        std::mem::forget(self);
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        BAR_COUNT.store(0, Ordering::SeqCst);
        let mut out = stderr().lock();
        execute!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        out.flush().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line_new() {
        assert_eq!(StatusLine::new().last_lines, 0);
    }

    #[test]
    fn test_line_count() {
        assert_eq!(line_count("done: qr"), 1);
        assert_eq!(line_count(&join_detail("qr failed", "Please enter content")), 2);
        assert_eq!(join_detail("only", ""), "only");
    }

    #[test]
    fn test_progress_render() {
        let progress = ProgressLine {
            counters: vec![Counter {
                name: "tools",
                total: 2,
                current: AtomicUsize::new(0),
            }],
            lock: Mutex::new(()),
        };
        progress.counters[0].current.fetch_add(1, Ordering::Relaxed);
        assert_eq!(progress.render(), "tools(1/2)");
        std::mem::forget(progress);
    }
}
