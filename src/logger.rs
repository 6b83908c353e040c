//! Terminal logging with colored module prefixes.
//!
//! ```ignore
//! log!("build"; "wrote {} pages", count);
//! debug!("skip"; "{}: {}", path.display(), reason);
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

/// Write `[module] message` to stdout.
#[inline]
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on severity
#[inline]
fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    match prefix_style(module) {
        PrefixStyle::Error => prefix.bright_red().bold().to_string(),
        PrefixStyle::Warning => prefix.bright_magenta().bold().to_string(),
        PrefixStyle::Done => prefix.bright_green().bold().to_string(),
        PrefixStyle::Normal => prefix.bright_yellow().bold().to_string(),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PrefixStyle {
    Error,
    Warning,
    Done,
    Normal,
}

fn prefix_style(module: &str) -> PrefixStyle {
    match module.to_ascii_lowercase().as_str() {
        "error" => PrefixStyle::Error,
        "warning" | "skip" => PrefixStyle::Warning,
        "done" => PrefixStyle::Done,
        _ => PrefixStyle::Normal,
    }
}
