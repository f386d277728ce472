//! # Output Configuration
//!
//! This module controls how `update-vendor` talks to the user. All
//! user-facing lines go to stderr, prefixed with a colored marker:
//!
//! | Marker | Style       | Used for                          |
//! |--------|-------------|-----------------------------------|
//! | `==>`  | bold green  | top-level steps                   |
//! | ` ->`  | bold green  | one vendor entry                  |
//! | `  ->` | bold blue   | details of an entry               |
//! | `==>`  | bold red    | errors                            |
//! | `+`    | plain       | commands skipped by `--dry-run`   |
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use std::cell::RefCell;
use std::env;

use console::{Style, Term};

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colored markers should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// # Arguments
    /// * `color_flag` - The value of the --color CLI flag: "always", "never", or "auto"
    ///
    /// In auto mode, colors are disabled if:
    /// - `NO_COLOR` environment variable is set (any value, including empty)
    /// - `CLICOLOR=0` is set
    /// - `TERM=dumb` is set
    /// - stderr is not a TTY (unless `CLICOLOR_FORCE=1`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    /// Detect whether color output is supported based on environment.
    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        // Everything we print goes to stderr, so that is the stream to probe.
        Term::stderr().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

enum Sink {
    Stderr(Term),
    Capture(RefCell<Vec<String>>),
}

/// Writes marker lines to stderr, or into memory for inspection.
pub struct Reporter {
    config: OutputConfig,
    sink: Sink,
}

impl Reporter {
    /// A reporter that writes to stderr.
    pub fn stderr(config: OutputConfig) -> Self {
        Self {
            config,
            sink: Sink::Stderr(Term::stderr()),
        }
    }

    /// A reporter that keeps every line in memory, uncolored.
    ///
    /// Used by tests to assert on exactly what a run would have printed.
    pub fn capturing() -> Self {
        Self {
            config: OutputConfig::without_color(),
            sink: Sink::Capture(RefCell::new(Vec::new())),
        }
    }

    /// Lines collected by a [`Reporter::capturing`] reporter.
    ///
    /// Always empty for a stderr reporter.
    pub fn lines(&self) -> Vec<String> {
        match &self.sink {
            Sink::Capture(lines) => lines.borrow().clone(),
            Sink::Stderr(_) => Vec::new(),
        }
    }

    /// `==> message`
    pub fn step(&self, message: &str) {
        self.marked(Style::new().green().bold(), "==>", message);
    }

    /// ` -> message`
    pub fn entry(&self, message: &str) {
        self.marked(Style::new().green().bold(), " ->", message);
    }

    /// `  -> message`
    pub fn detail(&self, message: &str) {
        self.marked(Style::new().blue().bold(), "  ->", message);
    }

    /// `==> message` in red.
    pub fn error(&self, message: &str) {
        self.marked(Style::new().red().bold(), "==>", message);
    }

    /// `+ git ...` for a command that was not executed.
    pub fn command(&self, cmdline: &str) {
        self.write_line(&format!("+ {}", cmdline));
    }

    /// An unadorned line, e.g. one row of a diff listing.
    pub fn plain(&self, line: &str) {
        self.write_line(line);
    }

    fn marked(&self, style: Style, marker: &str, message: &str) {
        let marker = if self.config.use_color {
            style.force_styling(true).apply_to(marker).to_string()
        } else {
            marker.to_string()
        };
        self.write_line(&format!("{} {}", marker, message));
    }

    fn write_line(&self, line: &str) {
        match &self.sink {
            Sink::Stderr(term) => {
                // Nothing sensible to do if stderr is gone.
                let _ = term.write_line(line);
            }
            Sink::Capture(lines) => lines.borrow_mut().push(line.to_string()),
        }
    }
}
