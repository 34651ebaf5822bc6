//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` prints `"{message}"` with a styled `[mode]` tag
/// - `success()` prints `"  ✓ {message}"`
/// - `warn()` prints `"  ⚠ {message}"`
///
/// Everything is suppressed when `ctx.quiet`. Under `--json` the reporter
/// writes to stderr so stdout carries only the JSON document.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    to_stderr: bool,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            to_stderr: false,
        }
    }

    /// Reporter that keeps stdout free for machine output.
    #[must_use]
    pub fn stderr(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            to_stderr: true,
        }
    }

    fn emit(&self, line: &str) {
        if self.ctx.quiet {
            return;
        }
        if self.to_stderr {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        self.emit(&style_mode_tag(message, self.ctx));
    }

    fn success(&self, message: &str) {
        self.emit(&format!("  {} {message}", "✓".style(self.ctx.styles.success)));
    }

    fn warn(&self, message: &str) {
        self.emit(&format!("  {} {message}", "⚠".style(self.ctx.styles.warning)));
    }
}

/// Colour a leading `[plan]`/`[apply]` tag, leaving the rest untouched.
fn style_mode_tag(message: &str, ctx: &OutputContext) -> String {
    match message.split_once("] ") {
        Some((tag, rest)) if tag.starts_with('[') => {
            format!("{} {rest}", format!("{tag}]").style(ctx.styles.mode))
        }
        _ => message.to_string(),
    }
}
