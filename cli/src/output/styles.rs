//! Terminal stylesheet. Every field is a no-op style until `colorize` runs.

use deck_common::ProbeResult;
use owo_colors::Style;

use crate::output::human::is_missing_tool;

#[derive(Default, Clone)]
pub struct Styles {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub info: Style,
    pub dim: Style,
    /// Table headers and section titles
    pub header: Style,
    /// `[plan]` / `[apply]` tag in front of a plan line
    pub mode: Style,
    /// Probe rows
    pub up: Style,
    pub down: Style,
    /// Probe rows whose local tool (kubectl, ssh) is absent
    pub missing: Style,
}

impl Styles {
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.error = Style::new().red();
        self.info = Style::new().blue();
        self.dim = Style::new().dimmed();
        self.header = Style::new().bold().cyan();
        self.mode = Style::new().bold().magenta();
        self.up = self.success;
        self.down = self.error;
        self.missing = Style::new().yellow().italic();
    }

    /// Row style for one probe result.
    #[must_use]
    pub fn probe(&self, result: &ProbeResult) -> Style {
        if result.reachable {
            self.up
        } else if is_missing_tool(&result.detail) {
            self.missing
        } else {
            self.down
        }
    }
}
