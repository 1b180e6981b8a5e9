//! Console output helpers shared by the subcommands.

use serde::Serialize;

/// How results are shown on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputMode {
    /// Machine-readable JSON instead of text.
    pub json: bool,
    /// Suppress non-essential text.
    pub quiet: bool,
}

impl OutputMode {
    /// Whether human-readable text should be printed.
    pub fn text(&self) -> bool {
        !self.json && !self.quiet
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("  Error: failed to serialize output: {e}"),
    }
}

/// Symbol for a passed check.
pub fn ok_sym() -> &'static str {
    "[OK]"
}

/// Symbol for a failed check.
pub fn fail_sym() -> &'static str {
    "[!!]"
}
