//! Terminal rendering module for rich markdown output
//!
//! Core display types produce markdown. This module prints it through
//! termimad, or verbatim when colors are disabled.

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

/// Terminal renderer that can switch between rich and plain text output
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    /// Create a new terminal renderer
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();

        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Render markdown text to terminal
    pub fn render(&self, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        for line in markdown.lines() {
            match header_color(line) {
                // Keep the hashes visible; termimad would strip them
                Some(color) => println!("\x1b[{color}m{line}\x1b[0m"),
                None => {
                    self.skin.print_inline(&badges(line));
                    println!();
                }
            }
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

/// ANSI color code for a header line: blue for steps, cyan for item groups.
fn header_color(line: &str) -> Option<&'static str> {
    if line.starts_with("### ") {
        Some("36")
    } else if line.starts_with('#') {
        Some("34")
    } else {
        None
    }
}

/// Emphasizes recommendation badges so they stand out in item lists.
fn badges(line: &str) -> String {
    line.replace("⚠ CRITICAL", "*⚠ CRITICAL*")
        .replace("★ RECOMMENDED", "*★ RECOMMENDED*")
}
