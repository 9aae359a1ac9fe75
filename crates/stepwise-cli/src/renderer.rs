//! Terminal rendering for the markdown produced by the core display types.

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

/// Renders markdown with termimad, or passes it through untouched when
/// colors are disabled.
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    pub fn render(&self, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        for line in markdown.lines() {
            match line_color(line) {
                // Headers keep their hashes so step IDs line up
                Some(color) => println!("\x1b[{color}m{line}\x1b[0m"),
                None => {
                    self.skin.print_inline(line);
                    println!();
                }
            }
        }
        Ok(())
    }
}

/// ANSI color code for lines printed verbatim: failed steps in red,
/// completed steps in green, any other header in blue.
fn line_color(line: &str) -> Option<&'static str> {
    if !line.starts_with('#') {
        return None;
    }
    Some(if line.contains('✗') {
        "31"
    } else if line.contains('✓') {
        "32"
    } else {
        "34"
    })
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
