//! Terminal colorization for the text report
//!
//! Applies ANSI escape codes to report elements using crossterm.

use crossterm::style::{Color, Stylize};

const SECTION_TITLES: [(&str, Color); 5] = [
    ("Roles:", Color::Green),
    ("Role Dependencies:", Color::Green),
    ("Pillar Dependencies:", Color::Yellow),
    ("Systemd Units:", Color::Magenta),
    ("Includes:", Color::Grey),
];

const CONNECTORS: [&str; 2] = ["├── ", "└── "];

/// Colorize a text report using ANSI escape codes
///
/// - State headers: bold cyan
/// - Section titles: the category color
/// - Branch connectors: dark grey
/// - Entries: default (terminal color)
pub fn colorize_report(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 2);

    for line in input.lines() {
        result.push_str(&colorize_line(line));
        result.push('\n');
    }

    // Remove trailing newline to match input format
    if !input.ends_with('\n') && result.ends_with('\n') {
        result.pop();
    }

    result
}

fn colorize_line(line: &str) -> String {
    if let Some(name) = line.strip_prefix("State: ") {
        return format!("{}", format!("State: {}", name).with(Color::Cyan).bold());
    }

    let trimmed = line.trim_start();
    let indent = &line[..line.len() - trimmed.len()];

    for (title, color) in SECTION_TITLES {
        if trimmed == title {
            return format!("{}{}", indent, title.with(color));
        }
    }

    for connector in CONNECTORS {
        if let Some(entry) = trimmed.strip_prefix(connector) {
            return format!("{}{}{}", indent, connector.with(Color::DarkGrey), entry);
        }
    }

    line.to_string()
}
