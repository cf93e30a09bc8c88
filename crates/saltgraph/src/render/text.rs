//! ASCII tree report
//!
//! One block per state, one titled branch list per non-empty category,
//! followed by summary totals.

use anyhow::Result;

use crate::core::{GraphModel, ReportConfig, Renderer};

const BANNER_WIDTH: usize = 80;
const RULE_WIDTH: usize = 40;
const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";

pub const TITLE: &str = "SaltStack State Visualization";

/// Renders a graph model as an indented text tree
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    config: ReportConfig,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReportConfig) -> Self {
        Self { config }
    }

    fn push_section<'a>(
        lines: &mut Vec<String>,
        title: &str,
        values: impl IntoIterator<Item = &'a str>,
    ) {
        let mut values: Vec<&str> = values.into_iter().collect();
        if values.is_empty() {
            return;
        }
        values.sort_unstable();

        lines.push(format!("  {}:", title));
        let last = values.len() - 1;
        for (i, value) in values.iter().enumerate() {
            let connector = if i == last { LAST_BRANCH } else { BRANCH };
            lines.push(format!("    {}{}", connector, value));
        }
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, model: &GraphModel) -> Result<String> {
        let banner = "=".repeat(BANNER_WIDTH);
        let mut lines = vec![banner.clone(), TITLE.to_string(), banner.clone(), String::new()];

        for (name, facts) in model.states() {
            lines.push(format!("State: {}", name));
            lines.push("-".repeat(RULE_WIDTH));

            Self::push_section(&mut lines, "Roles", facts.roles().iter().map(String::as_str));
            if self.config.show_role_dependencies {
                Self::push_section(
                    &mut lines,
                    "Role Dependencies",
                    facts.reported_role_dependencies(),
                );
            }
            if self.config.show_pillars {
                Self::push_section(
                    &mut lines,
                    "Pillar Dependencies",
                    facts.pillar_dependencies().iter().map(String::as_str),
                );
            }
            if self.config.show_systemd {
                Self::push_section(
                    &mut lines,
                    "Systemd Units",
                    facts.systemd_units().iter().map(String::as_str),
                );
            }
            Self::push_section(
                &mut lines,
                "Includes",
                facts.includes().iter().map(String::as_str),
            );

            lines.push(String::new());
        }

        let totals = model.totals();
        lines.push(banner.clone());
        lines.push(format!("Total States: {}", totals.states));
        lines.push(format!("Total Roles: {}", totals.roles));
        if self.config.show_role_dependencies {
            lines.push(format!(
                "Total Role Dependencies: {}",
                totals.role_dependencies
            ));
        }
        if self.config.show_pillars {
            lines.push(format!(
                "Total Pillar Dependencies: {}",
                totals.pillar_dependencies
            ));
        }
        if self.config.show_systemd {
            lines.push(format!("Total Systemd Units: {}", totals.systemd_units));
        }
        lines.push(format!("Total Includes: {}", totals.includes));
        lines.push(banner);

        Ok(lines.join("\n"))
    }

    fn name(&self) -> &'static str {
        "ascii-tree"
    }

    fn format(&self) -> &'static str {
        "text"
    }
}
