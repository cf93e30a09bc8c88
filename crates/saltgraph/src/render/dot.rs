//! Graphviz DOT document with one card per state
//!
//! The whole grid is a single plaintext node whose HTML-like label is a
//! table of cards, `columns` cards per row.

use anyhow::Result;

use crate::core::{GraphModel, ReportConfig, Renderer, StateFacts};

pub const STATE_COLOR: &str = "#ADD8E6";
pub const ROLE_COLOR: &str = "#90EE90";
pub const PILLAR_COLOR: &str = "#FFFFE0";
pub const SYSTEMD_COLOR: &str = "#FFB6C1";
pub const INCLUDE_COLOR: &str = "#D3D3D3";

const DEFAULT_COLUMNS: usize = 3;

/// Escape text for an HTML-like label
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renders a graph model as a DOT card grid
#[derive(Debug, Clone)]
pub struct DotRenderer {
    config: ReportConfig,
    columns: usize,
}

impl Default for DotRenderer {
    fn default() -> Self {
        Self {
            config: ReportConfig::default(),
            columns: DEFAULT_COLUMNS,
        }
    }
}

impl DotRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReportConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Sections a card shows, with their header colors
    fn sections<'a>(&self, facts: &'a StateFacts) -> Vec<(&'static str, &'static str, Vec<&'a str>)> {
        let mut sections = Vec::new();
        let mut roles: Vec<&str> = facts.roles().iter().map(String::as_str).collect();
        roles.sort_unstable();
        sections.push(("Roles", ROLE_COLOR, roles));
        if self.config.show_role_dependencies {
            let mut deps = facts.reported_role_dependencies();
            deps.sort_unstable();
            sections.push(("Role Dependencies", ROLE_COLOR, deps));
        }
        if self.config.show_pillars {
            sections.push((
                "Pillar Dependencies",
                PILLAR_COLOR,
                facts.pillar_dependencies().iter().map(String::as_str).collect(),
            ));
        }
        if self.config.show_systemd {
            sections.push((
                "Systemd Units",
                SYSTEMD_COLOR,
                facts.systemd_units().iter().map(String::as_str).collect(),
            ));
        }
        sections.push((
            "Includes",
            INCLUDE_COLOR,
            facts.includes().iter().map(String::as_str).collect(),
        ));
        sections.retain(|(_, _, values)| !values.is_empty());
        sections
    }

    fn card(&self, name: &str, facts: &StateFacts) -> String {
        let mut card = String::from(
            r#"<TABLE BORDER="1" CELLBORDER="1" CELLSPACING="0" CELLPADDING="4" BGCOLOR="white">"#,
        );
        card.push_str(&format!(
            r#"<TR><TD BGCOLOR="{}" COLSPAN="2"><B>{}</B></TD></TR>"#,
            STATE_COLOR,
            escape_html(name)
        ));
        for (title, color, values) in self.sections(facts) {
            card.push_str(&format!(
                r#"<TR><TD BGCOLOR="{}" COLSPAN="2"><B>{}</B></TD></TR>"#,
                color, title
            ));
            for value in values {
                card.push_str(&format!(
                    r#"<TR><TD COLSPAN="2" ALIGN="LEFT">{}</TD></TR>"#,
                    escape_html(value)
                ));
            }
        }
        card.push_str("</TABLE>");
        card
    }

    /// The HTML-like label of the grid node
    pub fn grid_label(&self, model: &GraphModel) -> String {
        let cards: Vec<String> = model
            .states()
            .filter(|(_, facts)| !self.sections(facts).is_empty())
            .map(|(name, facts)| self.card(name, facts))
            .collect();

        let mut label = String::from(
            r#"<TABLE BORDER="0" CELLBORDER="0" CELLSPACING="10" CELLPADDING="10">"#,
        );
        for row in cards.chunks(self.columns) {
            label.push_str("<TR>");
            for card in row {
                label.push_str("<TD>");
                label.push_str(card);
                label.push_str("</TD>");
            }
            for _ in row.len()..self.columns {
                label.push_str("<TD></TD>");
            }
            label.push_str("</TR>");
        }
        label.push_str("</TABLE>");
        label
    }
}

impl Renderer for DotRenderer {
    type Output = String;

    fn render(&self, model: &GraphModel) -> Result<String> {
        let mut dot = String::new();
        dot.push_str("// SaltStack State Visualization\n");
        dot.push_str("digraph {\n");
        dot.push_str("\tgraph [nodesep=0.5 rankdir=TB ranksep=0.5]\n");
        dot.push_str("\tnode [fontname=Arial shape=plaintext]\n");
        dot.push_str(&format!(
            "\tsalt_states [label=<{}> shape=plaintext]\n",
            self.grid_label(model)
        ));
        dot.push_str("}\n");
        Ok(dot)
    }

    fn name(&self) -> &'static str {
        "card-grid"
    }

    fn format(&self) -> &'static str {
        "dot"
    }
}
