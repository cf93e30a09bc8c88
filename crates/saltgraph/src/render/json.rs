//! JSON report

use anyhow::Result;
use serde::Serialize;

use crate::core::{GraphModel, GraphTotals, ReportConfig, Renderer};

#[derive(Serialize)]
struct JsonState<'a> {
    name: &'a str,
    roles: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role_dependencies: Option<Vec<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pillar_dependencies: Option<Vec<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    systemd_units: Option<Vec<&'a str>>,
    includes: Vec<&'a str>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    states: Vec<JsonState<'a>>,
    totals: GraphTotals,
}

/// Renders a graph model as pretty-printed JSON
#[derive(Debug, Clone, Default)]
pub struct JsonRenderer {
    config: ReportConfig,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReportConfig) -> Self {
        Self { config }
    }
}

fn sorted<'a>(values: impl IntoIterator<Item = &'a String>) -> Vec<&'a str> {
    let mut values: Vec<&str> = values.into_iter().map(String::as_str).collect();
    values.sort_unstable();
    values
}

impl Renderer for JsonRenderer {
    type Output = String;

    fn render(&self, model: &GraphModel) -> Result<String> {
        let states = model
            .states()
            .map(|(name, facts)| JsonState {
                name,
                roles: sorted(facts.roles()),
                role_dependencies: self.config.show_role_dependencies.then(|| {
                    let mut deps = facts.reported_role_dependencies();
                    deps.sort_unstable();
                    deps
                }),
                pillar_dependencies: self
                    .config
                    .show_pillars
                    .then(|| sorted(facts.pillar_dependencies())),
                systemd_units: self
                    .config
                    .show_systemd
                    .then(|| sorted(facts.systemd_units())),
                includes: sorted(facts.includes()),
            })
            .collect();

        let report = JsonReport {
            states,
            totals: model.totals(),
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    fn name(&self) -> &'static str {
        "json"
    }

    fn format(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GraphBuilder, StateFacts};

    #[test]
    fn test_json_report() {
        let mut builder = GraphBuilder::new();
        let mut web = StateFacts::new();
        web.add_systemd_unit("nginx");
        web.add_include("web.logging");
        builder.merge("web", web);

        let json = JsonRenderer::new().render(&builder.finalize()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["states"][0]["name"], "web");
        assert_eq!(value["states"][0]["systemd_units"][0], "nginx");
        assert_eq!(value["totals"]["systemd_units"], 1);
        assert_eq!(value["totals"]["states"], 1);
    }

    #[test]
    fn test_hidden_categories_are_omitted() {
        let mut builder = GraphBuilder::new();
        builder.add_state("db");
        let renderer = JsonRenderer::with_config(ReportConfig::new(false, true, false));
        let json = renderer.render(&builder.finalize()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["states"][0].get("pillar_dependencies").is_none());
        assert!(value["states"][0].get("systemd_units").is_none());
        assert!(value["states"][0].get("role_dependencies").is_some());
    }
}
