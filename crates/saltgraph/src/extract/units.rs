//! Heuristic battery for systemd unit declarations
//!
//! Each pattern targets one way a unit shows up in a state file. Patterns
//! overlap on purpose; matches are unioned into one set per state.

use regex::Regex;
use tracing::trace;

use crate::core::{ExtractionConfig, FactExtractor, GraphError, StateFacts};

/// One heuristic: a regex whose first capture group is the unit name
#[derive(Debug, Clone)]
pub struct UnitPattern {
    name: &'static str,
    regex: Regex,
}

impl UnitPattern {
    pub fn new(name: &'static str, pattern: &str) -> Result<Self, GraphError> {
        Ok(Self {
            name,
            regex: Regex::new(pattern)?,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Unit names this pattern finds in `text`, trimmed, in match order
    pub fn matches<'s, 't: 's>(&'s self, text: &'t str) -> impl Iterator<Item = &'t str> + 's {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|unit| !unit.is_empty())
    }
}

/// The ordered list of unit heuristics
#[derive(Debug, Clone)]
pub struct UnitHeuristics {
    patterns: Vec<UnitPattern>,
}

impl UnitHeuristics {
    pub fn new(config: &ExtractionConfig) -> Result<Self, GraphError> {
        let timer = format!("({})", regex::escape(&config.recurring_timer));
        let patterns = vec![
            UnitPattern::new(
                "service-running-name",
                r"service\.running:\s*\n\s*-\s*name:\s*([^\n]+)",
            )?,
            UnitPattern::new("service-running-id", r"([^:\n]+):\s*\n\s*service\.running")?,
            UnitPattern::new("systemd-name", r"systemd\.[^:]+:\s*\n\s*-\s*name:\s*([^\n]+)")?,
            UnitPattern::new(
                "service-disabled-name",
                r"service\.disabled:\s*\n\s*-\s*name:\s*([^\n]+)",
            )?,
            // Same shape as service-running-id, kept as its own entry.
            UnitPattern::new("service-id", r"([^:\n]+):\s*\n\s*service\.running")?,
            UnitPattern::new("systemctl-toggle", r"systemctl\s+(?:enable|disable)\s+([^\s&;]+)")?,
            UnitPattern::new("recurring-timer", &timer)?,
            UnitPattern::new(
                "templated-unit",
                r"([\w@.-]+@<[^>]+>\.(?:timer|service))",
            )?,
        ];
        Ok(Self { patterns })
    }

    pub fn patterns(&self) -> &[UnitPattern] {
        &self.patterns
    }
}

impl FactExtractor for UnitHeuristics {
    fn extract(&self, state: &str, text: &str, facts: &mut StateFacts) {
        for pattern in &self.patterns {
            for unit in pattern.matches(text) {
                trace!(state, heuristic = pattern.name(), unit, "Heuristic unit");
                facts.add_systemd_unit(unit);
            }
        }
    }

    fn name(&self) -> &'static str {
        "systemd-units"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heuristics() -> UnitHeuristics {
        UnitHeuristics::new(&ExtractionConfig::default()).unwrap()
    }

    fn units(text: &str) -> Vec<String> {
        let mut facts = StateFacts::new();
        heuristics().extract("test", text, &mut facts);
        facts.systemd_units().iter().cloned().collect()
    }

    fn pattern(name: &str) -> UnitPattern {
        heuristics()
            .patterns()
            .iter()
            .find(|p| p.name() == name)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_matches_borrow_the_text_not_the_pattern() {
        let text = String::from("nginx:\n  service.running:\n    - name: nginx\n");
        let found: Vec<&str> = {
            let battery = heuristics();
            battery.patterns()[0].matches(&text).collect()
        };
        assert_eq!(found, vec!["nginx"]);
    }

    #[test]
    fn test_battery_has_eight_heuristics() {
        assert_eq!(heuristics().patterns().len(), 8);
    }

    #[test]
    fn test_service_running_name() {
        let text = "web:\n  service.running:\n    - name: nginx\n";
        let found: Vec<&str> = pattern("service-running-name").matches(text).collect();
        assert_eq!(found, vec!["nginx"]);
    }

    #[test]
    fn test_identifier_before_service_running() {
        let text = "postfix:\n  service.running:\n    - enable: True\n";
        let found: Vec<&str> = pattern("service-running-id").matches(text).collect();
        assert_eq!(found, vec!["postfix"]);
        let repeat: Vec<&str> = pattern("service-id").matches(text).collect();
        assert_eq!(repeat, found);
    }

    #[test]
    fn test_systemd_name() {
        let text = "enable-timer:\n  systemd.unit_enabled:\n    - name: logrotate.timer\n";
        let found: Vec<&str> = pattern("systemd-name").matches(text).collect();
        assert_eq!(found, vec!["logrotate.timer"]);
    }

    #[test]
    fn test_service_disabled_name() {
        let text = "no-cups:\n  service.disabled:\n    - name: cups\n";
        let found: Vec<&str> = pattern("service-disabled-name").matches(text).collect();
        assert_eq!(found, vec!["cups"]);
    }

    #[test]
    fn test_systemctl_toggle_stops_at_operators() {
        let text = "cmd.run:\n  - name: systemctl enable backup.timer && systemctl disable old.timer;\n";
        let found: Vec<&str> = pattern("systemctl-toggle").matches(text).collect();
        assert_eq!(found, vec!["backup.timer", "old.timer"]);
    }

    #[test]
    fn test_recurring_timer_literal() {
        let text = "- source: salt://analytics/ap-analytics@*.timer\n";
        let found: Vec<&str> = pattern("recurring-timer").matches(text).collect();
        assert_eq!(found, vec!["ap-analytics@*.timer"]);
    }

    #[test]
    fn test_templated_unit_after_normalization() {
        let text = "- name: sync-worker@<site>.service\n- name: report@<site>.timer\n";
        let found: Vec<&str> = pattern("templated-unit").matches(text).collect();
        assert_eq!(found, vec!["sync-worker@<site>.service", "report@<site>.timer"]);
    }

    #[test]
    fn test_overlapping_shapes_collapse() {
        let text = "nginx:\n  service.running:\n    - name: nginx\n";
        assert_eq!(units(text), vec!["nginx"]);
    }

    #[test]
    fn test_custom_recurring_timer() {
        let config = ExtractionConfig::default().with_recurring_timer("cleanup@*.timer");
        let battery = UnitHeuristics::new(&config).unwrap();
        let mut facts = StateFacts::new();
        battery.extract("test", "run cleanup@*.timer daily", &mut facts);
        assert!(facts.systemd_units().contains("cleanup@*.timer"));
    }
}
