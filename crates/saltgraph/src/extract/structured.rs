//! Structured (YAML) stage of the extraction pass
//!
//! Parses normalized definition text as a mapping/sequence document and
//! walks it for service declarations. A parse failure is an ordinary outcome:
//! the caller logs it and relies on the heuristic battery alone.

use serde_yaml::Value;
use tracing::trace;

use crate::core::StateFacts;

const SERVICE_RUNNING: &str = "service.running";
const SYSTEMD_PREFIX: &str = "systemd.";

/// Untyped document shape, visited only through its containers
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Mapping(Vec<(String, Node)>),
    Sequence(Vec<Node>),
    /// `None` for null values
    Scalar(Option<String>),
}

impl Node {
    /// Convert a parsed YAML value, unwrapping tags
    pub fn from_yaml(value: Value) -> Self {
        match value {
            Value::Null => Node::Scalar(None),
            Value::Bool(b) => Node::Scalar(Some(b.to_string())),
            Value::Number(n) => Node::Scalar(Some(n.to_string())),
            Value::String(s) => Node::Scalar(Some(s)),
            Value::Sequence(items) => Node::Sequence(items.into_iter().map(Node::from_yaml).collect()),
            Value::Mapping(map) => Node::Mapping(
                map.into_iter()
                    .filter_map(|(key, value)| scalar_key(key).map(|k| (k, Node::from_yaml(value))))
                    .collect(),
            ),
            Value::Tagged(tagged) => Node::from_yaml(tagged.value),
        }
    }

    fn entry(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    fn scalar(&self) -> Option<&str> {
        match self {
            Node::Scalar(Some(s)) if !s.trim().is_empty() => Some(s.trim()),
            _ => None,
        }
    }

    /// Explicit `name` argument of a state declaration
    ///
    /// Accepts both a mapping of arguments and the list-of-single-key-mappings
    /// form.
    fn name_argument(&self) -> Option<&str> {
        match self {
            Node::Mapping(_) => self.entry("name").and_then(Node::scalar),
            Node::Sequence(items) => items
                .iter()
                .find_map(|item| item.entry("name").and_then(Node::scalar)),
            Node::Scalar(_) => None,
        }
    }

    /// Record service units declared anywhere below this node
    pub fn collect_units(&self, facts: &mut StateFacts) {
        match self {
            Node::Mapping(entries) => {
                for (key, value) in entries {
                    if let Node::Mapping(declarations) = value {
                        for (function, args) in declarations {
                            if function == SERVICE_RUNNING || function.starts_with(SYSTEMD_PREFIX) {
                                let unit = args.name_argument().unwrap_or(key.as_str());
                                trace!(unit, function = function.as_str(), "Structured unit");
                                facts.add_systemd_unit(unit);
                            }
                        }
                    }
                    value.collect_units(facts);
                }
            }
            Node::Sequence(items) => {
                for item in items {
                    item.collect_units(facts);
                }
            }
            Node::Scalar(_) => {}
        }
    }
}

fn scalar_key(key: Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_key(tagged.value),
        _ => None,
    }
}

/// Strip the comment block at the top of a file, if any
pub fn strip_leading_comments(text: &str) -> &str {
    let mut rest = text;
    while rest.starts_with('#') {
        match rest.find('\n') {
            Some(end) => rest = &rest[end + 1..],
            None => return "",
        }
    }
    rest
}

/// Structured parse of a definition file
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredPass;

impl StructuredPass {
    pub fn new() -> Self {
        Self
    }

    /// Parse normalized text; `Ok` carries the document only when its top
    /// level is a mapping
    pub fn parse(&self, text: &str) -> Result<Option<Node>, serde_yaml::Error> {
        let value: Value = serde_yaml::from_str(strip_leading_comments(text))?;
        match Node::from_yaml(value) {
            node @ Node::Mapping(_) => Ok(Some(node)),
            _ => Ok(None),
        }
    }

    /// Run the structured stage, returning the units it found
    pub fn extract(&self, text: &str) -> Result<StateFacts, serde_yaml::Error> {
        let mut facts = StateFacts::new();
        if let Some(document) = self.parse(text)? {
            document.collect_units(&mut facts);
        }
        Ok(facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(text: &str) -> Vec<String> {
        StructuredPass::new()
            .extract(text)
            .unwrap()
            .systemd_units()
            .iter()
            .cloned()
            .collect()
    }

    #[test]
    fn test_service_running_with_name_argument() {
        let text = "webserver:\n  service.running:\n    - name: nginx\n    - enable: True\n";
        assert_eq!(units(text), vec!["nginx"]);
    }

    #[test]
    fn test_service_running_falls_back_to_identifier() {
        let text = "php-fpm:\n  service.running:\n    - enable: True\n";
        assert_eq!(units(text), vec!["php-fpm"]);
    }

    #[test]
    fn test_bare_declaration_uses_identifier() {
        let text = "redis:\n  service.running: []\ncron:\n  service.running:\n";
        assert_eq!(units(text), vec!["cron", "redis"]);
    }

    #[test]
    fn test_systemd_prefix_declarations() {
        let text = "reload-units:\n  systemd.daemon_reload: {}\nbackup-timer:\n  systemd.unit_enabled:\n    name: backup.timer\n";
        assert_eq!(units(text), vec!["backup.timer", "reload-units"]);
    }

    #[test]
    fn test_declarations_nested_in_sequences() {
        let text = "groups:\n  - worker:\n      service.running:\n        - name: celery\n";
        assert_eq!(units(text), vec!["celery"]);
    }

    #[test]
    fn test_other_state_functions_are_ignored() {
        let text = "nginx:\n  pkg.installed: []\n  file.managed:\n    - name: /etc/nginx/nginx.conf\n";
        assert!(units(text).is_empty());
    }

    #[test]
    fn test_non_mapping_document_yields_nothing() {
        assert!(StructuredPass::new().parse("- a\n- b\n").unwrap().is_none());
        assert!(units("just a scalar").is_empty());
    }

    #[test]
    fn test_templating_is_a_parse_failure() {
        let text = "{% if grains['os'] == 'Debian' %}\nnginx:\n  service.running: []\n{% endif %}\n";
        assert!(StructuredPass::new().extract(text).is_err());
    }

    #[test]
    fn test_strip_leading_comments() {
        assert_eq!(strip_leading_comments("# a\n# b\nkey: v\n# c\n"), "key: v\n# c\n");
        assert_eq!(strip_leading_comments("# only"), "");
        assert_eq!(strip_leading_comments("key: v"), "key: v");
    }

    #[test]
    fn test_tagged_values_are_unwrapped() {
        let node = Node::from_yaml(serde_yaml::from_str("a: !custom\n  b: 1\n").unwrap());
        assert_eq!(
            node,
            Node::Mapping(vec![(
                "a".to_string(),
                Node::Mapping(vec![("b".to_string(), Node::Scalar(Some("1".to_string())))])
            )])
        );
    }
}
