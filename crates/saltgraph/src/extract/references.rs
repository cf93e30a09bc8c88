//! Role, role-dependency, pillar and include extractors

use regex::Regex;
use tracing::trace;

use crate::core::{ExtractionConfig, FactExtractor, GraphError, StateFacts};

/// `role: <value>` declarations, kept in declaration order
#[derive(Debug, Clone)]
pub struct RoleExtractor {
    regex: Regex,
}

impl RoleExtractor {
    pub fn new() -> Result<Self, GraphError> {
        Ok(Self {
            regex: Regex::new(r"role\s*:\s*([^\n]+)")?,
        })
    }
}

impl FactExtractor for RoleExtractor {
    fn extract(&self, state: &str, text: &str, facts: &mut StateFacts) {
        for caps in self.regex.captures_iter(text) {
            let role = caps[1].trim();
            if !role.is_empty() {
                trace!(state, role, "Declared role");
                facts.add_role(role);
            }
        }
    }

    fn name(&self) -> &'static str {
        "roles"
    }
}

/// Builds a regex for `call('literal'`
///
/// The match stops at the closing quote, so further arguments are allowed and
/// a call nested in those arguments is matched on its own.
fn call_pattern(call: &str) -> Result<Regex, GraphError> {
    let pattern = format!(r#"{}\(\s*['"]([^'"]+)['"]"#, regex::escape(call));
    Ok(Regex::new(&pattern)?)
}

/// Roles referenced by the conditional role-check call
#[derive(Debug, Clone)]
pub struct RoleDependencyExtractor {
    regex: Regex,
}

impl RoleDependencyExtractor {
    pub fn new(config: &ExtractionConfig) -> Result<Self, GraphError> {
        Ok(Self {
            regex: call_pattern(&config.role_check_call)?,
        })
    }
}

impl FactExtractor for RoleDependencyExtractor {
    fn extract(&self, state: &str, text: &str, facts: &mut StateFacts) {
        for caps in self.regex.captures_iter(text) {
            let role = caps[1].trim();
            trace!(state, role, "Role dependency");
            facts.add_role_dependency(role);
        }
    }

    fn name(&self) -> &'static str {
        "role-dependencies"
    }
}

/// Pillar keys read through the lookup call
#[derive(Debug, Clone)]
pub struct PillarExtractor {
    regex: Regex,
}

impl PillarExtractor {
    pub fn new(config: &ExtractionConfig) -> Result<Self, GraphError> {
        Ok(Self {
            regex: call_pattern(&config.pillar_lookup_call)?,
        })
    }
}

impl FactExtractor for PillarExtractor {
    fn extract(&self, state: &str, text: &str, facts: &mut StateFacts) {
        for caps in self.regex.captures_iter(text) {
            let key = caps[1].trim();
            trace!(state, key, "Pillar dependency");
            facts.add_pillar_dependency(key);
        }
    }

    fn name(&self) -> &'static str {
        "pillar-dependencies"
    }
}

/// The first `include:` list block of a file
#[derive(Debug, Clone)]
pub struct IncludeExtractor {
    block: Regex,
    item: Regex,
}

impl IncludeExtractor {
    pub fn new() -> Result<Self, GraphError> {
        Ok(Self {
            block: Regex::new(r"include:\s*\n((?:\s*-\s*.*\n)+)")?,
            item: Regex::new(r"-\s*(.*)")?,
        })
    }

    /// Rewrite a relative reference (`.logging`) against the owning state
    pub fn resolve(state: &str, reference: &str) -> String {
        if reference.starts_with('.') {
            format!("{}{}", state, reference)
        } else {
            reference.to_string()
        }
    }
}

impl FactExtractor for IncludeExtractor {
    fn extract(&self, state: &str, text: &str, facts: &mut StateFacts) {
        let terminated;
        let text = if text.ends_with('\n') {
            text
        } else {
            terminated = format!("{}\n", text);
            &terminated
        };

        let Some(block) = self.block.captures(text).and_then(|caps| caps.get(1)) else {
            return;
        };
        for caps in self.item.captures_iter(block.as_str()) {
            let reference = caps[1].trim();
            if reference.is_empty() {
                continue;
            }
            let include = Self::resolve(state, reference);
            trace!(state, include = include.as_str(), "Include");
            facts.add_include(include);
        }
    }

    fn name(&self) -> &'static str {
        "includes"
    }
}
