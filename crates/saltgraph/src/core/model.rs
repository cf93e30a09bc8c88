//! Graph model: per-state fact sets and their consolidation
//!
//! Facts are accumulated in a [`GraphBuilder`] while files are extracted and
//! frozen into a read-only [`GraphModel`] by [`GraphBuilder::finalize`].
//! Every category is duplicate-free. Declared roles and role dependencies keep
//! first-seen order; the remaining categories are kept sorted.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Facts known about a single state (or produced by a single file)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateFacts {
    roles: Vec<String>,
    role_dependencies: Vec<String>,
    pillar_dependencies: BTreeSet<String>,
    systemd_units: BTreeSet<String>,
    includes: BTreeSet<String>,
}

impl StateFacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a declared role, keeping declaration order
    pub fn add_role(&mut self, role: impl Into<String>) {
        push_unique(&mut self.roles, role.into());
    }

    /// Record a role referenced by a conditional check
    pub fn add_role_dependency(&mut self, role: impl Into<String>) {
        push_unique(&mut self.role_dependencies, role.into());
    }

    pub fn add_pillar_dependency(&mut self, key: impl Into<String>) {
        self.pillar_dependencies.insert(key.into());
    }

    pub fn add_systemd_unit(&mut self, unit: impl Into<String>) {
        self.systemd_units.insert(unit.into());
    }

    pub fn add_include(&mut self, include: impl Into<String>) {
        self.includes.insert(include.into());
    }

    /// Union another fact set into this one
    pub fn merge(&mut self, other: StateFacts) {
        for role in other.roles {
            push_unique(&mut self.roles, role);
        }
        for role in other.role_dependencies {
            push_unique(&mut self.role_dependencies, role);
        }
        self.pillar_dependencies.extend(other.pillar_dependencies);
        self.systemd_units.extend(other.systemd_units);
        self.includes.extend(other.includes);
    }

    /// Declared roles in declaration order
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Every role dependency, including ones the state also declares
    pub fn role_dependencies(&self) -> &[String] {
        &self.role_dependencies
    }

    /// Role dependencies that are not declared roles of the same state
    pub fn reported_role_dependencies(&self) -> Vec<&str> {
        self.role_dependencies
            .iter()
            .filter(|dep| !self.roles.contains(dep))
            .map(String::as_str)
            .collect()
    }

    pub fn pillar_dependencies(&self) -> &BTreeSet<String> {
        &self.pillar_dependencies
    }

    pub fn systemd_units(&self) -> &BTreeSet<String> {
        &self.systemd_units
    }

    pub fn includes(&self) -> &BTreeSet<String> {
        &self.includes
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
            && self.role_dependencies.is_empty()
            && self.pillar_dependencies.is_empty()
            && self.systemd_units.is_empty()
            && self.includes.is_empty()
    }
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

/// Mutable accumulator used during the extraction pass
#[derive(Debug, Default)]
pub struct GraphBuilder {
    states: BTreeMap<String, StateFacts>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a discovered state (no-op if already known)
    pub fn add_state(&mut self, name: impl Into<String>) {
        self.states.entry(name.into()).or_default();
    }

    /// Union a file's facts into the owning state's facts
    pub fn merge(&mut self, state: &str, facts: StateFacts) {
        match self.states.get_mut(state) {
            Some(existing) => existing.merge(facts),
            None => {
                self.states.insert(state.to_string(), facts);
            }
        }
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Freeze the accumulated facts
    pub fn finalize(self) -> GraphModel {
        GraphModel {
            states: self.states,
        }
    }
}

/// Immutable, query-only view of all extracted facts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphModel {
    states: BTreeMap<String, StateFacts>,
}

impl GraphModel {
    /// State names in lexicographic order
    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    /// States with their facts in lexicographic order
    pub fn states(&self) -> impl Iterator<Item = (&str, &StateFacts)> {
        self.states.iter().map(|(name, facts)| (name.as_str(), facts))
    }

    pub fn state(&self, name: &str) -> Option<&StateFacts> {
        self.states.get(name)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Sizes of the union of each category across all states
    pub fn totals(&self) -> GraphTotals {
        let mut roles = BTreeSet::new();
        let mut role_dependencies = BTreeSet::new();
        let mut pillar_dependencies = BTreeSet::new();
        let mut systemd_units = BTreeSet::new();
        let mut includes = BTreeSet::new();

        for facts in self.states.values() {
            roles.extend(facts.roles.iter());
            role_dependencies.extend(facts.role_dependencies.iter());
            pillar_dependencies.extend(facts.pillar_dependencies.iter());
            systemd_units.extend(facts.systemd_units.iter());
            includes.extend(facts.includes.iter());
        }

        GraphTotals {
            states: self.states.len(),
            roles: roles.len(),
            role_dependencies: role_dependencies.len(),
            pillar_dependencies: pillar_dependencies.len(),
            systemd_units: systemd_units.len(),
            includes: includes.len(),
        }
    }
}

/// Aggregate counts for summary lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphTotals {
    pub states: usize,
    pub roles: usize,
    pub role_dependencies: usize,
    pub pillar_dependencies: usize,
    pub systemd_units: usize,
    pub includes: usize,
}
