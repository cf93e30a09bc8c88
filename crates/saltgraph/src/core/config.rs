//! Configuration for extraction and reporting

/// Knobs for the discovery and extraction stages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionConfig {
    /// File whose presence turns a directory into a whole state
    pub entry_file: String,
    /// Extension (without the dot) of definition files
    pub extension: String,
    /// Call that checks whether the minion carries a role
    pub role_check_call: String,
    /// Call that looks up a pillar key
    pub pillar_lookup_call: String,
    /// Literal recurring timer unit picked up wherever it appears
    pub recurring_timer: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            entry_file: "init.sls".to_string(),
            extension: "sls".to_string(),
            role_check_call: "salt.pixpillar.nodehasrole".to_string(),
            pillar_lookup_call: "salt.pillar.get".to_string(),
            recurring_timer: "ap-analytics@*.timer".to_string(),
        }
    }
}

impl ExtractionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry_file(mut self, entry_file: impl Into<String>) -> Self {
        self.entry_file = entry_file.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    pub fn with_role_check_call(mut self, call: impl Into<String>) -> Self {
        self.role_check_call = call.into();
        self
    }

    pub fn with_pillar_lookup_call(mut self, call: impl Into<String>) -> Self {
        self.pillar_lookup_call = call.into();
        self
    }

    pub fn with_recurring_timer(mut self, timer: impl Into<String>) -> Self {
        self.recurring_timer = timer.into();
        self
    }
}

/// Which fact categories a report shows
///
/// Declared roles and includes are always shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportConfig {
    pub show_pillars: bool,
    pub show_role_dependencies: bool,
    pub show_systemd: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            show_pillars: true,
            show_role_dependencies: true,
            show_systemd: true,
        }
    }
}

impl ReportConfig {
    pub fn new(show_pillars: bool, show_role_dependencies: bool, show_systemd: bool) -> Self {
        Self {
            show_pillars,
            show_role_dependencies,
            show_systemd,
        }
    }
}
