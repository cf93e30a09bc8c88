//! Fact extraction from state definition files
//!
//! Each file goes through the same steps:
//!
//! 1. placeholders are normalized ([`TemplateNormalizer`]);
//! 2. the structured stage tries to read the text as a YAML mapping
//!    ([`StructuredPass`]); failing that is not an error;
//! 3. the heuristic battery ([`UnitHeuristics`]) and the reference
//!    extractors always run over the normalized text.
//!
//! Results are unioned into the owning state's facts. A file that cannot be
//! read is logged and skipped.

pub mod discovery;
pub mod normalize;
pub mod references;
pub mod structured;
pub mod units;

pub use discovery::{StateDiscovery, StateIndex};
pub use normalize::TemplateNormalizer;
pub use references::{IncludeExtractor, PillarExtractor, RoleDependencyExtractor, RoleExtractor};
pub use structured::{Node, StructuredPass};
pub use units::{UnitHeuristics, UnitPattern};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, span, trace, warn, Level};
use walkdir::WalkDir;

use crate::core::{ExtractionConfig, FactExtractor, GraphBuilder, GraphError, StateFacts};

/// Runs every extraction stage over the files of a state
pub struct StateExtractor {
    extension: String,
    normalizer: TemplateNormalizer,
    structured: StructuredPass,
    extractors: Vec<Box<dyn FactExtractor>>,
}

impl StateExtractor {
    pub fn new(config: &ExtractionConfig) -> Result<Self, GraphError> {
        let extractors: Vec<Box<dyn FactExtractor>> = vec![
            Box::new(UnitHeuristics::new(config)?),
            Box::new(RoleExtractor::new()?),
            Box::new(RoleDependencyExtractor::new(config)?),
            Box::new(PillarExtractor::new(config)?),
            Box::new(IncludeExtractor::new()?),
        ];
        Ok(Self {
            extension: config.extension.clone(),
            normalizer: TemplateNormalizer::new()?,
            structured: StructuredPass::new(),
            extractors,
        })
    }

    /// Names of the text-pattern extractors, in run order
    pub fn extractor_names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    /// Extract the facts one file's content contributes to `state`
    pub fn extract(&self, state: &str, content: &str) -> StateFacts {
        let text = self.normalizer.normalize(content);

        let mut facts = match self.structured.extract(&text) {
            Ok(facts) => facts,
            Err(e) => {
                trace!(state, error = %e, "Structured parse failed, using heuristics only");
                StateFacts::new()
            }
        };

        for extractor in &self.extractors {
            extractor.extract(state, &text, &mut facts);
        }
        facts
    }

    /// Read and extract one file
    pub fn extract_file(&self, state: &str, path: &Path) -> Result<StateFacts, GraphError> {
        let content = fs::read_to_string(path).map_err(|e| GraphError::file_parse(path, e))?;
        Ok(self.extract(state, &content))
    }

    /// Definition files below `dir`, in sorted path order
    pub fn definition_files(&self, dir: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            match entry {
                Ok(entry) => {
                    let is_definition = entry.file_type().is_file()
                        && entry
                            .path()
                            .extension()
                            .is_some_and(|ext| ext == self.extension.as_str());
                    if is_definition {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => warn!(dir = %dir.display(), "Skipping unreadable entry: {}", e),
            }
        }
        files
    }

    /// Extract the given files into `builder` under `state`
    ///
    /// A file that fails is logged and contributes nothing.
    pub fn extract_files(&self, state: &str, files: &[PathBuf], builder: &mut GraphBuilder) {
        builder.add_state(state);
        for path in files {
            match self.extract_file(state, path) {
                Ok(facts) => builder.merge(state, facts),
                Err(e) => warn!("{}", e),
            }
        }
    }

    /// Extract every state of a discovery index into `builder`
    pub fn extract_index(&self, index: &StateIndex, builder: &mut GraphBuilder) {
        for (state, dirs) in index.iter() {
            let state_span = span!(Level::DEBUG, "extract_state", state = %state);
            let _enter = state_span.enter();

            let mut files: Vec<PathBuf> = dirs
                .iter()
                .flat_map(|dir| self.definition_files(dir))
                .collect();
            files.sort();
            files.dedup();
            debug!(file_count = files.len(), "Parsing state files");

            self.extract_files(state, &files, builder);
        }
    }
}
