//! Whole-state discovery
//!
//! A whole state is any directory below the root that directly holds the
//! entry file (`init.sls` by default). Its name is the directory's base name.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, span, warn, Level};
use walkdir::{DirEntry, WalkDir};

use crate::core::{ExtractionConfig, GraphError};

/// Discovered states and the directories that define them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateIndex {
    states: BTreeMap<String, BTreeSet<PathBuf>>,
}

impl StateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a directory for a state name; duplicate names collapse
    pub fn insert(&mut self, name: impl Into<String>, dir: impl Into<PathBuf>) {
        self.states.entry(name.into()).or_default().insert(dir.into());
    }

    /// Sorted, deduplicated state names
    pub fn names(&self) -> BTreeSet<String> {
        self.states.keys().cloned().collect()
    }

    /// Directories recorded for a state
    pub fn directories(&self, name: &str) -> impl Iterator<Item = &Path> {
        self.states
            .get(name)
            .into_iter()
            .flat_map(|dirs| dirs.iter().map(PathBuf::as_path))
    }

    /// States with their directories in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<PathBuf>)> {
        self.states.iter().map(|(name, dirs)| (name.as_str(), dirs))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Scans a root path for whole states
#[derive(Debug, Clone)]
pub struct StateDiscovery {
    entry_file: String,
}

impl StateDiscovery {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            entry_file: config.entry_file.clone(),
        }
    }

    /// Discover every whole state under `root`
    ///
    /// A root that is not a directory is fatal. A failing traversal is not:
    /// unreadable entries are skipped, and a root that cannot be enumerated
    /// yields an empty index.
    pub fn discover(&self, root: &Path) -> Result<StateIndex, GraphError> {
        let discover_span = span!(Level::INFO, "discover", root = %root.display());
        let _enter = discover_span.enter();

        if !root.is_dir() {
            return Err(GraphError::invalid_root(root));
        }

        info!("Finding whole states in {}", root.display());
        Ok(self.index_entries(root, WalkDir::new(root).sort_by_file_name()))
    }

    /// Sorted state names under `root`
    pub fn discover_names(&self, root: &Path) -> Result<BTreeSet<String>, GraphError> {
        Ok(self.discover(root)?.names())
    }

    /// Build the index from a directory walk of `root`
    pub fn index_entries<I>(&self, root: &Path, entries: I) -> StateIndex
    where
        I: IntoIterator<Item = walkdir::Result<DirEntry>>,
    {
        match self.scan(root, entries) {
            Ok(index) => {
                info!("Found {} whole states", index.len());
                index
            }
            Err(e) => {
                error!("Error finding whole states: {}", e);
                StateIndex::new()
            }
        }
    }

    fn scan<I>(&self, root: &Path, entries: I) -> Result<StateIndex, GraphError>
    where
        I: IntoIterator<Item = walkdir::Result<DirEntry>>,
    {
        let mut index = StateIndex::new();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(GraphError::discovery(root, e.to_string()));
                }
                Err(e) => {
                    warn!(root = %root.display(), "Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() || entry.file_name() != self.entry_file.as_str() {
                continue;
            }
            let Some(dir) = entry.path().parent() else {
                continue;
            };
            let Some(name) = dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            debug!(state = name.as_str(), dir = %dir.display(), "Whole state");
            index.insert(name, dir);
        }

        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GraphBuilder, Renderer};
    use crate::extract::StateExtractor;
    use crate::render::TextRenderer;
    use std::fs;
    use tempfile::tempdir;

    fn discovery() -> StateDiscovery {
        StateDiscovery::new(&ExtractionConfig::default())
    }

    #[test]
    fn test_discovers_sorted_state_names() {
        let dir = tempdir().unwrap();
        for state in ["web", "db", "monitoring"] {
            fs::create_dir(dir.path().join(state)).unwrap();
            fs::write(dir.path().join(state).join("init.sls"), "").unwrap();
        }
        fs::create_dir(dir.path().join("files")).unwrap();
        fs::write(dir.path().join("files").join("nginx.conf"), "").unwrap();

        let names: Vec<String> = discovery().discover_names(dir.path()).unwrap().into_iter().collect();
        assert_eq!(names, vec!["db", "monitoring", "web"]);
    }

    #[test]
    fn test_duplicate_names_collapse() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a").join("common")).unwrap();
        fs::create_dir_all(dir.path().join("b").join("common")).unwrap();
        fs::write(dir.path().join("a").join("common").join("init.sls"), "").unwrap();
        fs::write(dir.path().join("b").join("common").join("init.sls"), "").unwrap();

        let index = discovery().discover(dir.path()).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.directories("common").count(), 2);
    }

    #[test]
    fn test_entry_file_must_be_a_file() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("odd").join("init.sls")).unwrap();

        let index = discovery().discover(dir.path()).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = tempdir().unwrap();
        let result = discovery().discover(&dir.path().join("nope"));
        assert!(matches!(result, Err(GraphError::InvalidRoot { .. })));
    }

    #[test]
    fn test_file_root_is_fatal() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("top.sls");
        fs::write(&file, "base: {}").unwrap();
        assert!(discovery().discover(&file).unwrap_err().is_fatal());
    }

    #[test]
    fn test_custom_entry_file() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("web")).unwrap();
        fs::write(dir.path().join("web").join("main.sls"), "").unwrap();

        let config = ExtractionConfig::default().with_entry_file("main.sls");
        let names = StateDiscovery::new(&config).discover_names(dir.path()).unwrap();
        assert!(names.contains("web"));
    }

    #[test]
    fn test_unenumerable_root_degrades_to_empty_report() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone");

        let index = discovery().index_entries(&missing, WalkDir::new(&missing));
        assert!(index.is_empty());

        let extractor = StateExtractor::new(&ExtractionConfig::default()).unwrap();
        let mut builder = GraphBuilder::new();
        extractor.extract_index(&index, &mut builder);
        let report = TextRenderer::new().render(&builder.finalize()).unwrap();
        assert!(report.contains("Total States: 0"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_entry_keeps_other_states() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("web")).unwrap();
        fs::write(dir.path().join("web").join("init.sls"), "").unwrap();
        std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join("secrets"))
            .unwrap();

        // Following links turns the dangling link into a walk error below the root
        let walk = WalkDir::new(dir.path()).follow_links(true).sort_by_file_name();
        let index = discovery().index_entries(dir.path(), walk);
        assert_eq!(index.names().into_iter().collect::<Vec<_>>(), vec!["web"]);
    }
}
