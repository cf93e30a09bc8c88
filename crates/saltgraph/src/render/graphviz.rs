//! External Graphviz backend
//!
//! Pipes a DOT document into the `dot` executable. Every failure surfaces as
//! [`GraphError::RenderBackend`] so the caller can fall back to text.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::core::GraphError;

pub const DEFAULT_PROGRAM: &str = "dot";
pub const DEFAULT_FORMAT: &str = "svg";
pub const DEFAULT_BASE_NAME: &str = "salt_states";

/// Invokes a Graphviz layout program
#[derive(Debug, Clone)]
pub struct GraphvizBackend {
    program: String,
    format: String,
}

impl Default for GraphvizBackend {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            format: DEFAULT_FORMAT.to_string(),
        }
    }
}

impl GraphvizBackend {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Self::default()
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Locate the layout program on `PATH`
    pub fn locate(&self) -> Result<PathBuf, GraphError> {
        which::which(&self.program).map_err(|e| {
            GraphError::render_backend(format!(
                "Graphviz executable '{}' not found: {}",
                self.program, e
            ))
        })
    }

    pub fn is_available(&self) -> bool {
        self.locate().is_ok()
    }

    /// Path the backend writes for a caller-chosen base path
    ///
    /// Any extension on `base` is replaced by the output format.
    pub fn output_path(&self, base: Option<&Path>) -> PathBuf {
        base.unwrap_or_else(|| Path::new(DEFAULT_BASE_NAME))
            .with_extension(&self.format)
    }

    /// Lay out `dot` and write the image, returning its path
    pub fn render(&self, dot: &str, base: Option<&Path>) -> Result<PathBuf, GraphError> {
        let program = self.locate()?;
        let output = self.output_path(base);
        debug!(program = %program.display(), output = %output.display(), "Invoking graphviz");

        let mut child = Command::new(&program)
            .arg(format!("-T{}", self.format))
            .arg("-o")
            .arg(&output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| GraphError::render_backend(format!("Failed to start graphviz: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(dot.as_bytes()).map_err(|e| {
                GraphError::render_backend(format!("Failed to send graph to graphviz: {}", e))
            })?;
        }

        let result = child
            .wait_with_output()
            .map_err(|e| GraphError::render_backend(format!("Graphviz did not finish: {}", e)))?;
        if !result.status.success() {
            return Err(GraphError::render_backend(format!(
                "Graphviz exited with {}: {}",
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }

        info!("Graphical visualization written to {}", output.display());
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_replaces_extension() {
        let backend = GraphvizBackend::new("png");
        assert_eq!(
            backend.output_path(Some(Path::new("out/graph.svg"))),
            PathBuf::from("out/graph.png")
        );
        assert_eq!(
            backend.output_path(Some(Path::new("graph"))),
            PathBuf::from("graph.png")
        );
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            GraphvizBackend::default().output_path(None),
            PathBuf::from("salt_states.svg")
        );
    }

    #[test]
    fn test_missing_program_is_a_backend_error() {
        let backend = GraphvizBackend::default().with_program("saltgraph-no-such-dot-binary");
        assert!(!backend.is_available());
        let err = backend.render("digraph {}", None).unwrap_err();
        assert!(matches!(err, GraphError::RenderBackend { .. }));
    }
}
