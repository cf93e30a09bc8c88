//! Pipeline orchestrator
//!
//! The visualizer wires the stages together:
//! Discovery → Extraction → Finalize → Renderer

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info, span, warn, Level};

use crate::core::{ExtractionConfig, GraphBuilder, GraphModel, ReportConfig, Renderer};
use crate::extract::{StateDiscovery, StateExtractor, StateIndex};
use crate::render::{DotRenderer, GraphvizBackend, JsonRenderer, TextRenderer};

/// What a render call produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// A text document the caller still has to write
    Document(String),
    /// An image the backend already wrote
    Image(PathBuf),
}

/// Requested report kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Text,
    Json,
    Graphical,
}

/// Runs discovery, extraction and rendering over a state tree
pub struct Visualizer {
    discovery: StateDiscovery,
    extractor: StateExtractor,
}

impl Visualizer {
    /// Create a visualizer with default extraction settings
    pub fn new() -> Result<Self> {
        Self::with_config(&ExtractionConfig::default())
    }

    pub fn with_config(config: &ExtractionConfig) -> Result<Self> {
        Ok(Self {
            discovery: StateDiscovery::new(config),
            extractor: StateExtractor::new(config)?,
        })
    }

    /// Discover the whole states under `root`
    pub fn discover(&self, root: &Path) -> Result<StateIndex> {
        Ok(self.discovery.discover(root)?)
    }

    /// Build the finalized graph for `root`
    ///
    /// Fails only when `root` is not a directory.
    pub fn build(&self, root: &Path) -> Result<GraphModel> {
        let build_span = span!(Level::INFO, "build_graph", root = %root.display());
        let _enter = build_span.enter();

        let index = self.discover(root)?;

        info!("Parsing state files...");
        let mut builder = GraphBuilder::new();
        self.extractor.extract_index(&index, &mut builder);

        let model = builder.finalize();
        debug!(states = model.state_count(), "Graph finalized");
        Ok(model)
    }

    /// Render a finalized model
    ///
    /// Graphical output falls back to the text report when the backend is
    /// missing or fails.
    pub fn render(
        &self,
        model: &GraphModel,
        mode: OutputMode,
        report: ReportConfig,
        backend: &GraphvizBackend,
        output: Option<&Path>,
    ) -> Result<RenderOutcome> {
        let render_span = span!(Level::INFO, "render", mode = ?mode);
        let _enter = render_span.enter();

        match mode {
            OutputMode::Text => {
                info!("Generating ASCII diagram...");
                Ok(RenderOutcome::Document(document(
                    &TextRenderer::with_config(report),
                    model,
                )?))
            }
            OutputMode::Json => Ok(RenderOutcome::Document(document(
                &JsonRenderer::with_config(report),
                model,
            )?)),
            OutputMode::Graphical => {
                info!(
                    "Generating graphical visualization in {} format...",
                    backend.format()
                );
                let dot = document(&DotRenderer::with_config(report), model)?;
                match backend.render(&dot, output) {
                    Ok(path) => Ok(RenderOutcome::Image(path)),
                    Err(e) => {
                        warn!("Error generating graphical output: {}", e);
                        warn!("Falling back to ASCII output...");
                        Ok(RenderOutcome::Document(document(
                            &TextRenderer::with_config(report),
                            model,
                        )?))
                    }
                }
            }
        }
    }
}

fn document<R: Renderer<Output = String>>(renderer: &R, model: &GraphModel) -> Result<String> {
    debug!(
        renderer = renderer.name(),
        format = renderer.format(),
        "Rendering report"
    );
    renderer.render(model)
}
