//! Saltgraph - Map the roles, pillars, systemd units and includes of SaltStack states
//!
//! A library for extracting a consolidated dependency graph from a tree of
//! SaltStack state directories and rendering it as a text tree, JSON or a
//! Graphviz card grid.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use saltgraph::render_text;
//!
//! let report = render_text("/srv/salt").unwrap();
//! println!("{}", report);
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual components:
//!
//! ```rust
//! use saltgraph::prelude::*;
//!
//! let extractor = StateExtractor::new(&ExtractionConfig::default()).unwrap();
//! let facts = extractor.extract(
//!     "web",
//!     "include:\n  - .logging\n\nnginx:\n  service.running:\n    - name: nginx\n",
//! );
//!
//! let mut builder = GraphBuilder::new();
//! builder.merge("web", facts);
//! let model = builder.finalize();
//!
//! let web = model.state("web").unwrap();
//! assert!(web.includes().contains("web.logging"));
//! assert!(web.systemd_units().contains("nginx"));
//!
//! let report = TextRenderer::new().render(&model).unwrap();
//! assert!(report.contains("State: web"));
//! ```

pub mod core;
pub mod extract;
pub mod orchestrator;
pub mod render;

pub use core::*;

use std::path::Path;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        ExtractionConfig, FactExtractor, GraphBuilder, GraphError, GraphModel, GraphTotals,
        ReportConfig, Renderer, StateFacts,
    };
    pub use crate::extract::{StateDiscovery, StateExtractor, StateIndex, TemplateNormalizer};
    pub use crate::orchestrator::{OutputMode, RenderOutcome, Visualizer};
    pub use crate::render::{DotRenderer, GraphvizBackend, JsonRenderer, TextRenderer};
}

/// Build the graph for a state tree with default settings
///
/// # Example
/// ```rust,no_run
/// let model = saltgraph::build("/srv/salt").unwrap();
/// for name in model.state_names() {
///     println!("{}", name);
/// }
/// ```
pub fn build(root: impl AsRef<Path>) -> anyhow::Result<GraphModel> {
    orchestrator::Visualizer::new()?.build(root.as_ref())
}

/// Build the graph for a state tree and render the text report
pub fn render_text(root: impl AsRef<Path>) -> anyhow::Result<String> {
    let model = build(root)?;
    render::TextRenderer::new().render(&model)
}
