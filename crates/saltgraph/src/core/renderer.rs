//! Core renderer trait for graph reports

use super::GraphModel;
use anyhow::Result;

/// Core trait for turning a finalized graph into a document
///
/// Renderers only read the model; they never change facts.
pub trait Renderer {
    /// The output type produced by this renderer
    type Output;

    /// Render the model
    fn render(&self, model: &GraphModel) -> Result<Self::Output>;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;

    /// Get the output format name (e.g. "text", "dot", "json")
    fn format(&self) -> &'static str;
}
