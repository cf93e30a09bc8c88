//! Report renderers
//!
//! Text, JSON and DOT renderers implement [`crate::core::Renderer`]; the
//! Graphviz backend turns a DOT document into an image file.

pub mod dot;
pub mod graphviz;
pub mod json;
pub mod text;

pub use dot::DotRenderer;
pub use graphviz::GraphvizBackend;
pub use json::JsonRenderer;
pub use text::TextRenderer;
