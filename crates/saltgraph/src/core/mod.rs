//! Core abstractions for state graph extraction
//!
//! This module holds the data model, the extractor and renderer traits,
//! configuration, errors and logging shared by every pipeline stage.

mod config;
mod error;
mod extractor;
pub mod logging;
mod model;
mod renderer;

pub use config::*;
pub use error::*;
pub use extractor::*;
pub use logging::*;
pub use model::*;
pub use renderer::*;
