//! Fact extractor trait
//!
//! Every text-pattern pass over a normalized definition file implements
//! this trait so the state extractor can run them as one battery.

use super::StateFacts;

/// Core trait for text-pattern fact extractors
///
/// Implementations must only add facts; they never remove what another
/// extractor recorded, so running the battery in any order gives the same
/// union.
pub trait FactExtractor: Send + Sync {
    /// Scan normalized `text` belonging to `state` and record what matches
    fn extract(&self, state: &str, text: &str, facts: &mut StateFacts);

    /// Get the name of this extractor (used in trace output)
    fn name(&self) -> &'static str;
}
