use std::sync::Arc;

use crate::config::Config;
use crate::extraction::extractor::ResumeExtractor;
use crate::extraction::reader::DocumentReader;
use crate::matching::scorer::MatchScorer;
use crate::store::{PortalStore, ResumeStorage};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Candidates, approved jobs, and resume records.
    pub store: Arc<dyn PortalStore>,
    /// Raw resume files, keyed by storage key.
    pub storage: Arc<dyn ResumeStorage>,
    pub reader: Arc<dyn DocumentReader>,
    pub extractor: Arc<ResumeExtractor>,
    /// Pluggable match scorer. Default: WeightedMatchScorer with the portal weights.
    pub scorer: Arc<dyn MatchScorer>,
    pub config: Config,
}

#[cfg(test)]
pub use test_support::{test_config, test_state};
