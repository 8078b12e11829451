//! ReelSift Infer — the optional classification capability.
//!
//! The `ClassificationProvider` trait abstracts over any external classifier
//! (an LLM, a hosted model). The pipeline works without one: `NoopClassifier`
//! reports itself unavailable and the heuristic result stands.

pub mod provider;

pub use provider::{classify_with_timeout, ClassificationProvider, NoopClassifier, ProviderVerdict};

use std::sync::Arc;

/// Default provider when none is configured.
pub fn create_provider() -> Arc<dyn ClassificationProvider> {
    tracing::info!("No classification provider configured. Using heuristics only.");
    Arc::new(NoopClassifier)
}
