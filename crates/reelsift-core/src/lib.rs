//! ReelSift Core — content atom data model, tunable heuristics, error types.

pub mod config;
pub mod error;
pub mod types;

pub use config::{ClassifierThresholds, SiftConfig, SourceWeights, WarningThresholds};
pub use error::{Error, Result};
pub use types::*;
