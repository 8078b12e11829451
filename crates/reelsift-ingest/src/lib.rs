//! ReelSift Ingest — turns scraped social-media content into filtered,
//! entity-rich text for planning.

pub mod aggregate;
pub mod atoms;
pub mod classify;
pub mod combine;
pub mod content_type;
pub mod diagnostics;
pub mod extract;
pub mod pipeline;
pub mod prefilter;

pub use classify::{classify_text, Signals, Verdict};
pub use extract::extract_entities;
pub use pipeline::ContentFilter;
