//! Diagnostics — classification percentages, data-quality warnings and the
//! one-line summary.

use reelsift_core::config::WarningThresholds;
use reelsift_core::{Classification, ContentAtom, Severity, StructuredEntities, Warning, WarningKind};

/// Share of classified atoms that are promotional and actionable, as
/// percentages rounded to one decimal.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Percentages {
    pub promotional: f64,
    pub actionable: f64,
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub fn percentages(atoms: &[ContentAtom]) -> Percentages {
    let classified: Vec<Classification> = atoms.iter().filter_map(|a| a.classification).collect();
    if classified.is_empty() {
        return Percentages::default();
    }
    let total = classified.len() as f64;
    let share = |c: Classification| {
        round1(classified.iter().filter(|x| **x == c).count() as f64 / total * 100.0)
    };
    Percentages {
        promotional: share(Classification::Promotional),
        actionable: share(Classification::Actionable),
    }
}

/// Inputs the warning rules look at.
#[derive(Debug, Clone, Copy)]
pub struct QualityFacts {
    pub percentages: Percentages,
    pub entity_count: usize,
    pub raw_word_count: usize,
    pub filtered_word_count: usize,
}

pub fn warnings(facts: &QualityFacts, thresholds: &WarningThresholds) -> Vec<Warning> {
    let mut out = Vec::new();
    let p = facts.percentages;

    if p.promotional > thresholds.mostly_promotional_pct {
        out.push(Warning {
            kind: WarningKind::MostlyPromotional,
            severity: Severity::Warning,
            message: format!("{}% of content is promotional", p.promotional),
        });
    }
    if p.actionable < thresholds.low_confidence_actionable_pct
        && facts.raw_word_count > thresholds.low_confidence_min_raw_words
    {
        out.push(Warning {
            kind: WarningKind::LowConfidence,
            severity: Severity::Info,
            message: format!("Only {}% of content is actionable", p.actionable),
        });
    }
    if facts.entity_count == 0 && facts.raw_word_count > thresholds.no_actionable_min_raw_words {
        out.push(Warning {
            kind: WarningKind::NoActionable,
            severity: Severity::Warning,
            message: "No venues, prices, times or other plannable details found".to_string(),
        });
    }
    if facts.filtered_word_count < thresholds.extraction_failed_max_filtered_words
        && facts.raw_word_count > thresholds.extraction_failed_min_raw_words
    {
        out.push(Warning {
            kind: WarningKind::ExtractionFailed,
            severity: Severity::Error,
            message: format!(
                "Only {} of {} words survived filtering",
                facts.filtered_word_count, facts.raw_word_count
            ),
        });
    }
    out
}

fn count(n: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", n, if n == 1 { singular } else { plural })
}

/// One-line digest of what survived.
pub fn summary(structured: &StructuredEntities, filtered_segments: usize) -> String {
    let mut parts = Vec::new();
    if !structured.venues.is_empty() {
        parts.push(count(structured.venues.len(), "venue", "venues"));
    }
    if !structured.prices.is_empty() {
        parts.push(count(structured.prices.len(), "price", "prices"));
    }
    if !structured.times.is_empty() {
        parts.push(count(structured.times.len(), "time", "times"));
    }
    if !structured.tips.is_empty() {
        parts.push(count(structured.tips.len(), "tip", "tips"));
    }

    match (parts.is_empty(), filtered_segments) {
        (true, 0) => "No plannable entities found".to_string(),
        (true, n) => format!(
            "No plannable entities found in {}",
            count(n, "filtered segment", "filtered segments")
        ),
        (false, n) => format!(
            "Found {} across {}",
            parts.join(", "),
            count(n, "filtered segment", "filtered segments")
        ),
    }
}
