//! Heuristic classifier — counts actionable signals and maps the count to a
//! classification with a fixed confidence.

use reelsift_core::{
    ClassifierThresholds, Classification, ContentAtom, EntityType, ExtractedEntity, SourceWeights,
};

use crate::extract::{has_family_match, patterns};

/// Actionable signals present in one text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub price: bool,
    pub address: bool,
    pub phone: bool,
    pub hours: bool,
    pub date: bool,
    pub time: bool,
    pub venue: bool,
    pub tip: bool,
    pub recommendation: bool,
    pub directive: bool,
}

impl Signals {
    pub fn detect(text: &str) -> Self {
        Self {
            price: has_family_match(EntityType::Price, text),
            address: has_family_match(EntityType::Address, text),
            phone: has_family_match(EntityType::Phone, text),
            hours: has_family_match(EntityType::Hours, text),
            date: has_family_match(EntityType::Date, text),
            time: has_family_match(EntityType::Time, text),
            venue: has_family_match(EntityType::Venue, text),
            tip: has_family_match(EntityType::Tip, text),
            recommendation: patterns::RECOMMENDATION.is_match(text),
            directive: patterns::DIRECTIVE.is_match(text),
        }
    }

    pub fn count(&self) -> usize {
        [
            self.price,
            self.address,
            self.phone,
            self.hours,
            self.date,
            self.time,
            self.venue,
            self.tip,
            self.recommendation,
            self.directive,
        ]
        .iter()
        .filter(|s| **s)
        .count()
    }
}

/// A classification decision not yet written to its atom.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub classification: Classification,
    pub confidence: f64,
    /// Entities supplied by an external provider, merged after extraction.
    pub entities: Vec<ExtractedEntity>,
}

impl Verdict {
    pub fn new(classification: Classification, confidence: f64) -> Self {
        Self {
            classification,
            confidence,
            entities: Vec::new(),
        }
    }
}

/// Classify one text with the signal-count rule.
pub fn classify_text(text: &str, thresholds: &ClassifierThresholds) -> Verdict {
    let text = text.trim();
    let len = text.chars().count();
    let signals = Signals::detect(text).count();

    if signals >= thresholds.strong_signal_count {
        Verdict::new(Classification::Actionable, thresholds.strong_confidence)
    } else if signals >= 1 {
        Verdict::new(Classification::Actionable, thresholds.single_signal_confidence)
    } else if len > thresholds.opinion_min_len && patterns::OPINION.is_match(text) {
        Verdict::new(Classification::Context, thresholds.opinion_confidence)
    } else if len < thresholds.noise_max_len {
        Verdict::new(Classification::Noise, thresholds.noise_confidence)
    } else {
        Verdict::new(Classification::Context, thresholds.default_confidence)
    }
}

/// Heuristic verdicts for every atom the pre-filter left unclassified.
/// Already-classified atoms get `None`.
pub fn classify_atoms(atoms: &[ContentAtom], thresholds: &ClassifierThresholds) -> Vec<Option<Verdict>> {
    atoms
        .iter()
        .map(|a| (!a.is_classified()).then(|| classify_text(&a.text, thresholds)))
        .collect()
}

/// source weight × classification multiplier × classification confidence.
pub fn plannability(
    atom: &ContentAtom,
    weights: &SourceWeights,
    thresholds: &ClassifierThresholds,
) -> f64 {
    match (atom.classification, atom.classification_confidence) {
        (Some(c), Some(conf)) => weights.for_source(atom.source) * thresholds.multiplier(c) * conf,
        _ => 0.0,
    }
}
