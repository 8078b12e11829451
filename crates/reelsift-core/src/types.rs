//! Shared data model: content items in, content atoms through, filtered content out.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a content atom's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Speech-to-text transcript.
    Audio,
    /// On-screen text recognition.
    Ocr,
    /// Author-written caption.
    Caption,
    /// Platform metadata (title, description).
    Metadata,
    /// Image description.
    Image,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Audio => write!(f, "audio"),
            Self::Ocr => write!(f, "ocr"),
            Self::Caption => write!(f, "caption"),
            Self::Metadata => write!(f, "metadata"),
            Self::Image => write!(f, "image"),
        }
    }
}

/// Coarse genre of a content item; selects the source weight profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Recipe,
    CookingTutorial,
    RestaurantReview,
    TravelVlog,
    Fitness,
    Event,
    Shopping,
    Other,
}

impl ContentType {
    pub fn all() -> &'static [ContentType] {
        &[
            Self::Recipe,
            Self::CookingTutorial,
            Self::RestaurantReview,
            Self::TravelVlog,
            Self::Fitness,
            Self::Event,
            Self::Shopping,
            Self::Other,
        ]
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Recipe => "recipe",
            Self::CookingTutorial => "cooking_tutorial",
            Self::RestaurantReview => "restaurant_review",
            Self::TravelVlog => "travel_vlog",
            Self::Fitness => "fitness",
            Self::Event => "event",
            Self::Shopping => "shopping",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// Four-way classification of a content atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Actionable,
    Context,
    Promotional,
    Noise,
}

/// Kind of fact an entity carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Venue,
    Price,
    Address,
    Phone,
    Hours,
    Date,
    Time,
    Tip,
    Location,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Venue => "venue",
            Self::Price => "price",
            Self::Address => "address",
            Self::Phone => "phone",
            Self::Hours => "hours",
            Self::Date => "date",
            Self::Time => "time",
            Self::Tip => "tip",
            Self::Location => "location",
        };
        f.write_str(s)
    }
}

/// A typed fact pulled out of an atom's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEntity {
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// Cleaned value.
    pub value: String,
    /// Verbatim match.
    pub raw: String,
    pub confidence: f64,
}

impl ExtractedEntity {
    /// Deduplication key: type plus lower-cased value.
    pub fn dedup_key(&self) -> (EntityType, String) {
        (self.entity_type, self.value.to_lowercase())
    }
}

/// Start/end offsets in seconds for audio-derived atoms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: f64,
    pub end: f64,
}

/// One indivisible unit of extracted text with a known source and reliability.
///
/// `classification` and `entities` are write-once: [`ContentAtom::assign`] and
/// [`ContentAtom::attach_entities`] refuse a second write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAtom {
    pub id: String,
    pub source: Source,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<TimeSpan>,
    /// Intrinsic reliability of the source, in [0, 1].
    pub confidence: f64,
    pub classification: Option<Classification>,
    /// Confidence of the classification decision, in [0, 1].
    pub classification_confidence: Option<f64>,
    pub plannability_score: Option<f64>,
    #[serde(default)]
    pub entities: Vec<ExtractedEntity>,
    #[serde(skip)]
    entities_attached: bool,
}

impl ContentAtom {
    pub fn new(source: Source, text: impl Into<String>, confidence: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source,
            text: text.into(),
            timestamp: None,
            confidence: confidence.clamp(0.0, 1.0),
            classification: None,
            classification_confidence: None,
            plannability_score: None,
            entities: Vec::new(),
            entities_attached: false,
        }
    }

    pub fn with_timestamp(mut self, span: TimeSpan) -> Self {
        self.timestamp = Some(span);
        self
    }

    pub fn is_classified(&self) -> bool {
        self.classification.is_some()
    }

    /// Set the classification once. Returns false if it was already set.
    pub fn assign(&mut self, classification: Classification, confidence: f64) -> bool {
        if self.classification.is_some() {
            return false;
        }
        self.classification = Some(classification);
        self.classification_confidence = Some(confidence.clamp(0.0, 1.0));
        true
    }

    /// Set the extracted entities once. Returns false if already attached.
    pub fn attach_entities(&mut self, entities: Vec<ExtractedEntity>) -> bool {
        if self.entities_attached {
            return false;
        }
        self.entities = entities;
        self.entities_attached = true;
        true
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// A timed slice of the speech transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

/// Platform metadata. Only `title` and `description` become atoms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// One scraped social-media content item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub audio_transcript: Option<String>,
    /// Timed transcript; takes precedence over `audio_transcript` when present.
    #[serde(default)]
    pub transcript_segments: Option<Vec<TranscriptSegment>>,
    #[serde(default)]
    pub ocr_text: Option<String>,
    /// Descriptions of still frames or thumbnails, one atom each.
    #[serde(default)]
    pub image_descriptions: Option<Vec<String>>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub metadata: Option<ContentMetadata>,
    #[serde(default)]
    pub cached: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    MostlyPromotional,
    LowConfidence,
    NoActionable,
    ExtractionFailed,
}

/// A data-quality diagnostic attached to a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    #[serde(rename = "type")]
    pub kind: WarningKind,
    pub severity: Severity,
    pub message: String,
}

/// Deduplicated entity values grouped for a UI or planner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredEntities {
    pub venues: Vec<String>,
    pub prices: Vec<String>,
    /// Times, hours and dates.
    pub times: Vec<String>,
    /// Locations and addresses.
    pub locations: Vec<String>,
    pub tips: Vec<String>,
    /// Phone numbers.
    pub contacts: Vec<String>,
}

/// Per-stage counters for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStats {
    pub total_atoms: usize,
    pub actionable: usize,
    pub context: usize,
    pub promotional: usize,
    pub noise: usize,
    /// Atoms left out of the text blocks because their source weight was too low.
    pub dropped_by_weight: usize,
    pub provider_calls: usize,
    pub provider_failures: usize,
}

/// The pipeline's sole output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredContent {
    pub actionable_content: String,
    pub context_content: String,
    pub entities: Vec<ExtractedEntity>,
    pub structured_entities: StructuredEntities,
    pub content_type: ContentType,
    pub source_weights: crate::config::SourceWeights,
    pub atoms: Vec<ContentAtom>,
    pub summary: String,
    pub raw_word_count: usize,
    pub filtered_word_count: usize,
    pub overall_confidence: f64,
    pub promotional_percentage: f64,
    pub actionable_percentage: f64,
    pub warnings: Vec<Warning>,
    pub stats: PipelineStats,
    pub processed_at: DateTime<Utc>,
}

impl FilteredContent {
    /// Result for an item that carried no source text at all.
    pub fn empty(reason: impl Into<String>, source_weights: crate::config::SourceWeights) -> Self {
        Self {
            actionable_content: String::new(),
            context_content: String::new(),
            entities: Vec::new(),
            structured_entities: StructuredEntities::default(),
            content_type: ContentType::Other,
            source_weights,
            atoms: Vec::new(),
            summary: "No content available to analyze".to_string(),
            raw_word_count: 0,
            filtered_word_count: 0,
            overall_confidence: 0.0,
            promotional_percentage: 0.0,
            actionable_percentage: 0.0,
            warnings: vec![Warning {
                kind: WarningKind::ExtractionFailed,
                severity: Severity::Error,
                message: reason.into(),
            }],
            stats: PipelineStats::default(),
            processed_at: Utc::now(),
        }
    }

    pub fn has_warning(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_is_write_once() {
        let mut atom = ContentAtom::new(Source::Caption, "Open daily", 0.95);
        assert!(atom.assign(Classification::Promotional, 1.0));
        assert!(!atom.assign(Classification::Actionable, 0.9));
        assert_eq!(atom.classification, Some(Classification::Promotional));
    }

    #[test]
    fn test_entities_are_write_once() {
        let mut atom = ContentAtom::new(Source::Ocr, "(555) 123-4567", 0.75);
        assert!(atom.attach_entities(Vec::new()));
        let phone = ExtractedEntity {
            entity_type: EntityType::Phone,
            value: "(555) 123-4567".into(),
            raw: "(555) 123-4567".into(),
            confidence: 0.95,
        };
        assert!(!atom.attach_entities(vec![phone]));
        assert!(atom.entities.is_empty());
    }

    #[test]
    fn test_confidence_clamped() {
        let atom = ContentAtom::new(Source::Audio, "hello there", 1.7);
        assert_eq!(atom.confidence, 1.0);
    }

    #[test]
    fn test_item_deserializes_camel_case() {
        let json = r#"{
            "platform": "tiktok",
            "url": "https://example.com/v/1",
            "audioTranscript": "We went to dinner.",
            "ocrText": "Open 9am to 5pm",
            "metadata": {"title": "Best tacos", "likes": 12}
        }"#;
        let item: ContentItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.audio_transcript.as_deref(), Some("We went to dinner."));
        let meta = item.metadata.unwrap();
        assert_eq!(meta.title.as_deref(), Some("Best tacos"));
        assert!(meta.extra.contains_key("likes"));
    }

    #[test]
    fn test_warning_serializes_type_field() {
        let w = Warning {
            kind: WarningKind::MostlyPromotional,
            severity: Severity::Warning,
            message: "x".into(),
        };
        let v = serde_json::to_value(&w).unwrap();
        assert_eq!(v["type"], "mostly_promotional");
        assert_eq!(v["severity"], "warning");
    }
}
