//! Tunable heuristics. Every threshold and weight used by the pipeline lives here,
//! with the production values as defaults.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::types::{Classification, ContentType, EntityType, Source};

/// Env var naming a JSON config file.
pub const CONFIG_ENV: &str = "REELSIFT_CONFIG";

/// Trust multiplier per source for one content type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceWeights {
    pub audio: f64,
    pub ocr: f64,
    pub caption: f64,
    pub metadata: f64,
}

impl SourceWeights {
    pub const fn new(audio: f64, ocr: f64, caption: f64, metadata: f64) -> Self {
        Self {
            audio,
            ocr,
            caption,
            metadata,
        }
    }

    /// Weight for a source. Image atoms are visual and share the OCR weight.
    pub fn for_source(&self, source: Source) -> f64 {
        match source {
            Source::Audio => self.audio,
            Source::Ocr | Source::Image => self.ocr,
            Source::Caption => self.caption,
            Source::Metadata => self.metadata,
        }
    }
}

impl Default for SourceWeights {
    fn default() -> Self {
        Self::new(0.7, 0.6, 0.8, 0.6)
    }
}

/// Intrinsic reliability of each source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfidence {
    pub audio: f64,
    pub ocr: f64,
    pub caption: f64,
    pub metadata_title: f64,
    pub metadata_description: f64,
    pub image: f64,
}

impl Default for SourceConfidence {
    fn default() -> Self {
        Self {
            audio: 0.85,
            ocr: 0.75,
            caption: 0.95,
            metadata_title: 0.95,
            metadata_description: 0.90,
            image: 0.70,
        }
    }
}

/// Decision thresholds for the heuristic classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    /// Signal count at or above which an atom is strongly actionable.
    pub strong_signal_count: usize,
    pub strong_confidence: f64,
    pub single_signal_confidence: f64,
    /// Opinion language only yields `context` above this many characters.
    pub opinion_min_len: usize,
    pub opinion_confidence: f64,
    /// Atoms shorter than this many characters without signals are noise.
    pub noise_max_len: usize,
    pub noise_confidence: f64,
    pub default_confidence: f64,
    pub actionable_multiplier: f64,
    pub context_multiplier: f64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            strong_signal_count: 2,
            strong_confidence: 0.9,
            single_signal_confidence: 0.75,
            opinion_min_len: 15,
            opinion_confidence: 0.7,
            noise_max_len: 10,
            noise_confidence: 0.6,
            default_confidence: 0.5,
            actionable_multiplier: 1.0,
            context_multiplier: 0.5,
        }
    }
}

impl ClassifierThresholds {
    pub fn multiplier(&self, classification: Classification) -> f64 {
        match classification {
            Classification::Actionable => self.actionable_multiplier,
            Classification::Context => self.context_multiplier,
            Classification::Promotional | Classification::Noise => 0.0,
        }
    }
}

/// Settings for the optional external classification provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Heuristic confidence at or below which an atom is offered to the provider.
    pub ambiguity_ceiling: f64,
    /// Applied to the heuristic confidence when the provider fails, times out
    /// or is unavailable.
    pub fallback_penalty: f64,
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            ambiguity_ceiling: 0.6,
            fallback_penalty: 0.8,
            timeout_ms: 5000,
        }
    }
}

/// Thresholds for data-quality warnings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WarningThresholds {
    /// Percent of promotional atoms above which `mostly_promotional` fires.
    pub mostly_promotional_pct: f64,
    pub low_confidence_actionable_pct: f64,
    pub low_confidence_min_raw_words: usize,
    pub no_actionable_min_raw_words: usize,
    pub extraction_failed_max_filtered_words: usize,
    pub extraction_failed_min_raw_words: usize,
}

impl Default for WarningThresholds {
    fn default() -> Self {
        Self {
            mostly_promotional_pct: 50.0,
            low_confidence_actionable_pct: 20.0,
            low_confidence_min_raw_words: 50,
            no_actionable_min_raw_words: 30,
            extraction_failed_max_filtered_words: 20,
            extraction_failed_min_raw_words: 100,
        }
    }
}

/// Fixed confidence per entity pattern family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfidence {
    pub venue: f64,
    pub price: f64,
    pub address: f64,
    pub phone: f64,
    pub hours: f64,
    pub date: f64,
    pub time: f64,
    pub tip: f64,
    pub location: f64,
}

impl Default for EntityConfidence {
    fn default() -> Self {
        Self {
            venue: 0.75,
            price: 0.9,
            address: 0.85,
            phone: 0.95,
            hours: 0.85,
            date: 0.85,
            time: 0.8,
            tip: 0.7,
            location: 0.7,
        }
    }
}

impl EntityConfidence {
    pub fn for_type(&self, entity_type: EntityType) -> f64 {
        match entity_type {
            EntityType::Venue => self.venue,
            EntityType::Price => self.price,
            EntityType::Address => self.address,
            EntityType::Phone => self.phone,
            EntityType::Hours => self.hours,
            EntityType::Date => self.date,
            EntityType::Time => self.time,
            EntityType::Tip => self.tip,
            EntityType::Location => self.location,
        }
    }
}

fn default_profiles() -> BTreeMap<ContentType, SourceWeights> {
    BTreeMap::from([
        (ContentType::Recipe, SourceWeights::new(0.3, 0.95, 0.8, 0.6)),
        (ContentType::CookingTutorial, SourceWeights::new(0.7, 0.9, 0.7, 0.6)),
        (ContentType::RestaurantReview, SourceWeights::new(0.9, 0.6, 0.8, 0.6)),
        (ContentType::TravelVlog, SourceWeights::new(0.8, 0.7, 0.85, 0.6)),
        (ContentType::Fitness, SourceWeights::new(0.8, 0.85, 0.6, 0.5)),
        (ContentType::Event, SourceWeights::new(0.6, 0.85, 0.9, 0.7)),
        (ContentType::Shopping, SourceWeights::new(0.5, 0.7, 0.6, 0.5)),
        (ContentType::Other, SourceWeights::default()),
    ])
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiftConfig {
    pub source_confidence: SourceConfidence,
    /// Source weight profile per detected content type.
    pub source_weights: BTreeMap<ContentType, SourceWeights>,
    pub classifier: ClassifierThresholds,
    pub provider: ProviderConfig,
    /// Atoms whose source weight falls below this are left out of the text blocks.
    pub min_source_weight: f64,
    pub warnings: WarningThresholds,
    pub entity_confidence: EntityConfidence,
    /// Content items processed at once by the binary.
    pub max_concurrency: usize,
}

impl Default for SiftConfig {
    fn default() -> Self {
        Self {
            source_confidence: SourceConfidence::default(),
            source_weights: default_profiles(),
            classifier: ClassifierThresholds::default(),
            provider: ProviderConfig::default(),
            min_source_weight: 0.4,
            warnings: WarningThresholds::default(),
            entity_confidence: EntityConfidence::default(),
            max_concurrency: 3,
        }
    }
}

impl SiftConfig {
    /// Load config from a JSON file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let mut config: SiftConfig = serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        // Partial profile tables keep the defaults for unlisted content types.
        for (content_type, weights) in default_profiles() {
            config.source_weights.entry(content_type).or_insert(weights);
        }
        config.validate()?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from the file named by `REELSIFT_CONFIG`, or defaults when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::load(Path::new(&path)),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn weights_for(&self, content_type: ContentType) -> SourceWeights {
        self.source_weights
            .get(&content_type)
            .copied()
            .unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(Error::Config(format!("{} must be within [0, 1], got {}", name, v)))
            }
        };
        let sc = &self.source_confidence;
        unit("source_confidence.audio", sc.audio)?;
        unit("source_confidence.ocr", sc.ocr)?;
        unit("source_confidence.caption", sc.caption)?;
        unit("source_confidence.metadata_title", sc.metadata_title)?;
        unit("source_confidence.metadata_description", sc.metadata_description)?;
        unit("source_confidence.image", sc.image)?;
        for (content_type, w) in &self.source_weights {
            for (source, v) in [
                ("audio", w.audio),
                ("ocr", w.ocr),
                ("caption", w.caption),
                ("metadata", w.metadata),
            ] {
                unit(&format!("source_weights.{}.{}", content_type, source), v)?;
            }
        }
        let c = &self.classifier;
        for (name, v) in [
            ("classifier.strong_confidence", c.strong_confidence),
            ("classifier.single_signal_confidence", c.single_signal_confidence),
            ("classifier.opinion_confidence", c.opinion_confidence),
            ("classifier.noise_confidence", c.noise_confidence),
            ("classifier.default_confidence", c.default_confidence),
            ("classifier.actionable_multiplier", c.actionable_multiplier),
            ("classifier.context_multiplier", c.context_multiplier),
        ] {
            unit(name, v)?;
        }
        for ty in [
            EntityType::Venue,
            EntityType::Price,
            EntityType::Address,
            EntityType::Phone,
            EntityType::Hours,
            EntityType::Date,
            EntityType::Time,
            EntityType::Tip,
            EntityType::Location,
        ] {
            unit(&format!("entity_confidence.{}", ty), self.entity_confidence.for_type(ty))?;
        }
        unit("provider.ambiguity_ceiling", self.provider.ambiguity_ceiling)?;
        unit("provider.fallback_penalty", self.provider.fallback_penalty)?;
        unit("min_source_weight", self.min_source_weight)?;
        if self.max_concurrency == 0 {
            return Err(Error::Config("max_concurrency must be at least 1".into()));
        }
        Ok(())
    }
}
