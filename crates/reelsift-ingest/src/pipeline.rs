//! Content filter pipeline.
//!
//! Atomize → detect content type → pre-filter → classify (optionally refined
//! by a provider) → score → extract → combine and aggregate → diagnostics.
//! Each call owns its atoms; nothing is shared between concurrent runs.

use std::time::Duration;

use chrono::Utc;
use reelsift_core::{
    Classification, ContentAtom, ContentItem, ContentType, ExtractedEntity, FilteredContent,
    PipelineStats, SiftConfig,
};
use reelsift_infer::{classify_with_timeout, ClassificationProvider};
use tracing::{debug, info, warn};

use crate::aggregate;
use crate::atoms::build_atoms;
use crate::classify::{classify_atoms, plannability, Verdict};
use crate::combine::combine;
use crate::content_type::{detect, Detection};
use crate::diagnostics::{self, QualityFacts};
use crate::extract::extract_entities;
use crate::prefilter;

const NO_SOURCES: &str = "No audio transcript, on-screen text, caption or metadata to analyze";

/// Atoms and detection results carried between stages of one run.
struct Run {
    atoms: Vec<ContentAtom>,
    detection: Detection,
    stats: PipelineStats,
}

/// Turns one content item into a `FilteredContent`.
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    config: SiftConfig,
}

impl ContentFilter {
    pub fn new(config: SiftConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SiftConfig {
        &self.config
    }

    /// Run the heuristic pipeline. Never consults a provider.
    pub fn process(&self, item: &ContentItem) -> FilteredContent {
        let Some(run) = self.prepare(item) else {
            return self.empty_result();
        };
        let verdicts = classify_atoms(&run.atoms, &self.config.classifier);
        self.finish(run, verdicts)
    }

    /// Run the pipeline, offering ambiguous atoms to `provider`.
    ///
    /// A provider that errors, times out or reports itself unavailable leaves
    /// the heuristic verdict in place with its confidence discounted. A
    /// provider that is not configured at all is treated like `process`.
    pub async fn process_with_provider(
        &self,
        item: &ContentItem,
        provider: &dyn ClassificationProvider,
    ) -> FilteredContent {
        let Some(mut run) = self.prepare(item) else {
            return self.empty_result();
        };
        let mut verdicts = classify_atoms(&run.atoms, &self.config.classifier);

        let settings = &self.config.provider;
        if !provider.is_configured() {
            debug!("No classification provider configured, keeping heuristic verdicts");
        } else if provider.is_available() {
            let timeout = Duration::from_millis(settings.timeout_ms);
            for (atom, verdict) in run.atoms.iter().zip(verdicts.iter_mut()) {
                let Some(verdict) = verdict else { continue };
                if verdict.confidence > settings.ambiguity_ceiling {
                    continue;
                }
                run.stats.provider_calls += 1;
                match classify_with_timeout(provider, &atom.text, timeout).await {
                    Ok(refined) => {
                        debug!(
                            "Provider {} reclassified atom {} as {:?}",
                            provider.name(),
                            atom.id,
                            refined.classification
                        );
                        *verdict = Verdict {
                            classification: refined.classification,
                            confidence: refined.confidence,
                            entities: refined.entities,
                        };
                    }
                    Err(_) => {
                        run.stats.provider_failures += 1;
                        verdict.confidence *= settings.fallback_penalty;
                    }
                }
            }
            debug!(
                "Provider stage: calls={}, failures={}",
                run.stats.provider_calls, run.stats.provider_failures
            );
        } else {
            warn!("Provider {} unavailable, discounting ambiguous verdicts", provider.name());
            for verdict in verdicts.iter_mut().flatten() {
                if verdict.confidence <= settings.ambiguity_ceiling {
                    run.stats.provider_failures += 1;
                    verdict.confidence *= settings.fallback_penalty;
                }
            }
        }

        self.finish(run, verdicts)
    }

    fn empty_result(&self) -> FilteredContent {
        info!("Content item has no source text");
        FilteredContent::empty(NO_SOURCES, self.config.weights_for(ContentType::Other))
    }

    /// Stages that need no classification decision: atomize, detect, pre-filter.
    fn prepare(&self, item: &ContentItem) -> Option<Run> {
        // Stage 1: Atomize
        let mut atoms = build_atoms(item, &self.config.source_confidence);
        if atoms.is_empty() {
            return None;
        }
        debug!("Built {} atoms from {} item {}", atoms.len(), item.platform, item.url);

        // Stage 2: Detect content type
        let detection = detect(&atoms, &self.config);
        debug!("Detected content type {}", detection.content_type);

        // Stage 3: Pre-filter
        let (promotional, noise) = prefilter::apply(&mut atoms);
        debug!("Pre-filter: promotional={}, noise={}", promotional, noise);

        let stats = PipelineStats {
            total_atoms: atoms.len(),
            ..Default::default()
        };
        Some(Run {
            atoms,
            detection,
            stats,
        })
    }

    /// Apply verdicts, then score, extract, combine and diagnose.
    fn finish(&self, run: Run, verdicts: Vec<Option<Verdict>>) -> FilteredContent {
        let Run {
            mut atoms,
            detection,
            mut stats,
        } = run;
        let weights = detection.weights;

        // Stage 4: Classify
        let mut supplied: Vec<Vec<ExtractedEntity>> = Vec::with_capacity(atoms.len());
        for (atom, verdict) in atoms.iter_mut().zip(verdicts) {
            match verdict {
                Some(v) => {
                    atom.assign(v.classification, v.confidence);
                    supplied.push(v.entities);
                }
                None => supplied.push(Vec::new()),
            }
        }

        // Stage 5: Score
        for atom in atoms.iter_mut().filter(|a| a.plannability_score.is_none()) {
            atom.plannability_score = Some(plannability(atom, &weights, &self.config.classifier));
        }

        // Stage 6: Extract entities from actionable and context atoms
        for (atom, extra) in atoms.iter_mut().zip(supplied) {
            if !matches!(
                atom.classification,
                Some(Classification::Actionable | Classification::Context)
            ) {
                continue;
            }
            let mut entities = extract_entities(&atom.text, &self.config.entity_confidence);
            entities.extend(extra.into_iter().map(|mut e| {
                e.confidence = e.confidence.clamp(0.0, 1.0);
                e
            }));
            atom.attach_entities(entities);
        }

        for atom in &atoms {
            match atom.classification {
                Some(Classification::Actionable) => stats.actionable += 1,
                Some(Classification::Context) => stats.context += 1,
                Some(Classification::Promotional) => stats.promotional += 1,
                Some(Classification::Noise) => stats.noise += 1,
                None => {}
            }
        }
        debug!(
            "Classified: actionable={}, context={}, promotional={}, noise={}",
            stats.actionable, stats.context, stats.promotional, stats.noise
        );

        // Stage 7: Combine and aggregate
        let combined = combine(&atoms, &weights, self.config.min_source_weight);
        stats.dropped_by_weight = combined.dropped_by_weight;
        let entities = aggregate::collect(&atoms);
        let structured_entities = aggregate::structure(&entities);

        // Stage 8: Diagnostics
        let raw_word_count: usize = atoms.iter().map(ContentAtom::word_count).sum();
        let filtered_word_count = combined.actionable_content.split_whitespace().count()
            + combined.context_content.split_whitespace().count();
        let overall_confidence = if combined.survivors.is_empty() {
            0.0
        } else {
            combined
                .survivors
                .iter()
                .filter_map(|&i| atoms[i].classification_confidence)
                .sum::<f64>()
                / combined.survivors.len() as f64
        };
        let percentages = diagnostics::percentages(&atoms);
        let warnings = diagnostics::warnings(
            &QualityFacts {
                percentages,
                entity_count: entities.len(),
                raw_word_count,
                filtered_word_count,
            },
            &self.config.warnings,
        );
        let summary = diagnostics::summary(&structured_entities, combined.survivors.len());

        info!(
            "Filtered {} atoms ({}): {} entities, {}/{} words kept, {} warnings",
            stats.total_atoms,
            detection.content_type,
            entities.len(),
            filtered_word_count,
            raw_word_count,
            warnings.len()
        );

        FilteredContent {
            actionable_content: combined.actionable_content,
            context_content: combined.context_content,
            entities,
            structured_entities,
            content_type: detection.content_type,
            source_weights: weights,
            atoms,
            summary,
            raw_word_count,
            filtered_word_count,
            overall_confidence,
            promotional_percentage: percentages.promotional,
            actionable_percentage: percentages.actionable,
            warnings,
            stats,
            processed_at: Utc::now(),
        }
    }
}
