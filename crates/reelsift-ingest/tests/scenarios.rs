//! End-to-end pipeline scenarios over realistic content items.

use std::collections::HashSet;

use reelsift_core::{
    Classification, ContentItem, ContentMetadata, ContentType, EntityType, Severity, Source,
    TranscriptSegment, WarningKind,
};
use reelsift_ingest::ContentFilter;

fn item() -> ContentItem {
    ContentItem {
        platform: "tiktok".into(),
        url: "https://example.com/v/123".into(),
        ..Default::default()
    }
}

fn with_caption(text: &str) -> ContentItem {
    ContentItem {
        caption: Some(text.into()),
        ..item()
    }
}

#[test]
fn test_caption_with_promotional_tail() {
    let result = ContentFilter::default().process(&with_caption(
        "Check out Chez Pierre at 123 Main Street, $$ per person! Link in bio for code SAVE20 #ad",
    ));

    assert_eq!(result.atoms.len(), 2);
    let actionable = &result.atoms[0];
    assert_eq!(actionable.classification, Some(Classification::Actionable));
    let found: Vec<(EntityType, &str)> = actionable
        .entities
        .iter()
        .map(|e| (e.entity_type, e.value.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![
            (EntityType::Venue, "Chez Pierre"),
            (EntityType::Price, "$$"),
            (EntityType::Address, "123 Main Street"),
        ]
    );

    let promo = &result.atoms[1];
    assert_eq!(promo.classification, Some(Classification::Promotional));
    assert_eq!(promo.plannability_score, Some(0.0));
    assert!(promo.entities.is_empty());
    assert!(!result.actionable_content.contains("Link in bio"));
    assert!(result.actionable_content.starts_with("Check out Chez Pierre"));
    assert_eq!(result.promotional_percentage, 50.0);
    assert_eq!(result.actionable_percentage, 50.0);
    assert_eq!(result.summary, "Found 1 venue, 1 price across 1 filtered segment");
    assert_eq!(result.structured_entities.locations, vec!["123 Main Street"]);
}

#[test]
fn test_no_sources() {
    let result = ContentFilter::default().process(&item());
    assert_eq!(result.raw_word_count, 0);
    assert_eq!(result.filtered_word_count, 0);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].kind, WarningKind::ExtractionFailed);
    assert_eq!(result.warnings[0].severity, Severity::Error);
    assert!(result.entities.is_empty());
}

#[test]
fn test_recognized_text_hours_and_phone() {
    let result = ContentFilter::default().process(&ContentItem {
        ocr_text: Some("Open 9am to 5pm\n(555) 123-4567".into()),
        ..item()
    });

    assert_eq!(result.entities.len(), 2);
    let hours = &result.entities[0];
    assert_eq!(hours.entity_type, EntityType::Hours);
    assert_eq!(hours.confidence, 0.85);
    let phone = &result.entities[1];
    assert_eq!(phone.entity_type, EntityType::Phone);
    assert_eq!(phone.confidence, 0.95);
    for atom in &result.atoms {
        assert_eq!(atom.source, Source::Ocr);
        assert_eq!(atom.classification, Some(Classification::Actionable));
    }
    assert_eq!(result.structured_entities.contacts, vec!["(555) 123-4567"]);
}

#[test]
fn test_lyric_repetition_is_noise() {
    let result = ContentFilter::default().process(&ContentItem {
        audio_transcript: Some("la la la la".into()),
        ..item()
    });

    assert_eq!(result.atoms.len(), 1);
    assert_eq!(result.atoms[0].classification, Some(Classification::Noise));
    assert!(result.entities.is_empty());
    assert_eq!(result.raw_word_count, 4);
    assert_eq!(result.filtered_word_count, 0);
    assert_eq!(result.promotional_percentage, 0.0);
    assert_eq!(result.summary, "No plannable entities found");
    assert_eq!(result.overall_confidence, 0.0);
}

#[test]
fn test_link_in_bio_beats_signals() {
    let result =
        ContentFilter::default().process(&with_caption("Dinner at Chez Pierre is $40, link in bio"));
    let atom = &result.atoms[0];
    assert_eq!(atom.classification, Some(Classification::Promotional));
    assert_eq!(atom.plannability_score, Some(0.0));
    assert!(result.entities.is_empty());
}

#[test]
fn test_mostly_promotional_warning() {
    let result = ContentFilter::default().process(&with_caption(
        "Follow for more. Link in bio! Use code TACO10 for 10% off. Dinner at Chez Pierre costs $40.",
    ));
    assert_eq!(result.stats.promotional, 3);
    assert_eq!(result.promotional_percentage, 75.0);
    assert!(result.has_warning(WarningKind::MostlyPromotional));
}

#[test]
fn test_recipe_profile_drops_narration() {
    let result = ContentFilter::default().process(&ContentItem {
        audio_transcript: Some("Honestly this is my favorite bread to bake at home.".into()),
        ocr_text: Some("Ingredients\n2 cups flour\n1 tsp salt".into()),
        ..item()
    });

    assert_eq!(result.content_type, ContentType::Recipe);
    assert_eq!(result.source_weights.audio, 0.3);
    assert_eq!(result.stats.dropped_by_weight, 1);
    assert!(result.actionable_content.is_empty());
    // Equal scores keep their original order
    assert_eq!(result.context_content, "Ingredients 2 cups flour 1 tsp salt");
    // Dropped atoms stay in the trace
    assert_eq!(result.atoms.len(), 4);
    assert_eq!(result.atoms[0].classification, Some(Classification::Actionable));
}

#[test]
fn test_ingredient_fractions_stay_out_of_times() {
    let result = ContentFilter::default().process(&ContentItem {
        ocr_text: Some("Ingredients\n1/2 cup sugar\n3/4 tsp baking soda".into()),
        ..item()
    });

    assert_eq!(result.content_type, ContentType::Recipe);
    assert!(result.structured_entities.times.is_empty());
    assert!(result.entities.is_empty());
    assert!(result.actionable_content.is_empty());
    assert_eq!(
        result.context_content,
        "Ingredients 1/2 cup sugar 3/4 tsp baking soda"
    );
}

#[test]
fn test_duplicate_entities_merged() {
    let result = ContentFilter::default().process(&ContentItem {
        caption: Some("Dinner at Chez Pierre costs $40.".into()),
        metadata: Some(ContentMetadata {
            title: Some("Dinner at Chez Pierre costs $40".into()),
            ..Default::default()
        }),
        ..item()
    });

    let venues: Vec<&str> = result
        .entities
        .iter()
        .filter(|e| e.entity_type == EntityType::Venue)
        .map(|e| e.value.as_str())
        .collect();
    assert_eq!(venues.len(), 1);
    let keys: HashSet<_> = result.entities.iter().map(|e| e.dedup_key()).collect();
    assert_eq!(keys.len(), result.entities.len());
    assert_eq!(result.structured_entities.prices, vec!["$40"]);
}

#[test]
fn test_timed_segments_carry_timestamps() {
    let result = ContentFilter::default().process(&ContentItem {
        audio_transcript: Some("ignored when segments exist".into()),
        transcript_segments: Some(vec![
            TranscriptSegment {
                text: "We tried Nopa tonight. So good.".into(),
                start: 0.0,
                end: 4.5,
            },
            TranscriptSegment {
                text: "Get there around 7".into(),
                start: 4.5,
                end: 6.0,
            },
        ]),
        ..item()
    });

    assert_eq!(result.atoms.len(), 3);
    assert!(result.atoms.iter().all(|a| a.source == Source::Audio));
    assert_eq!(result.atoms[0].timestamp.map(|t| t.end), Some(4.5));
    assert_eq!(result.atoms[1].timestamp.map(|t| t.start), Some(0.0));
    assert_eq!(result.atoms[2].timestamp.map(|t| t.start), Some(4.5));
    assert!(!result.atoms.iter().any(|a| a.text.contains("ignored")));
}

#[test]
fn test_confidences_in_unit_range() {
    let result = ContentFilter::default().process(&ContentItem {
        audio_transcript: Some(
            "Um okay so. We went to The Spotted Pig in New York. The burger is a must try. la la la la."
                .into(),
        ),
        ocr_text: Some("Open daily\n$25 per person\n[Music]".into()),
        caption: Some("Best burger in NYC! Follow for more #ad".into()),
        metadata: Some(ContentMetadata {
            title: Some("NYC burger tour".into()),
            description: Some("Pro tip: go before noon".into()),
            ..Default::default()
        }),
        ..item()
    });

    assert!((0.0..=1.0).contains(&result.overall_confidence));
    for atom in &result.atoms {
        assert!((0.0..=1.0).contains(&atom.confidence));
        let c = atom.classification_confidence.unwrap();
        assert!((0.0..=1.0).contains(&c));
        for e in &atom.entities {
            assert!((0.0..=1.0).contains(&e.confidence));
        }
    }
    assert_eq!(result.stats.total_atoms, result.atoms.len());
    assert_eq!(
        result.stats.actionable + result.stats.context + result.stats.promotional + result.stats.noise,
        result.atoms.len()
    );
}

#[test]
fn test_output_json_shape() {
    let result = ContentFilter::default().process(&with_caption("Dinner at Chez Pierre costs $40."));
    let json = serde_json::to_value(&result).unwrap();
    assert!(json["actionableContent"].is_string());
    assert!(json["structuredEntities"]["venues"].is_array());
    assert_eq!(json["contentType"], "restaurant_review");
    assert!(json["sourceWeights"]["caption"].is_number());
    assert!(json["atoms"][0]["plannabilityScore"].is_number());
    assert_eq!(json["atoms"][0]["classification"], "actionable");
    assert_eq!(json["entities"][0]["type"], "venue");
    assert!(json["processedAt"].is_string());
    assert!(json["stats"]["totalAtoms"].is_number());
}

#[test]
fn test_concurrent_runs_do_not_collide() {
    let filter = ContentFilter::default();
    let captions = [
        "Dinner at Chez Pierre costs $40. So good.",
        "Check out Tartine at 600 Guerrero St. Open 8am to 5pm.",
        "Link in bio. We walked over after the game ended.",
        "Pro tip: book ahead. Call (555) 123-4567.",
    ];

    let results = std::thread::scope(|s| {
        let handles: Vec<_> = captions
            .iter()
            .map(|c| {
                let filter = &filter;
                s.spawn(move || filter.process(&with_caption(c)))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>()
    });

    let mut ids = HashSet::new();
    let mut total = 0;
    for (result, caption) in results.iter().zip(captions) {
        total += result.atoms.len();
        ids.extend(result.atoms.iter().map(|a| a.id.clone()));
        // Same input, same outcome as a sequential run
        let sequential = filter.process(&with_caption(caption));
        assert_eq!(result.entities, sequential.entities);
        assert_eq!(result.actionable_content, sequential.actionable_content);
    }
    assert_eq!(ids.len(), total);
}
