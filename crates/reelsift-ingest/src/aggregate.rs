//! Entity aggregation — deduplicates entities across atoms and groups them
//! into the structured bundle.

use std::collections::HashMap;

use reelsift_core::{ContentAtom, EntityType, ExtractedEntity, StructuredEntities};

/// Merge same-typed, same-valued entities (value compared case-insensitively),
/// keeping the highest-confidence instance. First-seen order is preserved;
/// on equal confidence the earlier instance wins.
pub fn deduplicate<'a>(entities: impl IntoIterator<Item = &'a ExtractedEntity>) -> Vec<ExtractedEntity> {
    let mut index: HashMap<(EntityType, String), usize> = HashMap::new();
    let mut out: Vec<ExtractedEntity> = Vec::new();

    for entity in entities {
        match index.get(&entity.dedup_key()) {
            Some(&i) => {
                if entity.confidence > out[i].confidence {
                    out[i] = entity.clone();
                }
            }
            None => {
                index.insert(entity.dedup_key(), out.len());
                out.push(entity.clone());
            }
        }
    }
    out
}

/// Deduplicated entities from every atom, in atom order.
pub fn collect(atoms: &[ContentAtom]) -> Vec<ExtractedEntity> {
    deduplicate(atoms.iter().flat_map(|a| a.entities.iter()))
}

/// Group deduplicated entities for a UI or planner.
pub fn structure(entities: &[ExtractedEntity]) -> StructuredEntities {
    let mut bundle = StructuredEntities::default();
    for e in entities {
        let bucket = match e.entity_type {
            EntityType::Venue => &mut bundle.venues,
            EntityType::Price => &mut bundle.prices,
            EntityType::Time | EntityType::Hours | EntityType::Date => &mut bundle.times,
            EntityType::Location | EntityType::Address => &mut bundle.locations,
            EntityType::Tip => &mut bundle.tips,
            EntityType::Phone => &mut bundle.contacts,
        };
        bucket.push(e.value.clone());
    }
    bundle
}
