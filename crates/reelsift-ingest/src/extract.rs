//! Entity extraction — typed pattern families applied to actionable and
//! context atoms.
//!
//! Each family runs its bank in order; within a family an overlapping later
//! match is dropped. Across families, `time` and `date` matches that fall
//! inside an `hours` match are dropped, and a `location` equal to a `venue`
//! found in the same text is dropped.

pub mod patterns;

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use reelsift_core::config::EntityConfidence;
use reelsift_core::{EntityType, ExtractedEntity};

/// Families in extraction order.
pub const FAMILIES: &[EntityType] = &[
    EntityType::Venue,
    EntityType::Price,
    EntityType::Address,
    EntityType::Phone,
    EntityType::Hours,
    EntityType::Date,
    EntityType::Time,
    EntityType::Tip,
    EntityType::Location,
];

/// Words that start a capitalized phrase by accident.
static FUNCTION_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "this", "that", "these", "those", "my", "our", "your", "his",
        "her", "their", "its", "it", "i", "we", "you", "they", "he", "she", "and", "or",
        "but", "so", "if", "then", "here", "there",
    ]
    .into_iter()
    .collect()
});

/// Capitalized words that are never places.
static NOT_PLACES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "january", "february", "march", "april", "may", "june", "july", "august",
        "september", "october", "november", "december", "monday", "tuesday",
        "wednesday", "thursday", "friday", "saturday", "sunday", "today", "tonight",
        "tomorrow",
    ]
    .into_iter()
    .collect()
});

/// Units and quantity words that turn `1/2` into a measurement, not a date.
static QUANTITY_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:c\.|in\.|(?:cups?|tsp|teaspoons?|tbsps?|tablespoons?|oz|ounces?|lbs?|pounds?|g|grams?|kg|ml|l|liters?|litres?|inch(?:es)?|pinch(?:es)?|sticks?|cloves?|pieces?|slices?|cans?|dozen|of an?)\b)",
    )
    .unwrap()
});

/// One raw pattern hit before it becomes an entity.
#[derive(Debug, Clone)]
struct Hit {
    start: usize,
    end: usize,
    raw: String,
    value: String,
}

impl Hit {
    fn overlaps(&self, other: &Hit) -> bool {
        self.start < other.end && other.start < self.end
    }

    fn within(&self, other: &Hit) -> bool {
        self.start >= other.start && self.end <= other.end
    }
}

fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn trim_punct(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || ",;:!?.".contains(c))
}

/// Drop leading function words from a capitalized phrase. None if nothing is left.
fn strip_function_words(s: &str) -> Option<String> {
    let words: Vec<&str> = s.split_whitespace().collect();
    let first_real = words
        .iter()
        .position(|w| !FUNCTION_WORDS.contains(w.to_lowercase().as_str()))?;
    Some(words[first_real..].join(" "))
}

fn is_numeric(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_digit() || c == '/' || c == '-')
}

/// Whether the text right after `end` names a unit, as in "1/2 cup".
fn followed_by_unit(text: &str, end: usize) -> bool {
    QUANTITY_UNIT.is_match(&text[end..])
}

fn is_plausible_numeric_date(value: &str) -> bool {
    if value == "24/7" {
        return false;
    }
    let parts: Vec<u32> = value
        .split(|c| c == '/' || c == '-')
        .filter_map(|p| p.parse().ok())
        .collect();
    match parts.as_slice() {
        [y, _, _] if *y >= 1000 => true,
        [a, b, ..] => *a >= 1 && *b >= 1 && ((*a <= 12 && *b <= 31) || (*a <= 31 && *b <= 12)),
        _ => true,
    }
}

/// Clean a raw value for its family. None rejects the hit.
fn clean(entity_type: EntityType, value: &str) -> Option<String> {
    let value = collapse(value);
    match entity_type {
        EntityType::Price => {
            let v = trim_punct(&value).to_string();
            if v.chars().next().is_some_and(|c| c.is_ascii_digit())
                && v.chars().all(|c| c.is_ascii_digit() || c == '.')
            {
                Some(format!("${}", v))
            } else {
                Some(v)
            }
        }
        EntityType::Venue | EntityType::Location => {
            let v = strip_function_words(trim_punct(&value))?;
            let v = trim_punct(&v).to_string();
            let first = v.split_whitespace().next()?.to_lowercase();
            if v.chars().count() < 2 || NOT_PLACES.contains(first.as_str()) {
                return None;
            }
            Some(v)
        }
        EntityType::Date => {
            let v = trim_punct(&value).to_string();
            if is_numeric(&v) && !is_plausible_numeric_date(&v)
            {
                return None;
            }
            Some(v)
        }
        EntityType::Tip => {
            let v = trim_punct(&value).to_string();
            (v.chars().count() >= 5).then_some(v)
        }
        EntityType::Phone | EntityType::Address | EntityType::Hours | EntityType::Time => {
            let v = value.trim_matches(|c: char| c.is_whitespace() || ",;:!?".contains(c));
            (!v.is_empty()).then(|| v.to_string())
        }
    }
}

/// Run one family's bank over the text.
fn family_hits(entity_type: EntityType, text: &str) -> Vec<Hit> {
    let mut hits: Vec<Hit> = Vec::new();
    for re in patterns::bank(entity_type) {
        for caps in re.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let value_match = caps.name("v").unwrap_or(whole);
            let Some(value) = clean(entity_type, value_match.as_str()) else {
                continue;
            };
            if entity_type == EntityType::Date
                && is_numeric(&value)
                && followed_by_unit(text, whole.end())
            {
                continue;
            }
            // Tier prices capture a trailing delimiter; report the value span only.
            let tier = entity_type == EntityType::Price
                && caps
                    .name("v")
                    .is_some_and(|v| v.as_str().starts_with(['$', '€', '£']));
            let (start, end, raw) = if tier {
                (value_match.start(), value_match.end(), value_match.as_str())
            } else {
                (whole.start(), whole.end(), whole.as_str())
            };
            let hit = Hit {
                start,
                end,
                raw: raw.trim().to_string(),
                value,
            };
            if hits.iter().any(|h| h.overlaps(&hit)) {
                continue;
            }
            hits.push(hit);
        }
    }
    hits.sort_by_key(|h| h.start);
    hits
}

/// Whether any pattern of a family produces an entity in the text.
pub fn has_family_match(entity_type: EntityType, text: &str) -> bool {
    !family_hits(entity_type, text).is_empty()
}

/// Extract all entities from one text. Deterministic: the same text always
/// yields the same entities in the same order.
pub fn extract_entities(text: &str, confidence: &EntityConfidence) -> Vec<ExtractedEntity> {
    let hours = family_hits(EntityType::Hours, text);
    let venue_values: HashSet<String> = family_hits(EntityType::Venue, text)
        .iter()
        .map(|h| h.value.to_lowercase())
        .collect();

    let mut entities = Vec::new();
    for &entity_type in FAMILIES {
        let hits = match entity_type {
            EntityType::Hours => hours.clone(),
            _ => family_hits(entity_type, text),
        };
        for hit in hits {
            let suppressed = match entity_type {
                EntityType::Time | EntityType::Date => hours.iter().any(|h| hit.within(h)),
                EntityType::Location => venue_values.contains(&hit.value.to_lowercase()),
                _ => false,
            };
            if suppressed {
                continue;
            }
            entities.push(ExtractedEntity {
                entity_type,
                value: hit.value,
                raw: hit.raw,
                confidence: confidence.for_type(entity_type),
            });
        }
    }
    entities
}
