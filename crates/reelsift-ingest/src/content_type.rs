//! Content-type detection — keyword groups evaluated in order, first match wins.

use once_cell::sync::Lazy;
use regex::Regex;
use reelsift_core::{ContentAtom, ContentType, SiftConfig, SourceWeights};

/// Detected genre plus the source weight profile it selects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub content_type: ContentType,
    pub weights: SourceWeights,
}

fn word_group(words: &[&str]) -> Regex {
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{})\b", alternation)).unwrap()
}

/// Ordered keyword groups. Recipe content is refined into a tutorial below.
static GROUPS: Lazy<Vec<(ContentType, Regex)>> = Lazy::new(|| {
    let groups: &[(ContentType, &[&str])] = &[
        (ContentType::Recipe, &[
            "recipe", "ingredients", "ingredient", "tbsp", "tsp", "tablespoon",
            "tablespoons", "teaspoon", "teaspoons", "cups of", "cup of", "preheat",
            "oven", "bake", "baking", "whisk", "simmer", "saute", "sauté", "dough",
            "marinade", "cooking", "cook",
        ]),
        (ContentType::RestaurantReview, &[
            "restaurant", "menu", "dish", "dishes", "ate", "dinner", "lunch", "brunch",
            "breakfast", "cafe", "café", "chef", "reservation", "reservations",
            "tasting", "eatery", "bistro", "diner", "foodie", "food",
        ]),
        (ContentType::TravelVlog, &[
            "travel", "trip", "vacation", "hotel", "flight", "itinerary", "destination",
            "beach", "hike", "hiking", "tour", "airbnb", "resort", "sightseeing",
            "explore", "exploring",
        ]),
        (ContentType::Fitness, &[
            "workout", "exercise", "reps", "cardio", "squat", "squats", "gym",
            "training", "yoga", "hiit", "stretch", "stretching", "pilates",
        ]),
        (ContentType::Event, &[
            "concert", "festival", "tickets", "event", "lineup", "gig", "exhibition",
            "conference", "performance", "showtime", "meetup",
        ]),
        (ContentType::Shopping, &[
            "haul", "shopping", "buy", "bought", "store", "outfit", "product",
            "unboxing", "try-on", "boutique",
        ]),
    ];
    groups
        .iter()
        .map(|(ct, words)| (*ct, word_group(words)))
        .collect()
});

static SEQUENCING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:first|then|next|finally|step\s*\d+)\b").unwrap());

/// Sequencing words needed before recipe content counts as a tutorial.
const TUTORIAL_MIN_SEQUENCING: usize = 2;

/// Classify lower-cased item text into a content type.
pub fn classify_text(text_lower: &str) -> ContentType {
    for (content_type, re) in GROUPS.iter() {
        if re.is_match(text_lower) {
            if *content_type == ContentType::Recipe
                && SEQUENCING.find_iter(text_lower).count() >= TUTORIAL_MIN_SEQUENCING
            {
                return ContentType::CookingTutorial;
            }
            return *content_type;
        }
    }
    ContentType::Other
}

/// Detect the content type of the whole item from its atoms.
pub fn detect(atoms: &[ContentAtom], config: &SiftConfig) -> Detection {
    let text_lower = atoms
        .iter()
        .map(|a| a.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let content_type = classify_text(&text_lower);
    Detection {
        content_type,
        weights: config.weights_for(content_type),
    }
}
