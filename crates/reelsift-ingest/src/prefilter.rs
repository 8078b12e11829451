//! Pre-filter — fast reject pass for promotional and noise atoms.
//!
//! Runs before classification. A match tags the atom `promotional` or `noise`
//! with a zero plannability score; everything else is left unclassified.
//! This stage never assigns `actionable` or `context`.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use reelsift_core::{Classification, ContentAtom};
use tracing::debug;

/// Confidence recorded for a pre-filter decision.
pub const PREFILTER_CONFIDENCE: f64 = 0.9;

/// Promotional bank, in precedence order.
static PROMOTIONAL: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    let patterns: &[(&str, &str)] = &[
        // Calls to action
        ("call_to_action", r"(?i)\blink in (?:my |the )?bio\b"),
        ("call_to_action", r"(?i)\bswipe up\b"),
        ("call_to_action", r"(?i)\b(?:tap|click|hit) (?:the |my )?link\b"),
        ("call_to_action", r"(?i)\bcomment (?:down )?below\b"),
        ("call_to_action", r"(?i)\btag (?:a|your) (?:friend|bestie|partner)\b"),
        // Follow / engagement requests
        ("engagement", r"(?i)\b(?:follow|subscribe)\s+(?:me|us|for|to)\b"),
        ("engagement", r"(?i)\b(?:like|comment|share|save)\s*(?:and|&|,)\s*(?:subscribe|follow|share|save)\b"),
        ("engagement", r"(?i)\b(?:smash|hit) (?:that|the) (?:like|subscribe|follow)\b"),
        ("engagement", r"(?i)\bturn on (?:post )?notifications\b"),
        // Discounts and affiliate links
        ("discount", r"(?i)\b(?:use|with) (?:my |our |the )?(?:code|coupon)\b"),
        ("discount", r"(?i:\bcode)\s+[A-Z0-9]*\d[A-Z0-9]*\b"),
        ("discount", r"(?i)\b(?:discount|promo|coupon) code\b"),
        ("discount", r"(?i)\b\d{1,2}\s?% off\b"),
        ("discount", r"(?i)\baffiliate link"),
        ("discount", r"(?i)\b(?:sponsored by|in partnership with|paid partnership)\b"),
        // Promotional hashtags
        ("hashtag", r"(?i)#(?:ad|ads|sponsored|sponsor|partner|gifted|affiliate|promo)\b"),
        // App downloads
        ("app_download", r"(?i)\bdownload (?:the|our|my) app\b"),
        ("app_download", r"(?i)\b(?:available|get it) on (?:the )?(?:app store|google play)\b"),
        // Merch and shop mentions
        ("merch", r"(?i)\bmerch\b"),
        ("merch", r"(?i)\b(?:shop|buy) (?:my|our) (?:new )?(?:merch|collection|course|ebook|presets)\b"),
        ("merch", r"(?i)\b(?:link|shop) (?:is )?in (?:my )?(?:profile|stories)\b"),
    ];
    patterns
        .iter()
        .map(|(reason, p)| (*reason, Regex::new(p).unwrap()))
        .collect()
});

const VOCABLES: &str = r"la|na|da|doo|oh|ooh|ah|yeah|hey|woah|whoa|mm+|hmm+";
const FILLERS: &str = r"um+|uh+|uhm|er+|hmm+|like|so|okay|ok|yeah|yep|oh|wow|lol|ha(?:ha)+|right|alright";

/// Noise bank, in precedence order.
static NOISE: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        // Empty or symbol-only
        ("symbols_only", Regex::new(r"^[^\p{L}\p{N}]*$").unwrap()),
        // Transcription artifacts: [Music], (applause), ♪ lyrics ♪
        (
            "transcription_artifact",
            Regex::new(r"(?i)^\W*(?:[\[(][^\])]*[\])]\W*)+$").unwrap(),
        ),
        ("transcription_artifact", Regex::new(r"[♪♫]").unwrap()),
        // Lyric vocables repeated
        (
            "lyric_repetition",
            Regex::new(&format!(r"(?i)^(?:(?:{})[\s,.!?-]*){{3,}}$", VOCABLES)).unwrap(),
        ),
        // Bare filler words
        (
            "filler",
            Regex::new(&format!(
                r"(?i)^(?:{f})(?:[\s,.!?]+(?:{f}))*[\s,.!?]*$",
                f = FILLERS
            ))
            .unwrap(),
        ),
    ]
});

/// Minimum words before the repetition ratio applies.
const REPETITION_MIN_WORDS: usize = 4;
/// Distinct-to-total word ratio at or below which text is repetitive.
const REPETITION_MAX_RATIO: f64 = 0.25;

/// Detect chant-like repetition such as "go go go go" that the regex bank cannot
/// express without backreferences.
fn is_repetitive(text: &str) -> bool {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect();
    if words.len() < REPETITION_MIN_WORDS {
        return false;
    }
    let distinct: HashSet<&str> = words.iter().map(String::as_str).collect();
    (distinct.len() as f64 / words.len() as f64) <= REPETITION_MAX_RATIO
}

/// Which bank an atom matched, and the pattern family that fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefilterHit {
    pub classification: Classification,
    pub reason: &'static str,
}

/// Test one text against the banks. Promotional patterns take precedence.
pub fn check(text: &str) -> Option<PrefilterHit> {
    if let Some((reason, _)) = PROMOTIONAL.iter().find(|(_, re)| re.is_match(text)) {
        return Some(PrefilterHit {
            classification: Classification::Promotional,
            reason,
        });
    }
    if let Some((reason, _)) = NOISE.iter().find(|(_, re)| re.is_match(text)) {
        return Some(PrefilterHit {
            classification: Classification::Noise,
            reason,
        });
    }
    if is_repetitive(text) {
        return Some(PrefilterHit {
            classification: Classification::Noise,
            reason: "lyric_repetition",
        });
    }
    None
}

/// Tag promotional and noise atoms. Returns (promotional, noise) counts.
pub fn apply(atoms: &mut [ContentAtom]) -> (usize, usize) {
    let mut promotional = 0;
    let mut noise = 0;
    for atom in atoms.iter_mut().filter(|a| !a.is_classified()) {
        if let Some(hit) = check(&atom.text) {
            atom.assign(hit.classification, PREFILTER_CONFIDENCE);
            atom.plannability_score = Some(0.0);
            match hit.classification {
                Classification::Promotional => promotional += 1,
                _ => noise += 1,
            }
            debug!("Pre-filter tagged atom {} as {:?} ({})", atom.id, hit.classification, hit.reason);
        }
    }
    (promotional, noise)
}
