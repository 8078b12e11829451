//! Typed pattern banks. Compiled once, shared read-only; `Regex` keeps no
//! match cursor so concurrent callers never interfere.
//!
//! A pattern with a `v` capture group reports that group as the entity value;
//! otherwise the whole match is the value.

use once_cell::sync::Lazy;
use regex::Regex;
use reelsift_core::EntityType;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

const MONTHS: &str = r"jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";
const WEEKDAYS: &str = r"monday|tuesday|wednesday|thursday|friday|saturday|sunday";
const DAY_ABBR: &str = r"(?:mon|tue|tues|wed|thu|thur|thurs|fri|sat|sun)(?:day|sday|nesday|rsday|urday)?";
const CLOCK: &str = r"\d{1,2}(?::\d{2})?\s*(?:am|pm|a\.m\.|p\.m\.)?";

/// Capitalized name: up to five contiguous capitalized words.
const NAME: &str = r"[A-Z][\w'’&-]*(?:\s+[A-Z][\w'’&-]*){0,4}";

pub static PRICE: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        // $25, $12.50, $20-30, €15 to €20
        r"[$€£]\s?\d+(?:[.,]\d{1,2})?(?:\s*(?:-|–|to)\s*[$€£]?\s?\d+(?:[.,]\d{1,2})?)?",
        // $$ price tiers
        r"(?P<v>[$€£]{2,4})(?:[^\d$€£]|$)",
        // 50 dollars, 20 bucks
        r"(?i)\b\d+(?:\.\d{1,2})?\s*(?:dollars|bucks|usd|euros?)\b",
        r"(?i)\b(?:five|ten|fifteen|twenty|thirty|forty|fifty|hundred)\s+(?:dollars|bucks)\b",
        // costs 40
        r"(?i)\b(?:costs?|priced at|price is|charges?)\s+(?P<v>\d+(?:\.\d{1,2})?)\b",
    ])
});

pub static ADDRESS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b\d{1,5}\s+(?:[A-Z0-9][\w'.-]*\s+){0,3}(?:Street|St|Avenue|Ave|Boulevard|Blvd|Road|Rd|Drive|Dr|Lane|Ln|Way|Place|Pl|Court|Ct|Square|Sq|Highway|Hwy|Parkway|Pkwy|Terrace|Circle|Alley)\b",
        r"(?i:\blocated (?:at|on))\s+(?P<v>[A-Z0-9][^,.!?\n]{2,60})",
        r"(?i:\bcorner of)\s+[A-Z][\w'.-]*(?:\s+[A-Z][\w'.-]*)*\s+(?:and|&)\s+[A-Z][\w'.-]*(?:\s+[A-Z][\w'.-]*)*",
    ])
});

pub static PHONE: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        // North American: (555) 123-4567, 555.123.4567, +1 555 123 4567
        r"(?:\+?1[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b",
        // Generic international: +44 20 7946 0958
        r"\+\d{1,3}(?:[\s.-]?\d{2,4}){3,5}\b",
    ])
});

pub static HOURS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        format!(
            r"(?i)\b(?:open|opens|from|hours:?)\s+(?P<v>{c}\s*(?:-|–|to|until|till|til)\s*{c})",
            c = CLOCK
        ).as_str(),
        format!(
            r"(?i)\b(?P<v>{d}\s*(?:-|–|to|through|thru)\s*{d})\b",
            d = DAY_ABBR
        ).as_str(),
        r"(?i)\bopen\s+(?P<v>daily|24/7|24 hours|every day|all day|late)",
        r"(?i)\bclosed\s+(?:on\s+)?(?:mon|tues|wednes|thurs|fri|satur|sun)days?\b",
    ])
});

pub static DATE: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        format!(
            r"(?i)\b(?:{m})\.?\s+\d{{1,2}}(?:st|nd|rd|th)?(?:,?\s+\d{{4}})?\b",
            m = MONTHS
        ).as_str(),
        r"(?i)\b\d{1,2}(?:st|nd|rd|th)?\s+(?:of\s+)?(?:january|february|march|april|may|june|july|august|september|october|november|december)(?:,?\s+\d{4})?\b",
        r"\b\d{4}-\d{2}-\d{2}\b",
        r"\b\d{1,2}/\d{1,2}(?:/\d{2,4})?\b",
        r"\b\d{1,2}-\d{1,2}-\d{2,4}\b",
        format!(
            r"(?i)\b(?:next|this|coming)\s+(?:{w}|weekend|week|month)\b",
            w = WEEKDAYS
        ).as_str(),
        r"(?i)\b(?:today|tonight|tomorrow)\b",
        format!(r"(?i)\b(?:every|on)\s+(?:{w})s?\b", w = WEEKDAYS).as_str(),
    ])
});

pub static TIME: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\b\d{1,2}(?::\d{2})?\s*(?:am\b|pm\b|a\.m\.|p\.m\.)",
        r"\b\d{1,2}:\d{2}\b",
        r"(?i)\baround\s+(?P<v>\d{1,2}(?::\d{2})?)\b(?:\s*o'clock)?",
        r"(?i)\b(?:in the\s+)?(?P<v>morning|afternoon|evening|sunrise|sunset|noon|midnight|late night|golden hour)\b",
    ])
});

pub static VENUE: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        format!(
            r"(?i:\b(?:at|visited|visit|visiting|called|named|check out|checked out|try|tried|went to|go to|head to|stop by))\s+(?P<v>{n})",
            n = NAME
        ).as_str(),
        r"(?P<v>[A-Z][\w'’&-]*(?:\s+[A-Z][\w'’&-]*){0,3})\s+(?i:restaurant|bar|cafe|café|coffee shop|hotel|resort|spa|gym|museum|gallery|bakery|bistro|brasserie|pub|club|diner|pizzeria|brewery|winery|taqueria|market|lounge|theater|theatre)\b",
    ])
});

pub static TIP: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\b(?:pro\s+)?(?:tip|hack|advice|note)\s*:\s*(?P<v>[^.!?\n]{3,})",
        r"(?i)\b(?P<v>make sure (?:to|you)\s+[^.!?\n]{3,})",
        r"(?i)\b(?P<v>don[’']?t forget (?:to|your)\s+[^.!?\n]{3,})",
        r"(?i)\b(?P<v>(?:be sure to|remember to)\s+[^.!?\n]{3,})",
    ])
});

pub static LOCATION: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(?:[Ii]n|[Aa]t|[Nn]ear|[Aa]round)\s+(?P<v>[A-Z][\w'’.-]*(?:\s+[A-Z][\w'’.-]*){0,3})",
    ])
});

/// Strong recommendation language.
pub static RECOMMENDATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:must[- ]try|must[- ]see|must[- ]visit|highly recommend|recommend|best|favou?rite|top pick|go-to)\b").unwrap()
});

/// Directive language.
pub static DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:make sure|don[’']?t miss|be sure to|you have to|you need to|you gotta)\b")
        .unwrap()
});

/// Opinion and feeling language.
pub static OPINION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:i love|i loved|really|honestly|i think|i feel|obsessed|amazing|delicious|so good)\b")
        .unwrap()
});

/// Bank for an entity family, in precedence order.
pub fn bank(entity_type: EntityType) -> &'static [Regex] {
    match entity_type {
        EntityType::Price => PRICE.as_slice(),
        EntityType::Address => ADDRESS.as_slice(),
        EntityType::Phone => PHONE.as_slice(),
        EntityType::Hours => HOURS.as_slice(),
        EntityType::Date => DATE.as_slice(),
        EntityType::Time => TIME.as_slice(),
        EntityType::Venue => VENUE.as_slice(),
        EntityType::Tip => TIP.as_slice(),
        EntityType::Location => LOCATION.as_slice(),
    }
}
