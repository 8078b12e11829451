//! Atom builder — splits raw source strings into content atoms.

use reelsift_core::config::SourceConfidence;
use reelsift_core::{ContentAtom, ContentItem, Source, TimeSpan};

/// Recognized-text lines shorter than this are dropped.
const MIN_OCR_LINE_CHARS: usize = 3;

/// Split text into sentences on `.`, `!` or `?` followed by whitespace or end of text.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if (b == b'.' || b == b'!' || b == b'?')
            && i + 1 < bytes.len()
            && bytes[i + 1].is_ascii_whitespace()
        {
            let s = text[start..=i].trim();
            if !s.is_empty() {
                sentences.push(s);
            }
            start = i + 1;
        }
    }
    let s = text[start..].trim();
    if !s.is_empty() {
        sentences.push(s);
    }
    sentences
}

/// Split recognized text into visual lines, dropping fragments too short to carry meaning.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|l| l.chars().count() >= MIN_OCR_LINE_CHARS)
        .collect()
}

/// Collapse runs of whitespace into single spaces.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn present(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Build the atom list for one content item. Absent sources yield no atoms.
pub fn build_atoms(item: &ContentItem, confidence: &SourceConfidence) -> Vec<ContentAtom> {
    let mut atoms = Vec::new();

    match &item.transcript_segments {
        Some(segments) if !segments.is_empty() => {
            for seg in segments {
                let span = TimeSpan {
                    start: seg.start,
                    end: seg.end,
                };
                for sentence in split_sentences(&seg.text) {
                    atoms.push(
                        ContentAtom::new(Source::Audio, normalize(sentence), confidence.audio)
                            .with_timestamp(span),
                    );
                }
            }
        }
        _ => {
            if let Some(transcript) = present(&item.audio_transcript) {
                for sentence in split_sentences(transcript) {
                    atoms.push(ContentAtom::new(Source::Audio, normalize(sentence), confidence.audio));
                }
            }
        }
    }

    if let Some(ocr) = present(&item.ocr_text) {
        for line in split_lines(ocr) {
            atoms.push(ContentAtom::new(Source::Ocr, normalize(line), confidence.ocr));
        }
    }

    for description in item.image_descriptions.iter().flatten() {
        let description = description.trim();
        if !description.is_empty() {
            atoms.push(ContentAtom::new(Source::Image, normalize(description), confidence.image));
        }
    }

    if let Some(caption) = present(&item.caption) {
        for sentence in split_sentences(caption) {
            atoms.push(ContentAtom::new(Source::Caption, normalize(sentence), confidence.caption));
        }
    }

    if let Some(meta) = &item.metadata {
        if let Some(title) = present(&meta.title) {
            atoms.push(ContentAtom::new(Source::Metadata, normalize(title), confidence.metadata_title));
        }
        if let Some(description) = present(&meta.description) {
            atoms.push(ContentAtom::new(
                Source::Metadata,
                normalize(description),
                confidence.metadata_description,
            ));
        }
    }

    atoms
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelsift_core::{ContentMetadata, TranscriptSegment};

    #[test]
    fn test_split_sentences() {
        let s = split_sentences("First stop. Then lunch!  Was it good? Yes");
        assert_eq!(s, vec!["First stop.", "Then lunch!", "Was it good?", "Yes"]);
    }

    #[test]
    fn test_split_keeps_decimal_prices() {
        let s = split_sentences("Tacos are $3.50 each. Worth it.");
        assert_eq!(s, vec!["Tacos are $3.50 each.", "Worth it."]);
    }

    #[test]
    fn test_split_lines_drops_short() {
        let lines = split_lines("MENU\n\nab\n  Open 9am to 5pm  \n$12");
        assert_eq!(lines, vec!["MENU", "Open 9am to 5pm", "$12"]);
    }

    #[test]
    fn test_build_atoms_sources_and_confidence() {
        let item = ContentItem {
            audio_transcript: Some("We loved it. Go early.".into()),
            ocr_text: Some("Open 9am to 5pm\n(555) 123-4567".into()),
            caption: Some("Best brunch in town!".into()),
            metadata: Some(ContentMetadata {
                title: Some("Brunch spot".into()),
                description: Some("  ".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let atoms = build_atoms(&item, &SourceConfidence::default());
        let sources: Vec<Source> = atoms.iter().map(|a| a.source).collect();
        assert_eq!(
            sources,
            vec![
                Source::Audio,
                Source::Audio,
                Source::Ocr,
                Source::Ocr,
                Source::Caption,
                Source::Metadata
            ]
        );
        assert_eq!(atoms[0].confidence, 0.85);
        assert_eq!(atoms[2].confidence, 0.75);
        assert_eq!(atoms[4].confidence, 0.95);
        assert!(atoms.iter().all(|a| a.classification.is_none()));
    }

    #[test]
    fn test_image_descriptions() {
        let item = ContentItem {
            image_descriptions: Some(vec![
                "Neon sign reading Tacos El Gordo".into(),
                " ".into(),
            ]),
            ..Default::default()
        };
        let atoms = build_atoms(&item, &SourceConfidence::default());
        assert_eq!(atoms.len(), 1);
        assert_eq!(atoms[0].source, Source::Image);
        assert_eq!(atoms[0].confidence, 0.70);
    }

    #[test]
    fn test_absent_sources_yield_nothing() {
        let atoms = build_atoms(&ContentItem::default(), &SourceConfidence::default());
        assert!(atoms.is_empty());
    }

    #[test]
    fn test_segments_carry_timestamps() {
        let item = ContentItem {
            audio_transcript: Some("ignored when segments exist".into()),
            transcript_segments: Some(vec![TranscriptSegment {
                text: "First we order. Then we eat.".into(),
                start: 1.5,
                end: 4.0,
            }]),
            ..Default::default()
        };
        let atoms = build_atoms(&item, &SourceConfidence::default());
        assert_eq!(atoms.len(), 2);
        assert_eq!(atoms[1].timestamp, Some(TimeSpan { start: 1.5, end: 4.0 }));
    }

    #[test]
    fn test_ids_unique() {
        let item = ContentItem {
            caption: Some("One. Two. Three.".into()),
            ..Default::default()
        };
        let atoms = build_atoms(&item, &SourceConfidence::default());
        let ids: std::collections::HashSet<_> = atoms.iter().map(|a| a.id.clone()).collect();
        assert_eq!(ids.len(), 3);
    }
}
