//! Weighting and combining — ranks atoms by plannability and joins the
//! survivors into the actionable and context text blocks.

use reelsift_core::{Classification, ContentAtom, SourceWeights};

/// Text blocks built from the surviving atoms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Combined {
    pub actionable_content: String,
    pub context_content: String,
    /// Indices of atoms that made it into a text block, in block order.
    pub survivors: Vec<usize>,
    /// Atoms left out because their source weight was below the minimum.
    pub dropped_by_weight: usize,
}

fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Atom indices ordered by plannability score, highest first. Ties keep
/// the original order.
pub fn rank(atoms: &[ContentAtom]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..atoms.len()).collect();
    order.sort_by(|&a, &b| {
        let sa = atoms[a].plannability_score.unwrap_or(0.0);
        let sb = atoms[b].plannability_score.unwrap_or(0.0);
        sb.total_cmp(&sa)
    });
    order
}

/// Combine atoms into text blocks. Atoms whose source weight is below
/// `min_source_weight` are skipped regardless of classification.
pub fn combine(atoms: &[ContentAtom], weights: &SourceWeights, min_source_weight: f64) -> Combined {
    let mut actionable = Vec::new();
    let mut context = Vec::new();
    let mut combined = Combined::default();

    for idx in rank(atoms) {
        let atom = &atoms[idx];
        let target = match atom.classification {
            Some(Classification::Actionable) => &mut actionable,
            Some(Classification::Context) => &mut context,
            _ => continue,
        };
        if weights.for_source(atom.source) < min_source_weight {
            combined.dropped_by_weight += 1;
            continue;
        }
        target.push(atom.text.as_str());
        combined.survivors.push(idx);
    }

    combined.actionable_content = collapse(&actionable.join(" "));
    combined.context_content = collapse(&context.join(" "));
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelsift_core::Source;

    fn atom(source: Source, text: &str, class: Classification, score: f64) -> ContentAtom {
        let mut a = ContentAtom::new(source, text, 0.8);
        a.assign(class, 0.9);
        a.plannability_score = Some(score);
        a
    }

    #[test]
    fn test_orders_by_score() {
        let atoms = vec![
            atom(Source::Caption, "second", Classification::Actionable, 0.4),
            atom(Source::Caption, "first", Classification::Actionable, 0.9),
            atom(Source::Caption, "aside", Classification::Context, 0.2),
        ];
        let c = combine(&atoms, &SourceWeights::default(), 0.4);
        assert_eq!(c.actionable_content, "first second");
        assert_eq!(c.context_content, "aside");
        assert_eq!(c.survivors, vec![1, 0, 2]);
    }

    #[test]
    fn test_ties_keep_original_order() {
        let atoms = vec![
            atom(Source::Caption, "a", Classification::Actionable, 0.5),
            atom(Source::Caption, "b", Classification::Actionable, 0.5),
            atom(Source::Caption, "c", Classification::Actionable, 0.5),
        ];
        let c = combine(&atoms, &SourceWeights::default(), 0.4);
        assert_eq!(c.actionable_content, "a b c");
    }

    #[test]
    fn test_low_weight_source_dropped() {
        let weights = SourceWeights::new(0.3, 0.95, 0.8, 0.6);
        let atoms = vec![
            atom(Source::Audio, "spoken tip", Classification::Actionable, 0.27),
            atom(Source::Ocr, "2 cups  flour", Classification::Actionable, 0.85),
        ];
        let c = combine(&atoms, &weights, 0.4);
        assert_eq!(c.actionable_content, "2 cups flour");
        assert_eq!(c.dropped_by_weight, 1);
        assert_eq!(c.survivors, vec![1]);
    }

    #[test]
    fn test_promotional_and_noise_excluded() {
        let atoms = vec![
            atom(Source::Caption, "Link in bio", Classification::Promotional, 0.0),
            atom(Source::Audio, "la la la", Classification::Noise, 0.0),
        ];
        let c = combine(&atoms, &SourceWeights::default(), 0.4);
        assert!(c.actionable_content.is_empty());
        assert!(c.context_content.is_empty());
        assert_eq!(c.dropped_by_weight, 0);
    }
}
