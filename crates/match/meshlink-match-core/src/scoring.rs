//! Pairwise compatibility scoring and greedy one-to-one assignment.
//!
//! Two scoring schemes are supported (see [`Scoring`]); both feed the same
//! assignment loop. Assignment is deterministic: sources are visited in
//! catalog order, a strictly higher score is required to displace the current
//! best, so ties resolve to the first-encountered target. That is a documented
//! simplification, not an accuracy guarantee.

use crate::catalog::MeshNode;
use crate::config::{MatchConfig, Scoring};
use crate::names::is_special_pair;
use serde::Serialize;

/// Per-candidate diagnostic breakdown. Informational only; acceptance is
/// decided on the total score.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    /// Signature-first only: 10 when face/vertex counts match exactly.
    pub signature: i32,
    /// Name evidence (exact / substring / similarity).
    pub name: i32,
    /// Synonym-pair evidence.
    pub synonym: i32,
}

/// A tentative source/target pairing, indices into the respective catalogs.
#[derive(Clone, Debug, Serialize)]
pub struct Candidate {
    pub source: usize,
    pub target: usize,
    pub score: i32,
    pub breakdown: ScoreBreakdown,
}

/// Output of one assignment run, prior to cycle/conflict gating.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Assignment {
    pub pairs: Vec<Candidate>,
    pub unmatched_sources: Vec<usize>,
    pub unmatched_targets: Vec<usize>,
}

/// Score one source/target pair under the given scheme.
pub fn score_pair(source: &MeshNode, target: &MeshNode, scoring: Scoring) -> (i32, ScoreBreakdown) {
    match scoring {
        Scoring::NameFirst => score_name_first(source, target),
        Scoring::SignatureFirst => score_signature_first(source, target),
    }
}

fn score_name_first(source: &MeshNode, target: &MeshNode) -> (i32, ScoreBreakdown) {
    let a = source.normalized.as_str();
    let b = target.normalized.as_str();

    let name = if a == b {
        100
    } else if b.contains(a) {
        80
    } else if a.contains(b) {
        70
    } else {
        (jaccard(source, target) * 60.0) as i32
    };

    let synonym = if is_special_pair(a, b) { 90 } else { 0 };
    let breakdown = ScoreBreakdown {
        signature: 0,
        name,
        synonym,
    };
    // The synonym rule overrides weaker substring/similarity evidence but
    // never demotes an exact match.
    (name.max(synonym), breakdown)
}

fn score_signature_first(source: &MeshNode, target: &MeshNode) -> (i32, ScoreBreakdown) {
    // Hard filter: differing topology is never a candidate.
    if source.signature != target.signature {
        return (0, ScoreBreakdown::default());
    }

    let a = source.normalized.as_str();
    let b = target.normalized.as_str();

    let name = if a == b {
        50
    } else if b.contains(a) || a.contains(b) {
        30
    } else {
        (char_overlap(a, b) * 20.0).round() as i32
    };

    let synonym = if is_special_pair(a, b) { 25 } else { 0 };
    let breakdown = ScoreBreakdown {
        signature: 10,
        name,
        synonym,
    };
    (10 + name + synonym, breakdown)
}

/// Jaccard similarity of the two keyword sets.
fn jaccard(source: &MeshNode, target: &MeshNode) -> f64 {
    let union = source.keywords.union(&target.keywords).count();
    if union == 0 {
        return 0.0;
    }
    let common = source.keywords.intersection(&target.keywords).count();
    common as f64 / union as f64
}

/// Character-overlap ratio: how many characters of `a` occur anywhere in `b`,
/// over the longer length.
fn char_overlap(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let common = a.chars().filter(|&c| b.contains(c)).count();
    common as f64 / a.chars().count().max(b.chars().count()) as f64
}

/// Greedy one-to-one assignment over two catalogs.
///
/// Each source (in order) takes the highest-scoring target not yet consumed;
/// sources whose best score falls below the acceptance threshold are reported
/// unmatched, as are targets left unconsumed at the end.
pub fn assign(sources: &[MeshNode], targets: &[MeshNode], config: &MatchConfig) -> Assignment {
    let threshold = config.accept_threshold();
    let mut consumed = vec![false; targets.len()];
    let mut out = Assignment::default();

    for (si, source) in sources.iter().enumerate() {
        let mut best: Option<Candidate> = None;
        for (ti, target) in targets.iter().enumerate() {
            if consumed[ti] {
                continue;
            }
            let (score, breakdown) = score_pair(source, target, config.scoring);
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(Candidate {
                    source: si,
                    target: ti,
                    score,
                    breakdown,
                });
            }
        }
        match best {
            Some(candidate) if candidate.score >= threshold => {
                consumed[candidate.target] = true;
                out.pairs.push(candidate);
            }
            _ => out.unmatched_sources.push(si),
        }
    }

    out.unmatched_targets = consumed
        .iter()
        .enumerate()
        .filter(|(_, c)| !**c)
        .map(|(ti, _)| ti)
        .collect();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::normalize;
    use meshlink_api_core::Signature;

    fn node(name: &str, faces: u32, verts: u32) -> MeshNode {
        let normalized = normalize(name);
        MeshNode {
            transform: format!("|grp|{name}"),
            shape: format!("|grp|{name}|{name}Shape"),
            display_name: name.to_string(),
            normalized: normalized.name,
            keywords: normalized.keywords,
            signature: Signature { faces, verts },
            parent: "|grp".to_string(),
        }
    }

    #[test]
    fn exact_name_scores_maximum() {
        let (score, _) = score_pair(
            &node("body_geo", 10, 8),
            &node("body_geo", 10, 8),
            Scoring::NameFirst,
        );
        assert_eq!(score, 100);
    }

    #[test]
    fn substring_direction_is_asymmetric() {
        let hand = node("hand", 1, 1);
        let hand_left = node("hand_left", 1, 1);
        let (s1, _) = score_pair(&hand, &hand_left, Scoring::NameFirst);
        let (s2, _) = score_pair(&hand_left, &hand, Scoring::NameFirst);
        assert_eq!(s1, 80);
        assert_eq!(s2, 70);
    }

    #[test]
    fn synonym_pair_beats_threshold_without_substring() {
        // No substring containment between the two, only the eye/vitreous rule.
        let (score, breakdown) = score_pair(
            &node("L_eyeBall", 10, 8),
            &node("eyeL_vitreous", 10, 8),
            Scoring::NameFirst,
        );
        assert_eq!(breakdown.synonym, 90);
        assert_eq!(score, 90);
        assert!(score >= MatchConfig::new(Scoring::NameFirst).accept_threshold());
    }

    #[test]
    fn signature_mismatch_is_a_hard_filter() {
        let (score, _) = score_pair(
            &node("prop_box", 12, 8),
            &node("box_final", 24, 16),
            Scoring::SignatureFirst,
        );
        assert_eq!(score, 0);
    }

    #[test]
    fn matching_signature_alone_passes_signature_first_threshold() {
        let (score, breakdown) = score_pair(
            &node("zzz", 12, 8),
            &node("qqq", 12, 8),
            Scoring::SignatureFirst,
        );
        assert_eq!(breakdown.signature, 10);
        assert!(score >= MatchConfig::new(Scoring::SignatureFirst).accept_threshold());
    }

    #[test]
    fn cloth_skirt_worked_example() {
        // "cloth_skirt_01" vs "clothes_skirt" normalize to the same name.
        let (score, breakdown) = score_pair(
            &node("cloth_skirt_01", 120, 80),
            &node("clothes_skirt", 120, 80),
            Scoring::SignatureFirst,
        );
        assert_eq!(breakdown.name, 50);
        assert_eq!(breakdown.synonym, 25);
        assert_eq!(score, 85);
    }

    #[test]
    fn greedy_assignment_is_injective_and_order_stable() {
        let sources = vec![node("body", 4, 4), node("body_geo", 4, 4)];
        let targets = vec![node("body", 4, 4), node("body_low", 4, 4)];
        let assignment = assign(&sources, &targets, &MatchConfig::new(Scoring::NameFirst));
        assert_eq!(assignment.pairs.len(), 2);
        // First source takes the exact match, second falls back to the other.
        assert_eq!(assignment.pairs[0].target, 0);
        assert_eq!(assignment.pairs[1].target, 1);
        let mut seen = std::collections::HashSet::new();
        assert!(assignment.pairs.iter().all(|p| seen.insert(p.target)));
    }

    #[test]
    fn below_threshold_sources_are_unmatched() {
        let sources = vec![node("hand", 4, 4)];
        let targets = vec![node("foot", 9, 9)];
        let assignment = assign(&sources, &targets, &MatchConfig::new(Scoring::NameFirst));
        assert!(assignment.pairs.is_empty());
        assert_eq!(assignment.unmatched_sources, vec![0]);
        assert_eq!(assignment.unmatched_targets, vec![0]);
    }
}
