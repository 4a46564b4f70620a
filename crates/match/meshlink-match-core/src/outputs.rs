//! Pass results.
//!
//! One `MatchResult` per invocation, returned to the caller and never
//! persisted by the engine. The lists are disjoint: a candidate pair lands in
//! exactly one of accepted / skipped / rejected / failed, and the unmatched
//! lists carry everything that never produced a tentative pair. Unmatched
//! entries are display names, so a human can diagnose naming mismatches.

use meshlink_api_core::{DeformerId, NodePath};
use serde::{Deserialize, Serialize};

/// Terminal state of one scored candidate pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PairOutcome {
    Linked { deformer: DeformerId, created: bool },
    RejectedByCycle,
    SkippedByConflict,
    FailedLink { reason: String },
}

/// A pair that made it all the way to a live deformer connection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AcceptedPair {
    pub source: NodePath,
    pub target: NodePath,
    pub deformer: DeformerId,
    /// False when an existing deformer was reused (or the link already
    /// existed).
    pub created: bool,
    pub score: i32,
}

/// A pair whose scene mutation was refused by the host.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FailedLink {
    pub source: NodePath,
    pub target: NodePath,
    pub reason: String,
}

/// Aggregated outcome of one matching pass.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MatchResult {
    pub accepted: Vec<AcceptedPair>,
    /// Targets left alone because an animated deformer already owns them.
    pub skipped_conflicts: Vec<NodePath>,
    /// Plausible matches rejected because linking would close a dependency
    /// cycle.
    pub rejected_cycles: Vec<(NodePath, NodePath)>,
    pub failed_links: Vec<FailedLink>,
    pub unmatched_sources: Vec<String>,
    pub unmatched_targets: Vec<String>,
}

impl MatchResult {
    /// Deformers newly created by this pass (reused links excluded).
    pub fn created_count(&self) -> usize {
        self.accepted.iter().filter(|p| p.created).count()
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
            && self.skipped_conflicts.is_empty()
            && self.rejected_cycles.is_empty()
            && self.failed_links.is_empty()
            && self.unmatched_sources.is_empty()
            && self.unmatched_targets.is_empty()
    }

    /// Serialize the full report as pretty JSON, for log archives and the
    /// surrounding tooling's report panes.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// One-line human summary of the pass.
    pub fn summary(&self) -> String {
        format!(
            "linked {} ({} new), {} conflict-skipped, {} cycle-rejected, {} failed, unmatched {}/{} (sources/targets)",
            self.accepted.len(),
            self.created_count(),
            self.skipped_conflicts.len(),
            self.rejected_cycles.len(),
            self.failed_links.len(),
            self.unmatched_sources.len(),
            self.unmatched_targets.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_round_trips_through_json() {
        let result = MatchResult {
            accepted: vec![AcceptedPair {
                source: "|sim|body_geo".into(),
                target: "|look|body_geo".into(),
                deformer: "blendLink1".into(),
                created: true,
                score: 85,
            }],
            unmatched_targets: vec!["hair_geo".into()],
            ..Default::default()
        };
        let json = result.to_json().unwrap();
        let back: MatchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.accepted.len(), 1);
        assert_eq!(back.accepted[0].deformer, "blendLink1");
        assert_eq!(back.unmatched_targets, vec!["hair_geo".to_string()]);
        assert!(result.summary().starts_with("linked 1 (1 new)"));
    }
}
