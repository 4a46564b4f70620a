//! Pass configuration.

use serde::{Deserialize, Serialize};

/// Which scoring scheme a pass uses.
///
/// Both schemes are in production use by the surrounding tooling:
/// `NameFirst` for free-form geometry connection where topology is allowed to
/// differ, `SignatureFirst` for cache reconnection where a pair is only ever
/// valid if it is provably the same shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scoring {
    /// Normalized-name and keyword evidence only; no topology requirement.
    NameFirst,
    /// Exact face/vertex-count match is a hard filter; names break ties.
    SignatureFirst,
}

/// Configuration for one matching pass.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchConfig {
    pub scoring: Scoring,

    /// Skip targets whose existing deformer already carries an animated
    /// weight curve. Disabled by call sites that reconnect freshly imported,
    /// unanimated caches.
    pub conflict_check: bool,

    /// Depth bound for the upstream cycle search.
    pub max_cycle_depth: usize,

    /// Override the scoring scheme's acceptance threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<i32>,
}

impl MatchConfig {
    pub fn new(scoring: Scoring) -> Self {
        Self {
            scoring,
            conflict_check: true,
            max_cycle_depth: crate::cycle::DEFAULT_MAX_DEPTH,
            threshold: None,
        }
    }

    /// Effective acceptance threshold: a candidate is accepted when
    /// `score >= accept_threshold()`.
    pub fn accept_threshold(&self) -> i32 {
        self.threshold.unwrap_or(match self.scoring {
            // "> 30" in the name-first scheme.
            Scoring::NameFirst => 31,
            // Matching signature alone (base 10) is sufficient.
            Scoring::SignatureFirst => 10,
        })
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::new(Scoring::SignatureFirst)
    }
}
