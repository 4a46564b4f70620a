//! Pass orchestration: catalogs in, `MatchResult` out.
//!
//! A pass is strictly serialized and synchronous: the linker mutates the
//! shared scene graph and the cycle guard's answers are only valid against
//! the graph state it observed, so nothing here may interleave with another
//! pass over the same scene. The engine keeps no state between passes; all
//! inputs travel in an explicit [`MatchingContext`].

use crate::catalog::Catalog;
use crate::config::MatchConfig;
use crate::conflict::has_animated_conflict;
use crate::cycle::would_create_cycle;
use crate::linker::link;
use crate::outputs::{AcceptedPair, FailedLink, MatchResult, PairOutcome};
use crate::scoring::assign;
use crate::MeshNode;
use log::{info, warn};
use meshlink_api_core::{NodeRef, SceneError, SceneGraph};
use thiserror::Error;

/// Pass-level failure: the scene could not be enumerated at all. Everything
/// finer-grained is aggregated into [`MatchResult`] instead.
#[derive(Debug, Error)]
pub enum PassError {
    #[error("failed to enumerate meshes under '{root}'")]
    Enumerate {
        root: String,
        #[source]
        source: SceneError,
    },
}

/// All inputs of one matching pass. Build once, run once, discard.
#[derive(Clone, Debug)]
pub struct MatchingContext {
    pub sources: Catalog,
    pub targets: Catalog,
    pub config: MatchConfig,
}

impl MatchingContext {
    /// Catalog two hierarchies by root path.
    pub fn from_roots(
        scene: &dyn SceneGraph,
        source_root: &str,
        target_root: &str,
        config: MatchConfig,
    ) -> Result<Self, PassError> {
        let sources = Catalog::from_root(scene, source_root).map_err(|e| PassError::Enumerate {
            root: source_root.to_string(),
            source: e,
        })?;
        let targets = Catalog::from_root(scene, target_root).map_err(|e| PassError::Enumerate {
            root: target_root.to_string(),
            source: e,
        })?;
        Ok(Self {
            sources,
            targets,
            config,
        })
    }

    /// Catalog explicit node selections (groups, transforms, or shapes).
    pub fn from_nodes(
        scene: &dyn SceneGraph,
        sources: &[NodeRef],
        targets: &[NodeRef],
        config: MatchConfig,
    ) -> Result<Self, PassError> {
        let sources = Catalog::from_nodes(scene, sources).map_err(|e| PassError::Enumerate {
            root: "source selection".to_string(),
            source: e,
        })?;
        let targets = Catalog::from_nodes(scene, targets).map_err(|e| PassError::Enumerate {
            root: "target selection".to_string(),
            source: e,
        })?;
        Ok(Self {
            sources,
            targets,
            config,
        })
    }
}

/// Run one full matching pass: score, gate, link, aggregate.
///
/// An empty candidate set on either side is not an error; the result simply
/// reports every node on the non-empty side as unmatched.
pub fn run_pass(scene: &mut dyn SceneGraph, ctx: &MatchingContext) -> MatchResult {
    let mut result = MatchResult::default();
    let assignment = assign(&ctx.sources.nodes, &ctx.targets.nodes, &ctx.config);

    for candidate in &assignment.pairs {
        let source = &ctx.sources.nodes[candidate.source];
        let target = &ctx.targets.nodes[candidate.target];
        match settle_pair(scene, source, target, &ctx.config) {
            PairOutcome::Linked { deformer, created } => result.accepted.push(AcceptedPair {
                source: source.transform.clone(),
                target: target.transform.clone(),
                deformer,
                created,
                score: candidate.score,
            }),
            PairOutcome::RejectedByCycle => result
                .rejected_cycles
                .push((source.transform.clone(), target.transform.clone())),
            PairOutcome::SkippedByConflict => {
                result.skipped_conflicts.push(target.transform.clone())
            }
            PairOutcome::FailedLink { reason } => result.failed_links.push(FailedLink {
                source: source.transform.clone(),
                target: target.transform.clone(),
                reason,
            }),
        }
    }

    for si in &assignment.unmatched_sources {
        result
            .unmatched_sources
            .push(ctx.sources.nodes[*si].display_name.clone());
    }
    for ti in &assignment.unmatched_targets {
        result
            .unmatched_targets
            .push(ctx.targets.nodes[*ti].display_name.clone());
    }

    info!("match pass: {}", result.summary());
    result
}

/// Drive one tentative pair to its terminal state.
fn settle_pair(
    scene: &mut dyn SceneGraph,
    source: &MeshNode,
    target: &MeshNode,
    config: &MatchConfig,
) -> PairOutcome {
    if would_create_cycle(&*scene, &source.shape, &target.shape, config.max_cycle_depth) {
        return PairOutcome::RejectedByCycle;
    }

    if config.conflict_check {
        match has_animated_conflict(&*scene, &target.shape) {
            Ok(true) => return PairOutcome::SkippedByConflict,
            Ok(false) => {}
            // Unlike the cycle guard, a failed conflict lookup proceeds: the
            // link itself is still safe, it may just overwrite a static weight.
            Err(e) => warn!(
                "conflict check failed for {}: {e}; proceeding",
                target.transform
            ),
        }
    }

    match link(scene, &source.handle(), &target.handle()) {
        Ok(outcome) => PairOutcome::Linked {
            deformer: outcome.deformer,
            created: outcome.created,
        },
        Err(e) => PairOutcome::FailedLink {
            reason: e.to_string(),
        },
    }
}
