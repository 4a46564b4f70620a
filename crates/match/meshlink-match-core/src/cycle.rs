//! Cycle guard for proposed driver -> target links.
//!
//! The proposed link adds the edge driver -> target to the deformation graph.
//! That closes a cycle exactly when `target` is already reachable from
//! `driver` by following upstream input connections. The walk is a bounded
//! breadth-first search with an explicit frontier and visited set, so it
//! terminates on malformed or accidentally-cyclic externally-authored graphs.

use hashbrown::HashSet;
use log::warn;
use meshlink_api_core::{NodePath, SceneGraph};
use std::collections::VecDeque;

/// Default depth bound for the upstream traversal.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Whether linking `driver` into `target` would create a circular dependency.
///
/// Fails conservatively: any lookup failure mid-traversal rejects the link.
pub fn would_create_cycle(
    scene: &dyn SceneGraph,
    driver: &str,
    target: &str,
    max_depth: usize,
) -> bool {
    if driver == target {
        return true;
    }

    let mut frontier: VecDeque<(NodePath, usize)> = VecDeque::new();
    let mut visited: HashSet<NodePath> = HashSet::new();

    match scene.upstream_inputs(driver) {
        Ok(inputs) => frontier.extend(inputs.into_iter().map(|n| (n, 1))),
        Err(e) => {
            warn!("cycle check: cannot read upstream of {driver}: {e}; rejecting link");
            return true;
        }
    }

    while let Some((node, depth)) = frontier.pop_front() {
        if node == target {
            return true;
        }
        if depth >= max_depth || !visited.insert(node.clone()) {
            continue;
        }
        match scene.upstream_inputs(&node) {
            Ok(inputs) => frontier.extend(inputs.into_iter().map(|n| (n, depth + 1))),
            Err(e) => {
                warn!("cycle check: cannot expand {node}: {e}; rejecting link");
                return true;
            }
        }
    }

    false
}
