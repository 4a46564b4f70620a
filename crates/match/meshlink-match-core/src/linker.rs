//! Deformer creation and extension.
//!
//! Reuses an existing compatible deformer on the target by appending a weight
//! slot, or bootstraps a new one. New deformers are created against a
//! disposable duplicate of the driver so the live connection never
//! participates in the deformer's construction (which would momentarily close
//! a dependency loop); slot 0 is then rebound to the live driver and the
//! duplicate is deleted on every exit path.

use log::{debug, warn};
use meshlink_api_core::{DeformerId, MeshHandle, NodePath, SceneError, SceneGraph};
use thiserror::Error;

/// A per-pair mutation failure. Recorded by the caller; never fatal to a pass.
#[derive(Debug, Error)]
#[error("failed to link {driver} -> {target}: {reason}")]
pub struct LinkFailure {
    pub driver: NodePath,
    pub target: NodePath,
    #[source]
    pub reason: SceneError,
}

/// Successful link: the deformer now carrying the source, and whether it was
/// created by this call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkOutcome {
    pub deformer: DeformerId,
    pub created: bool,
}

/// Establish (or confirm) a driver relationship from `source` onto `target`
/// at weight 1.0.
///
/// Idempotent: when the source already drives a slot of the target's deformer
/// the call is a no-op success and no duplicate slot is created.
pub fn link(
    scene: &mut dyn SceneGraph,
    source: &MeshHandle,
    target: &MeshHandle,
) -> Result<LinkOutcome, LinkFailure> {
    let fail = |reason: SceneError| LinkFailure {
        driver: source.transform.clone(),
        target: target.transform.clone(),
        reason,
    };

    if let Some(deformer) = scene.find_deformer(&target.shape).map_err(&fail)? {
        let slots = scene.weight_slots(&deformer).map_err(&fail)?;
        if slots
            .iter()
            .any(|s| s.driver == source.transform || s.driver == source.shape)
        {
            debug!(
                "{} already drives {} via {deformer}",
                source.transform, target.transform
            );
            return Ok(LinkOutcome {
                deformer,
                created: false,
            });
        }

        // Slot indices are unique per deformer and monotonically assigned.
        let index = slots.iter().map(|s| s.index + 1).max().unwrap_or(0);
        scene
            .add_weight_slot(&deformer, index, &source.transform, &target.transform, 1.0)
            .map_err(&fail)?;
        scene.set_weight(&deformer, index, 1.0).map_err(&fail)?;
        return Ok(LinkOutcome {
            deformer,
            created: false,
        });
    }

    let temp = scene.duplicate(&source.transform).map_err(&fail)?;
    let created = bootstrap_deformer(scene, &temp, source, target);
    if let Err(e) = scene.delete(&temp) {
        // The link itself may still have succeeded; report the leak only.
        warn!("failed to delete temporary duplicate {temp}: {e}");
    }
    created.map_err(fail).map(|deformer| LinkOutcome {
        deformer,
        created: true,
    })
}

fn bootstrap_deformer(
    scene: &mut dyn SceneGraph,
    temp: &str,
    source: &MeshHandle,
    target: &MeshHandle,
) -> Result<DeformerId, SceneError> {
    let deformer = scene.create_deformer(temp, &target.transform, 1.0)?;
    scene.set_slot_driver(&deformer, 0, &source.transform)?;
    scene.set_weight(&deformer, 0, 1.0)?;
    Ok(deformer)
}
