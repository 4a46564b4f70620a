//! Detection of targets already owned by an animated deformer.
//!
//! A target whose existing deformer carries animated weight curves is driven
//! by an upstream animated process and must be skipped, not overwritten.
//! Static authored weights are not a conflict. The check is opt-in per pass
//! (`MatchConfig::conflict_check`); call sites reconnecting freshly imported,
//! unanimated caches disable it.

use meshlink_api_core::{SceneError, SceneGraph};

/// Whether `target_shape` has an existing deformer with an animated weight
/// curve. A target with no deformer at all never conflicts.
pub fn has_animated_conflict(
    scene: &dyn SceneGraph,
    target_shape: &str,
) -> Result<bool, SceneError> {
    match scene.find_deformer(target_shape)? {
        Some(deformer) => scene.has_animated_weight_curve(&deformer),
        None => Ok(false),
    }
}
