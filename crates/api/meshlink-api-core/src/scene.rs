//! The minimal read/write contract the matching engine needs from a host scene.
//!
//! Reads take `&self`, mutations take `&mut self`; the trait is object-safe so
//! the engine can hold a `&mut dyn SceneGraph`. The engine's mutation profile
//! is append-only: it adds deformers and weight slots, it never deletes slots
//! it did not create, and the only `delete` it issues is for the disposable
//! duplicate used while bootstrapping a new deformer.

use crate::node::{MeshHandle, NodePath, NodeRef, Signature};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque handle for a deformer node owned by the host scene.
pub type DeformerId = String;

/// One indexed driver input on a deformer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightSlot {
    pub index: u32,
    pub driver: NodePath,
    pub weight: f32,
}

/// Errors surfaced by a host scene implementation.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("node not found: {0}")]
    NodeNotFound(NodePath),

    #[error("signature unavailable for {node}: {reason}")]
    Signature { node: NodePath, reason: String },

    #[error("mutation refused on {node}: {reason}")]
    MutationRefused { node: NodePath, reason: String },

    #[error("scene graph unavailable: {0}")]
    Unavailable(String),
}

/// Host scene-graph service.
///
/// `enumerate_meshes` must return only live, drawable meshes (intermediate /
/// construction-history shapes excluded), in a stable order; an absent or
/// empty root yields an empty list, not an error. `signature` may fail for an
/// individual malformed mesh without aborting a wider enumeration.
pub trait SceneGraph {
    /// All valid meshes under `root` (exclusive), in stable scene order.
    fn enumerate_meshes(&self, root: &str) -> Result<Vec<MeshHandle>, SceneError>;

    /// Resolve a caller-supplied node to its canonical (transform, shape) pair.
    /// Returns `Ok(None)` when the node exists but owns no valid mesh shape.
    fn resolve(&self, node: &NodeRef) -> Result<Option<MeshHandle>, SceneError>;

    /// Face/vertex counts for a mesh shape.
    fn signature(&self, shape: &str) -> Result<Signature, SceneError>;

    /// Owning transform path of `node`.
    fn parent_path(&self, node: &str) -> Result<NodePath, SceneError>;

    /// Existing deformer driving `target_shape`, if any.
    fn find_deformer(&self, target_shape: &str) -> Result<Option<DeformerId>, SceneError>;

    /// Occupied weight slots of a deformer.
    fn weight_slots(&self, deformer: &str) -> Result<Vec<WeightSlot>, SceneError>;

    /// Whether any weight attribute of the deformer has an animation curve
    /// attached (time-varying drive rather than a static authored weight).
    fn has_animated_weight_curve(&self, deformer: &str) -> Result<bool, SceneError>;

    /// Immediate upstream dependency nodes of `node`.
    fn upstream_inputs(&self, node: &str) -> Result<Vec<NodePath>, SceneError>;

    /// Create a deformer blending `driver` into `target` at `weight`.
    fn create_deformer(
        &mut self,
        driver: &str,
        target: &str,
        weight: f32,
    ) -> Result<DeformerId, SceneError>;

    /// Add `driver` to an existing deformer at `index`, driving `target`.
    fn add_weight_slot(
        &mut self,
        deformer: &str,
        index: u32,
        driver: &str,
        target: &str,
        weight: f32,
    ) -> Result<(), SceneError>;

    /// Set the weight value of an existing slot.
    fn set_weight(&mut self, deformer: &str, index: u32, weight: f32) -> Result<(), SceneError>;

    /// Rebind the driver of an existing slot to another node. Used once per
    /// newly created deformer to swap the disposable duplicate for the live
    /// driver.
    fn set_slot_driver(
        &mut self,
        deformer: &str,
        index: u32,
        driver: &str,
    ) -> Result<(), SceneError>;

    /// Duplicate `node`, returning the path of the copy.
    fn duplicate(&mut self, node: &str) -> Result<NodePath, SceneError>;

    /// Delete a node previously created by `duplicate`.
    fn delete(&mut self, node: &str) -> Result<(), SceneError>;
}
