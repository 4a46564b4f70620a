//! meshlink-api-core: scene-graph contract and shared node types (host-agnostic)
//!
//! The matching engine never talks to a DCC host directly. Everything it needs
//! to read or mutate goes through the [`SceneGraph`] trait defined here, and
//! every node it manipulates is addressed by the path/handle types in
//! [`node`]. Adapters for concrete hosts implement `SceneGraph`; tests use the
//! in-memory mock from `meshlink-test-fixtures`.

pub mod node;
pub mod scene;

pub use node::{short_name, strip_namespace, MeshHandle, NodePath, NodeRef, Signature};
pub use scene::{DeformerId, SceneError, SceneGraph, WeightSlot};
