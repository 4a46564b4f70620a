//! Node addressing and shared geometry types.
//!
//! Nodes are addressed by their full hierarchy path, e.g. `|root|grp|body_geo`.
//! `|` separates hierarchy levels and `:` separates a namespace from a short
//! name, mirroring the conventions of the DCC hosts this engine targets.
//! Namespace stripping is deliberately *not* done here; it belongs to name
//! normalization in the matching crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Full hierarchy path of a scene node (small string key).
pub type NodePath = String;

/// Hierarchy separator in node paths.
pub const HIERARCHY_SEP: char = '|';

/// Namespace separator inside a short name.
pub const NAMESPACE_SEP: char = ':';

/// Last path segment of `path`, with the hierarchy separator stripped.
pub fn short_name(path: &str) -> &str {
    path.rsplit(HIERARCHY_SEP).next().unwrap_or(path)
}

/// Portion of `name` after the last namespace separator.
pub fn strip_namespace(name: &str) -> &str {
    name.rsplit(NAMESPACE_SEP).next().unwrap_or(name)
}

/// Structural signature of a mesh: a cheap proxy for "same topology".
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub faces: u32,
    pub verts: u32,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "faces/verts={}/{}", self.faces, self.verts)
    }
}

/// A node as handed to the engine by a caller: either an owning transform
/// (possibly a group) or a drawable shape. Callers may pass either; the engine
/// resolves every `NodeRef` to a canonical [`MeshHandle`] before matching.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeRef {
    Transform(NodePath),
    Shape(NodePath),
}

impl NodeRef {
    pub fn path(&self) -> &str {
        match self {
            NodeRef::Transform(p) | NodeRef::Shape(p) => p,
        }
    }
}

/// Canonical (transform, shape) pair for one drawable mesh.
///
/// The transform is the node identity used throughout matching; the shape is
/// what signatures and deformer connections hang off.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshHandle {
    pub transform: NodePath,
    pub shape: NodePath,
}

impl MeshHandle {
    /// Display name of the mesh: last path segment of the transform,
    /// namespace kept.
    pub fn display_name(&self) -> &str {
        short_name(&self.transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_takes_last_segment() {
        assert_eq!(short_name("|root|grp|chr:body_geo"), "chr:body_geo");
        assert_eq!(short_name("body_geo"), "body_geo");
    }

    #[test]
    fn strip_namespace_takes_last_part() {
        assert_eq!(strip_namespace("chr:body_geo"), "body_geo");
        assert_eq!(strip_namespace("a:b:c"), "c");
        assert_eq!(strip_namespace("plain"), "plain");
    }
}
