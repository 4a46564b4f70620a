//! Geometry enumeration: turns a scene hierarchy into matchable [`MeshNode`]s.
//!
//! Read-only. Enumeration order is preserved from the scene, because the
//! greedy assignment downstream is defined in terms of stable input order.

use crate::names;
use hashbrown::{HashMap, HashSet};
use log::debug;
use meshlink_api_core::{
    short_name, MeshHandle, NodePath, NodeRef, SceneError, SceneGraph, Signature,
};
use serde::{Deserialize, Serialize};

/// One matchable mesh, immutable for the duration of a pass.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MeshNode {
    /// Nearest owning transform path; the node's identity during matching.
    pub transform: NodePath,
    pub shape: NodePath,
    /// Last path segment of the transform, namespace kept.
    pub display_name: String,
    pub normalized: String,
    pub keywords: HashSet<String>,
    pub signature: Signature,
    pub parent: NodePath,
}

impl MeshNode {
    pub fn handle(&self) -> MeshHandle {
        MeshHandle {
            transform: self.transform.clone(),
            shape: self.shape.clone(),
        }
    }
}

/// A node that was enumerated but could not be cataloged.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogDiagnostic {
    pub node: NodePath,
    pub reason: String,
}

/// Ordered collection of matchable meshes under one root (or node selection).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub nodes: Vec<MeshNode>,
    pub diagnostics: Vec<CatalogDiagnostic>,
}

impl Catalog {
    /// Catalog every valid mesh under `root`. An absent or empty root yields
    /// an empty catalog; only a scene-level enumeration failure is an error.
    pub fn from_root(scene: &dyn SceneGraph, root: &str) -> Result<Self, SceneError> {
        let handles = scene.enumerate_meshes(root)?;
        Ok(Self::from_handles(scene, handles))
    }

    /// Catalog an explicit node selection. Each entry may be a group transform
    /// (expanded to its descendant meshes), a single mesh transform, or a
    /// shape. Unknown nodes are recorded as diagnostics, not errors; duplicate
    /// transforms are kept once, first occurrence wins.
    pub fn from_nodes(scene: &dyn SceneGraph, nodes: &[NodeRef]) -> Result<Self, SceneError> {
        let mut handles: Vec<MeshHandle> = Vec::new();
        let mut seen: HashSet<NodePath> = HashSet::new();
        let mut diagnostics = Vec::new();

        for node in nodes {
            match scene.resolve(node) {
                Ok(Some(handle)) => {
                    if seen.insert(handle.transform.clone()) {
                        handles.push(handle);
                    }
                }
                Ok(None) => match node {
                    // A transform with no shape of its own is a group.
                    NodeRef::Transform(path) => {
                        for handle in scene.enumerate_meshes(path)? {
                            if seen.insert(handle.transform.clone()) {
                                handles.push(handle);
                            }
                        }
                    }
                    NodeRef::Shape(path) => diagnostics.push(CatalogDiagnostic {
                        node: path.clone(),
                        reason: "no valid mesh shape".to_string(),
                    }),
                },
                Err(SceneError::NodeNotFound(path)) => {
                    debug!("skipping missing node {path}");
                    diagnostics.push(CatalogDiagnostic {
                        node: path,
                        reason: "node not found".to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        let mut catalog = Self::from_handles(scene, handles);
        // Resolution diagnostics precede the per-handle signature diagnostics.
        diagnostics.append(&mut catalog.diagnostics);
        catalog.diagnostics = diagnostics;
        Ok(catalog)
    }

    fn from_handles(scene: &dyn SceneGraph, handles: Vec<MeshHandle>) -> Self {
        let mut catalog = Self::default();
        for handle in handles {
            let signature = match scene.signature(&handle.shape) {
                Ok(sig) => sig,
                Err(e) => {
                    // Malformed geometry skips the node, never the pass.
                    debug!("skipping {}: {e}", handle.shape);
                    catalog.diagnostics.push(CatalogDiagnostic {
                        node: handle.shape.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            let parent = scene
                .parent_path(&handle.transform)
                .unwrap_or_else(|_| parent_from_path(&handle.transform));
            let display_name = short_name(&handle.transform).to_string();
            let normalized = names::normalize(&display_name);
            catalog.nodes.push(MeshNode {
                transform: handle.transform,
                shape: handle.shape,
                display_name,
                normalized: normalized.name,
                keywords: normalized.keywords,
                signature,
                parent,
            });
        }
        catalog
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, transform: &str) -> Option<&MeshNode> {
        self.nodes.iter().find(|n| n.transform == transform)
    }

    /// Mapping view keyed by transform path.
    pub fn by_transform(&self) -> HashMap<&str, &MeshNode> {
        self.nodes
            .iter()
            .map(|n| (n.transform.as_str(), n))
            .collect()
    }
}

fn parent_from_path(path: &str) -> NodePath {
    match path.rsplit_once('|') {
        Some((parent, _)) => parent.to_string(),
        None => String::new(),
    }
}
