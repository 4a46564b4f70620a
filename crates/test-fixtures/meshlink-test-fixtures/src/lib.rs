//! Deterministic in-memory `SceneGraph` used by meshlink tests and benches.
//!
//! `MockScene` models exactly what the engine contract needs: meshes with
//! signatures under hierarchy paths, deformers with weight slots, upstream
//! dependency edges, and a disposable-duplicate lifecycle. Failure-injection
//! switches (`break_signature`, `refuse_deformer_edits`) let tests exercise
//! the per-node and per-pair error paths without a host application.

use anyhow::Context;
use hashbrown::{HashMap, HashSet};
use meshlink_api_core::{
    short_name, DeformerId, MeshHandle, NodePath, NodeRef, SceneError, SceneGraph, Signature,
    WeightSlot,
};
use serde::Deserialize;

#[derive(Clone, Debug)]
struct MockMesh {
    transform: NodePath,
    shape: NodePath,
    signature: Signature,
    intermediate: bool,
}

#[derive(Clone, Debug)]
struct MockDeformer {
    target_shape: NodePath,
    slots: Vec<WeightSlot>,
    animated: bool,
}

/// Declarative scene description, loadable from JSON.
#[derive(Debug, Deserialize)]
struct SceneSpec {
    meshes: Vec<MeshSpec>,
    #[serde(default)]
    edges: Vec<EdgeSpec>,
}

#[derive(Debug, Deserialize)]
struct MeshSpec {
    path: String,
    faces: u32,
    verts: u32,
    #[serde(default)]
    intermediate: bool,
}

/// Dependency edge: `from` is upstream of `to`.
#[derive(Debug, Deserialize)]
struct EdgeSpec {
    from: String,
    to: String,
}

/// In-memory scene graph with stable enumeration order.
#[derive(Default)]
pub struct MockScene {
    meshes: Vec<MockMesh>,
    deformers: Vec<(DeformerId, MockDeformer)>,
    upstream: HashMap<NodePath, Vec<NodePath>>,
    temps: HashSet<NodePath>,
    deleted: Vec<NodePath>,
    broken_signatures: HashSet<NodePath>,
    refuse_deformer_edits: bool,
    next_deformer: u32,
    next_temp: u32,
    created_deformers: u32,
}

impl MockScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene from a JSON `SceneSpec` document.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let spec: SceneSpec = serde_json::from_str(json).context("invalid scene spec")?;
        let mut scene = Self::new();
        for mesh in &spec.meshes {
            scene.add_mesh_full(&mesh.path, mesh.faces, mesh.verts, mesh.intermediate);
        }
        for edge in &spec.edges {
            scene.connect(&edge.from, &edge.to);
        }
        Ok(scene)
    }

    /// Register a drawable mesh at `transform` (e.g. `"|sim|body_geo"`). The
    /// shape path is derived as `<transform>|<short>Shape`.
    pub fn add_mesh(&mut self, transform: &str, faces: u32, verts: u32) -> MeshHandle {
        self.add_mesh_full(transform, faces, verts, false)
    }

    /// Register a construction-history mesh, excluded from enumeration.
    pub fn add_intermediate_mesh(&mut self, transform: &str, faces: u32, verts: u32) -> MeshHandle {
        self.add_mesh_full(transform, faces, verts, true)
    }

    fn add_mesh_full(
        &mut self,
        transform: &str,
        faces: u32,
        verts: u32,
        intermediate: bool,
    ) -> MeshHandle {
        let shape = format!("{transform}|{}Shape", short_name(transform));
        self.meshes.push(MockMesh {
            transform: transform.to_string(),
            shape: shape.clone(),
            signature: Signature { faces, verts },
            intermediate,
        });
        MeshHandle {
            transform: transform.to_string(),
            shape,
        }
    }

    /// Make future signature reads fail for this shape.
    pub fn break_signature(&mut self, shape: &str) {
        self.broken_signatures.insert(shape.to_string());
    }

    /// Refuse all deformer mutations from now on. Duplicate/delete still work
    /// so temp-node cleanup remains observable.
    pub fn refuse_deformer_edits(&mut self) {
        self.refuse_deformer_edits = true;
    }

    /// Add a dependency edge: `upstream_node` feeds `node`. Mesh transforms
    /// are normalized to their shapes.
    pub fn connect(&mut self, upstream_node: &str, node: &str) {
        let up = self.edge_node(upstream_node);
        let down = self.edge_node(node);
        self.upstream.entry(down).or_default().push(up);
    }

    /// Attach an animation curve to the deformer's weights.
    pub fn mark_animated(&mut self, deformer: &str) {
        if let Some((_, d)) = self.deformers.iter_mut().find(|(id, _)| id == deformer) {
            d.animated = true;
        }
    }

    /// Deformers created since the scene was built.
    pub fn created_deformer_count(&self) -> u32 {
        self.created_deformers
    }

    /// Temporary duplicates that are still alive (should be zero after any
    /// linking call, success or failure).
    pub fn live_temp_count(&self) -> usize {
        self.temps.len()
    }

    /// Nodes deleted so far, in order.
    pub fn deleted_nodes(&self) -> &[NodePath] {
        &self.deleted
    }

    /// Slots of a deformer, for assertions.
    pub fn slots_of(&self, deformer: &str) -> Option<Vec<WeightSlot>> {
        self.deformers
            .iter()
            .find(|(id, _)| id == deformer)
            .map(|(_, d)| d.slots.clone())
    }

    fn mesh_by_transform(&self, path: &str) -> Option<&MockMesh> {
        self.meshes.iter().find(|m| m.transform == path)
    }

    fn mesh_by_shape(&self, path: &str) -> Option<&MockMesh> {
        self.meshes.iter().find(|m| m.shape == path)
    }

    /// Canonical graph-node identity for dependency edges: a mesh transform
    /// maps to its shape, anything else passes through.
    fn edge_node(&self, path: &str) -> NodePath {
        match self.mesh_by_transform(path) {
            Some(m) => m.shape.clone(),
            None => path.to_string(),
        }
    }

    fn deformer_mut(&mut self, deformer: &str) -> Result<&mut MockDeformer, SceneError> {
        self.deformers
            .iter_mut()
            .find(|(id, _)| id == deformer)
            .map(|(_, d)| d)
            .ok_or_else(|| SceneError::NodeNotFound(deformer.to_string()))
    }

    fn refuse(&self, node: &str) -> Result<(), SceneError> {
        if self.refuse_deformer_edits {
            Err(SceneError::MutationRefused {
                node: node.to_string(),
                reason: "deformer edits disabled".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl SceneGraph for MockScene {
    fn enumerate_meshes(&self, root: &str) -> Result<Vec<MeshHandle>, SceneError> {
        let prefix = format!("{root}|");
        Ok(self
            .meshes
            .iter()
            .filter(|m| !m.intermediate && m.transform.starts_with(&prefix))
            .map(|m| MeshHandle {
                transform: m.transform.clone(),
                shape: m.shape.clone(),
            })
            .collect())
    }

    fn resolve(&self, node: &NodeRef) -> Result<Option<MeshHandle>, SceneError> {
        let path = node.path();
        match node {
            NodeRef::Shape(_) => match self.mesh_by_shape(path) {
                Some(m) if !m.intermediate => Ok(Some(MeshHandle {
                    transform: m.transform.clone(),
                    shape: m.shape.clone(),
                })),
                Some(_) => Ok(None),
                None => Err(SceneError::NodeNotFound(path.to_string())),
            },
            NodeRef::Transform(_) => {
                if let Some(m) = self.mesh_by_transform(path) {
                    if m.intermediate {
                        return Ok(None);
                    }
                    return Ok(Some(MeshHandle {
                        transform: m.transform.clone(),
                        shape: m.shape.clone(),
                    }));
                }
                let prefix = format!("{path}|");
                if self.meshes.iter().any(|m| m.transform.starts_with(&prefix)) {
                    // Exists as a group; no shape of its own.
                    Ok(None)
                } else {
                    Err(SceneError::NodeNotFound(path.to_string()))
                }
            }
        }
    }

    fn signature(&self, shape: &str) -> Result<Signature, SceneError> {
        if self.broken_signatures.contains(shape) {
            return Err(SceneError::Signature {
                node: shape.to_string(),
                reason: "malformed geometry".to_string(),
            });
        }
        self.mesh_by_shape(shape)
            .map(|m| m.signature)
            .ok_or_else(|| SceneError::NodeNotFound(shape.to_string()))
    }

    fn parent_path(&self, node: &str) -> Result<NodePath, SceneError> {
        match node.rsplit_once('|') {
            Some((parent, _)) => Ok(parent.to_string()),
            None => Ok(String::new()),
        }
    }

    fn find_deformer(&self, target_shape: &str) -> Result<Option<DeformerId>, SceneError> {
        Ok(self
            .deformers
            .iter()
            .find(|(_, d)| d.target_shape == target_shape)
            .map(|(id, _)| id.clone()))
    }

    fn weight_slots(&self, deformer: &str) -> Result<Vec<WeightSlot>, SceneError> {
        self.deformers
            .iter()
            .find(|(id, _)| id == deformer)
            .map(|(_, d)| d.slots.clone())
            .ok_or_else(|| SceneError::NodeNotFound(deformer.to_string()))
    }

    fn has_animated_weight_curve(&self, deformer: &str) -> Result<bool, SceneError> {
        self.deformers
            .iter()
            .find(|(id, _)| id == deformer)
            .map(|(_, d)| d.animated)
            .ok_or_else(|| SceneError::NodeNotFound(deformer.to_string()))
    }

    fn upstream_inputs(&self, node: &str) -> Result<Vec<NodePath>, SceneError> {
        Ok(self.upstream.get(node).cloned().unwrap_or_default())
    }

    fn create_deformer(
        &mut self,
        driver: &str,
        target: &str,
        weight: f32,
    ) -> Result<DeformerId, SceneError> {
        self.refuse(target)?;
        let target_shape = self.edge_node(target);
        let driver_node = self.edge_node(driver);
        self.next_deformer += 1;
        let id = format!("blendLink{}", self.next_deformer);
        self.deformers.push((
            id.clone(),
            MockDeformer {
                target_shape: target_shape.clone(),
                slots: vec![WeightSlot {
                    index: 0,
                    driver: driver_node.clone(),
                    weight,
                }],
                animated: false,
            },
        ));
        self.upstream.entry(target_shape).or_default().push(driver_node);
        self.created_deformers += 1;
        Ok(id)
    }

    fn add_weight_slot(
        &mut self,
        deformer: &str,
        index: u32,
        driver: &str,
        _target: &str,
        weight: f32,
    ) -> Result<(), SceneError> {
        self.refuse(deformer)?;
        let driver_node = self.edge_node(driver);
        let d = self.deformer_mut(deformer)?;
        if d.slots.iter().any(|s| s.index == index) {
            return Err(SceneError::MutationRefused {
                node: deformer.to_string(),
                reason: format!("weight slot {index} already occupied"),
            });
        }
        let target_shape = d.target_shape.clone();
        d.slots.push(WeightSlot {
            index,
            driver: driver_node.clone(),
            weight,
        });
        self.upstream.entry(target_shape).or_default().push(driver_node);
        Ok(())
    }

    fn set_weight(&mut self, deformer: &str, index: u32, weight: f32) -> Result<(), SceneError> {
        self.refuse(deformer)?;
        let d = self.deformer_mut(deformer)?;
        let slot = d
            .slots
            .iter_mut()
            .find(|s| s.index == index)
            .ok_or_else(|| SceneError::NodeNotFound(format!("{deformer}.weight[{index}]")))?;
        slot.weight = weight;
        Ok(())
    }

    fn set_slot_driver(
        &mut self,
        deformer: &str,
        index: u32,
        driver: &str,
    ) -> Result<(), SceneError> {
        self.refuse(deformer)?;
        let driver_node = self.edge_node(driver);
        let d = self.deformer_mut(deformer)?;
        let target_shape = d.target_shape.clone();
        let slot = d
            .slots
            .iter_mut()
            .find(|s| s.index == index)
            .ok_or_else(|| SceneError::NodeNotFound(format!("{deformer}.weight[{index}]")))?;
        let old = std::mem::replace(&mut slot.driver, driver_node.clone());
        let ups = self.upstream.entry(target_shape).or_default();
        ups.retain(|n| n != &old);
        ups.push(driver_node);
        Ok(())
    }

    fn duplicate(&mut self, node: &str) -> Result<NodePath, SceneError> {
        let mesh = self
            .mesh_by_transform(node)
            .or_else(|| self.mesh_by_shape(node))
            .ok_or_else(|| SceneError::NodeNotFound(node.to_string()))?;
        let signature = mesh.signature;
        self.next_temp += 1;
        let transform = format!("|{}_dup{}", short_name(node), self.next_temp);
        self.add_mesh_full(&transform, signature.faces, signature.verts, false);
        self.temps.insert(transform.clone());
        Ok(transform)
    }

    fn delete(&mut self, node: &str) -> Result<(), SceneError> {
        let before = self.meshes.len();
        self.meshes.retain(|m| m.transform != node);
        if self.meshes.len() == before {
            return Err(SceneError::NodeNotFound(node.to_string()));
        }
        self.temps.remove(node);
        self.deleted.push(node.to_string());
        Ok(())
    }
}
