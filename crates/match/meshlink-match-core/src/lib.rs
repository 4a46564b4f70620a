//! meshlink-match-core (host-agnostic)
//!
//! Decides which geometry node in one hierarchy drives which geometry node in
//! another (simulation caches -> shading meshes, driver group -> target group)
//! and establishes the shape-blending relationship between them without
//! creating circular dependencies or disturbing existing animated setups.
//!
//! Pipeline: [`catalog`] enumerates both hierarchies into [`MeshNode`]s ->
//! [`scoring`] produces tentative one-to-one pairs -> [`cycle`] and
//! [`conflict`] gate each pair -> [`linker`] creates or extends the deformer ->
//! [`engine::run_pass`] aggregates everything into a [`MatchResult`].
//!
//! All host access goes through `meshlink_api_core::SceneGraph`; the engine
//! holds no state between passes.

pub mod catalog;
pub mod config;
pub mod conflict;
pub mod cycle;
pub mod engine;
pub mod linker;
pub mod names;
pub mod outputs;
pub mod scoring;

// Re-exports for consumers (host adapters)
pub use catalog::{Catalog, CatalogDiagnostic, MeshNode};
pub use config::{MatchConfig, Scoring};
pub use conflict::has_animated_conflict;
pub use cycle::would_create_cycle;
pub use engine::{run_pass, MatchingContext, PassError};
pub use linker::{link, LinkFailure, LinkOutcome};
pub use meshlink_api_core::{MeshHandle, NodePath, NodeRef, SceneGraph, Signature};
pub use names::{normalize, Normalized};
pub use outputs::{AcceptedPair, FailedLink, MatchResult, PairOutcome};
pub use scoring::{assign, score_pair, Assignment, Candidate, ScoreBreakdown};
