//! Error types for mask computation and table loading.

use thiserror::Error;

use crate::topology::VertexIndex;

/// Errors raised by the mask pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MaskError {
    #[error("Invalid mesh topology: face {face} references vertex {vertex} (vertex count {vertex_count})")]
    InvalidTopology {
        face: usize,
        vertex: VertexIndex,
        vertex_count: usize,
    },
    #[error("Invalid mesh topology: {0}")]
    MalformedTopology(String),
    #[error("No vertices selected")]
    EmptySelection,
    #[error("Mask key '{0}' not found in loaded data")]
    UnknownMaskKey(String),
    #[error("Mask length ({mask_len}) doesn't match vertex count ({vertex_count})")]
    VertexCountMismatch { mask_len: usize, vertex_count: usize },
    #[error("Invalid smoothing weight: {0} (must be finite and > 0)")]
    InvalidSmoothing(f32),
    #[error("Missing {0} mesh name")]
    MissingMesh(&'static str),
    #[error("Mesh '{0}' has no mask key")]
    MissingMaskKey(String),
    #[error("Region selection already active on '{0}'")]
    RegionSelectionActive(String),
    #[error("No region selection in progress")]
    NoRegionSelection,
}

/// Errors raised while converting table documents into validated tables.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Malformed table document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Malformed color key '{0}'")]
    MalformedColorKey(String),
    #[error("Malformed vertex id '{0}'")]
    MalformedVertexId(String),
}
