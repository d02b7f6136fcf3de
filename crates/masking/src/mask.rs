//! Per-vertex weight masks and the named base mask library.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LoadError, MaskError};

/// Per-vertex weight field.
///
/// Index `i` holds the weight of vertex `i`; values must never be
/// reordered. Values are only guaranteed to lie in `[0, 1]` after
/// [`Mask::clamped`]; intermediate smoothing results may leave that range.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mask(Vec<f32>);

impl Mask {
    pub fn new(weights: Vec<f32>) -> Self {
        Self(weights)
    }

    /// Mask of `len` zero weights
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.0
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }

    /// Weight of a vertex, if in range
    pub fn get(&self, vertex: usize) -> Option<f32> {
        self.0.get(vertex).copied()
    }

    /// Copy with every weight clamped to `[0, 1]`.
    ///
    /// NaN weights become 0 so the result always lies in range.
    pub fn clamped(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|&w| if w.is_nan() { 0.0 } else { w.clamp(0.0, 1.0) })
                .collect(),
        )
    }
}

impl From<Vec<f32>> for Mask {
    fn from(weights: Vec<f32>) -> Self {
        Self(weights)
    }
}

/// Read-only library of named base masks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaskLibrary {
    masks: HashMap<String, Mask>,
}

impl MaskLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a mask document of the form `{"key": [w0, w1, ...], ...}`.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let library: Self = serde_json::from_str(json)?;
        debug!("MaskLibrary: loaded {} masks", library.len());
        Ok(library)
    }

    /// Add or replace a mask
    pub fn insert(&mut self, key: impl Into<String>, mask: impl Into<Mask>) {
        self.masks.insert(key.into(), mask.into());
    }

    /// Look up a base mask by key
    pub fn get(&self, key: &str) -> Result<&Mask, MaskError> {
        self.masks
            .get(key)
            .ok_or_else(|| MaskError::UnknownMaskKey(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.masks.contains_key(key)
    }

    /// Mask keys in sorted order
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.masks.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}
