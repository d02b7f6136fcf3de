//! Shared configuration for Blendmask
//!
//! This crate provides the single source of truth for smoothing defaults,
//! mesh naming conventions, proxy placement, and the on-disk data layout
//! expected by the tool's loaders.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Default number of smoothing passes
pub const DEFAULT_SMOOTH_ITERATIONS: u32 = 10;

/// Smallest iteration count the tool offers
pub const MIN_SMOOTH_ITERATIONS: u32 = 1;

/// Largest iteration count the tool offers
pub const MAX_SMOOTH_ITERATIONS: u32 = 30;

/// Default neighbor weight for diffusion smoothing
pub const DEFAULT_NEIGHBOR_WEIGHT: f32 = 0.5;

/// Suffix appended to a base mesh name to form its region-selection proxy
pub const DEFAULT_PROXY_SUFFIX: &str = "_regionSelect";

/// Suffix stripped from a base mesh name to form its mask key
pub const DEFAULT_MASK_KEY_SUFFIX: &str = "_head_lod0_meshhead_grp";

/// Default proxy translation (world units) so it does not overlap the base
pub const DEFAULT_PROXY_OFFSET: [f32; 3] = [20.0, 0.0, 0.0];

/// File name of the vertex-to-region color map
pub const VERTEX_MAP_FILE: &str = "topology_vertex_map.json";

/// File name of the named base masks
pub const MASK_DATA_FILE: &str = "expression_masks.json";

/// Smoothing defaults and the iteration range offered to users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Iterations used when the caller does not choose
    pub iterations: u32,
    /// Lower bound for requested iterations
    pub min_iterations: u32,
    /// Upper bound for requested iterations
    pub max_iterations: u32,
    /// Neighbor weight `w` of the diffusion kernel
    pub neighbor_weight: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_SMOOTH_ITERATIONS,
            min_iterations: MIN_SMOOTH_ITERATIONS,
            max_iterations: MAX_SMOOTH_ITERATIONS,
            neighbor_weight: DEFAULT_NEIGHBOR_WEIGHT,
        }
    }
}

impl SmoothingConfig {
    /// Clamp a requested iteration count into the configured range
    pub fn clamp_iterations(&self, requested: u32) -> u32 {
        let lo = self.min_iterations.min(self.max_iterations);
        requested.clamp(lo, self.max_iterations.max(lo))
    }
}

/// Mesh naming conventions shared with the host scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Suffix marking a region-selection proxy mesh
    pub proxy_suffix: String,
    /// Suffix removed from base mesh names to obtain mask keys
    pub mask_key_suffix: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            proxy_suffix: DEFAULT_PROXY_SUFFIX.to_string(),
            mask_key_suffix: DEFAULT_MASK_KEY_SUFFIX.to_string(),
        }
    }
}

/// Location of the tool's data tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataLayout {
    /// Project root; tables live under `<root>/data`
    pub root: PathBuf,
}

impl Default for DataLayout {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

impl DataLayout {
    /// Create a layout rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the JSON tables
    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    /// Path of the vertex-to-region color map
    pub fn vertex_map_path(&self) -> PathBuf {
        self.data_dir().join(VERTEX_MAP_FILE)
    }

    /// Path of the base mask table
    pub fn mask_data_path(&self) -> PathBuf {
        self.data_dir().join(MASK_DATA_FILE)
    }

    /// Project root
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Top-level tool configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
#[cfg_attr(feature = "bevy", derive(Resource))]
pub struct ToolConfig {
    pub smoothing: SmoothingConfig,
    pub naming: NamingConfig,
    /// Translation applied to the proxy mesh, in world units
    pub proxy_offset: ProxyOffset,
    pub data: DataLayout,
}

/// Proxy translation stored as a plain triple for serialization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProxyOffset(pub [f32; 3]);

impl Default for ProxyOffset {
    fn default() -> Self {
        Self(DEFAULT_PROXY_OFFSET)
    }
}
