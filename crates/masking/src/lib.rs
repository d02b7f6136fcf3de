//! Blendshape mask system for Blendmask.
//!
//! This crate computes and refines per-vertex weight masks over a polygonal
//! mesh and writes them onto a blendshape target's weight array.
//!
//! # Architecture
//!
//! The core is host independent: it consumes topology and numeric tables
//! and produces numeric weights. Scene mutations (duplicating meshes,
//! creating deformers) stay with the host, which receives plans and weight
//! buffers from this crate.
//!
//! ## Key Components
//!
//! - **Topology**: Face lists and vertex counts
//! - **Adjacency**: Face-clique 1-ring neighbor graph
//! - **Color / Tables**: Validated region color keys and lookup tables
//! - **Region**: Selection → affected vertex resolution
//! - **Composite**: Region override onto a base mask
//! - **Smooth**: Double-buffered diffusion over the adjacency graph
//! - **Apply**: Clamp and all-or-nothing write onto a weight target
//! - **Session**: Explicit context tying the pipeline together

pub mod adjacency;
pub mod apply;
pub mod color;
pub mod composite;
pub mod error;
pub mod mask;
pub mod naming;
pub mod region;
pub mod session;
pub mod smooth;
pub mod tables;
pub mod topology;

pub use adjacency::AdjacencyGraph;
pub use apply::{apply_mask, ApplyReport, WeightBuffer, WeightTarget};
pub use color::ColorKey;
pub use composite::composite_region;
pub use error::{LoadError, MaskError};
pub use mask::{Mask, MaskLibrary};
pub use naming::{parse_vertex_components, MeshNaming, MeshRoles};
pub use region::{resolve_region, AffectedSet};
pub use session::{MaskSession, ProxyPlan, RegionMaskRequest, RegionSelectionOutcome};
pub use smooth::{smooth_mask, SmoothingParams};
pub use tables::ColorRegionMap;
pub use topology::{MeshTopology, VertexIndex};
