//! Mask session: the explicit context tying the mask pipeline together.
//!
//! A session owns the loaded lookup tables and base masks, caches
//! adjacency graphs per mesh, remembers the last base mesh a mask was
//! applied to, and tracks region-selection mode. Nothing here touches the
//! host scene; hosts act on the returned plans and reports.

use std::collections::HashMap;
use std::sync::Arc;

use blendmask_config::ToolConfig;
use glam::{Vec3, Vec4};
use tracing::{debug, info, warn};

use crate::adjacency::AdjacencyGraph;
use crate::apply::{apply_mask, ApplyReport, WeightTarget};
use crate::composite::composite_region;
use crate::error::{LoadError, MaskError};
use crate::mask::MaskLibrary;
use crate::naming::MeshNaming;
use crate::region::resolve_region;
use crate::smooth::{smooth_mask, SmoothingParams};
use crate::tables::ColorRegionMap;
use crate::topology::{MeshTopology, VertexIndex};

/// Inputs of a region mask application.
#[derive(Debug, Clone, Copy)]
pub struct RegionMaskRequest<'a> {
    /// Base mesh (or its proxy) whose mask is overridden
    pub base_mesh: &'a str,
    /// Vertices picked on the proxy mesh
    pub selection: &'a [VertexIndex],
    /// Smoothing passes; the configured default when `None`
    pub iterations: Option<u32>,
}

/// What the host needs to build a region-selection proxy.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyPlan {
    /// Base mesh the proxy duplicates
    pub base_mesh: String,
    /// Name to give the duplicate
    pub proxy_name: String,
    /// Relative translation applied to the duplicate
    pub offset: Vec3,
    /// Display color per vertex, ordered by vertex
    pub vertex_colors: Vec<(VertexIndex, Vec4)>,
}

/// Result of leaving region-selection mode.
#[derive(Debug)]
pub struct RegionSelectionOutcome {
    /// Proxy mesh the host should now delete
    pub proxy_name: String,
    /// Outcome of applying the region mask
    pub result: Result<ApplyReport, MaskError>,
}

/// Cached graph with the fingerprint of the topology it was built from.
#[derive(Debug, Clone)]
struct CachedAdjacency {
    fingerprint: u64,
    graph: Arc<AdjacencyGraph>,
}

#[derive(Debug, Clone)]
struct ActiveRegionSelection {
    base_mesh: String,
    proxy_name: String,
}

/// Explicit per-session state for the mask tool.
#[derive(Debug)]
pub struct MaskSession {
    config: ToolConfig,
    naming: MeshNaming,
    regions: ColorRegionMap,
    masks: MaskLibrary,
    /// Adjacency graphs keyed by base mesh name
    adjacency_cache: HashMap<String, CachedAdjacency>,
    last_applied_base: Option<String>,
    region_selection: Option<ActiveRegionSelection>,
}

impl MaskSession {
    /// Create a session from already validated tables.
    pub fn new(config: ToolConfig, regions: ColorRegionMap, masks: MaskLibrary) -> Self {
        let naming = MeshNaming::new(config.naming.clone());
        Self {
            config,
            naming,
            regions,
            masks,
            adjacency_cache: HashMap::new(),
            last_applied_base: None,
            region_selection: None,
        }
    }

    /// Create a session from the text of the vertex map and mask documents.
    pub fn from_json(
        config: ToolConfig,
        vertex_map_json: &str,
        mask_json: &str,
    ) -> Result<Self, LoadError> {
        let regions = ColorRegionMap::from_json_str(vertex_map_json)?;
        let masks = MaskLibrary::from_json_str(mask_json)?;
        info!(
            "MaskSession: {} regions, {} base masks",
            regions.region_count(),
            masks.len()
        );
        Ok(Self::new(config, regions, masks))
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn naming(&self) -> &MeshNaming {
        &self.naming
    }

    pub fn regions(&self) -> &ColorRegionMap {
        &self.regions
    }

    pub fn masks(&self) -> &MaskLibrary {
        &self.masks
    }

    /// Base mesh of the most recent successful apply, proxy suffix removed
    pub fn last_applied_base(&self) -> Option<&str> {
        self.last_applied_base.as_deref()
    }

    /// Apply a stored base mask directly to a target.
    ///
    /// The mask key is the base mesh name with the mask-key suffix removed.
    pub fn apply_stored_mask<T: WeightTarget + ?Sized>(
        &mut self,
        base_mesh: &str,
        target: &mut T,
    ) -> Result<ApplyReport, MaskError> {
        if base_mesh.is_empty() {
            return Err(MaskError::MissingMesh("base"));
        }

        let key = self.mask_key(base_mesh)?;
        let mask = self.masks.get(&key)?;
        let report = apply_mask(target, mask)?;

        self.record_applied(base_mesh);
        Ok(report)
    }

    /// Override the selected regions to full weight, smooth, and apply.
    ///
    /// The mask key is the proxy-stripped base name with the mask-key suffix
    /// removed, as in [`MaskSession::apply_stored_mask`]. It is checked
    /// before region resolution and before any adjacency graph is built, so
    /// an unknown key costs neither.
    pub fn apply_region_mask<T: WeightTarget + ?Sized>(
        &mut self,
        request: RegionMaskRequest<'_>,
        topology: &MeshTopology,
        target: &mut T,
    ) -> Result<ApplyReport, MaskError> {
        if request.base_mesh.is_empty() {
            return Err(MaskError::MissingMesh("base"));
        }

        if request.selection.is_empty() {
            return Err(MaskError::EmptySelection);
        }

        let base_mesh = self.naming.strip_proxy_suffix(request.base_mesh);
        let key = self.mask_key(&base_mesh)?;
        let base_mask = self.masks.get(&key)?;

        let affected = resolve_region(request.selection, &self.regions)?;

        let graph = cached_adjacency(&mut self.adjacency_cache, &base_mesh, topology)?;

        let smoothing = &self.config.smoothing;
        let iterations =
            smoothing.clamp_iterations(request.iterations.unwrap_or(smoothing.iterations));
        let params = SmoothingParams::new(iterations, smoothing.neighbor_weight);

        let composited = composite_region(base_mask, &affected);
        let smoothed = smooth_mask(&composited, &graph, &params)?;
        let report = apply_mask(target, &smoothed)?;

        debug!(
            "apply_region_mask: '{}' with {} affected vertices, {} passes",
            base_mesh,
            affected.len(),
            iterations
        );

        self.record_applied(&base_mesh);
        Ok(report)
    }

    /// Enter region-selection mode for a base mesh.
    ///
    /// Returns the plan for the colored proxy the host should create.
    pub fn begin_region_selection(&mut self, base_mesh: &str) -> Result<ProxyPlan, MaskError> {
        if let Some(active) = &self.region_selection {
            return Err(MaskError::RegionSelectionActive(active.proxy_name.clone()));
        }
        if base_mesh.is_empty() {
            return Err(MaskError::MissingMesh("base"));
        }

        let base_mesh = self.naming.strip_proxy_suffix(base_mesh);
        let proxy_name = self.naming.proxy_name(&base_mesh);
        let vertex_colors = self
            .regions
            .vertex_colors()
            .into_iter()
            .map(|(v, color)| (v, color.display_color()))
            .collect();

        self.region_selection = Some(ActiveRegionSelection {
            base_mesh: base_mesh.clone(),
            proxy_name: proxy_name.clone(),
        });
        info!("Created region selection proxy: {}", proxy_name);

        Ok(ProxyPlan {
            base_mesh,
            proxy_name,
            offset: Vec3::from_array(self.config.proxy_offset.0),
            vertex_colors,
        })
    }

    /// Apply the region mask for the active selection and leave the mode.
    ///
    /// The mode is left whether or not the apply succeeds; the outcome names
    /// the proxy to delete either way.
    pub fn finish_region_selection<T: WeightTarget + ?Sized>(
        &mut self,
        selection: &[VertexIndex],
        iterations: Option<u32>,
        topology: &MeshTopology,
        target: &mut T,
    ) -> Result<RegionSelectionOutcome, MaskError> {
        let active = self
            .region_selection
            .take()
            .ok_or(MaskError::NoRegionSelection)?;

        let request = RegionMaskRequest {
            base_mesh: &active.base_mesh,
            selection,
            iterations,
        };
        let result = self.apply_region_mask(request, topology, target);
        if let Err(err) = &result {
            warn!("Region mask on '{}' failed: {}", active.base_mesh, err);
        }

        Ok(RegionSelectionOutcome {
            proxy_name: active.proxy_name,
            result,
        })
    }

    /// Leave region-selection mode without applying; returns the proxy name.
    pub fn cancel_region_selection(&mut self) -> Option<String> {
        self.region_selection.take().map(|active| active.proxy_name)
    }

    pub fn is_region_selecting(&self) -> bool {
        self.region_selection.is_some()
    }

    /// Proxy mesh of the active region selection
    pub fn active_proxy(&self) -> Option<&str> {
        self.region_selection
            .as_ref()
            .map(|active| active.proxy_name.as_str())
    }

    /// Adjacency graph for a mesh, built on first use.
    ///
    /// A cached graph is reused only while the mesh's topology is unchanged;
    /// a different topology under the same name rebuilds the entry.
    pub fn adjacency(
        &mut self,
        mesh: &str,
        topology: &MeshTopology,
    ) -> Result<Arc<AdjacencyGraph>, MaskError> {
        cached_adjacency(&mut self.adjacency_cache, mesh, topology)
    }

    /// Number of cached adjacency graphs
    pub fn adjacency_cache_len(&self) -> usize {
        self.adjacency_cache.len()
    }

    /// Drop the cached graph of one mesh (e.g. after its topology changed)
    pub fn invalidate_adjacency(&mut self, mesh: &str) -> bool {
        self.adjacency_cache.remove(mesh).is_some()
    }

    pub fn clear_adjacency_cache(&mut self) {
        self.adjacency_cache.clear();
    }

    fn mask_key(&self, base_mesh: &str) -> Result<String, MaskError> {
        let key = self.naming.mask_key_for(base_mesh);
        if key.is_empty() {
            return Err(MaskError::MissingMaskKey(base_mesh.to_string()));
        }
        Ok(key)
    }

    fn record_applied(&mut self, base_mesh: &str) {
        self.last_applied_base = Some(self.naming.strip_proxy_suffix(base_mesh));
    }
}

fn cached_adjacency(
    cache: &mut HashMap<String, CachedAdjacency>,
    mesh: &str,
    topology: &MeshTopology,
) -> Result<Arc<AdjacencyGraph>, MaskError> {
    let fingerprint = topology.fingerprint();

    match cache.get(mesh) {
        Some(cached) if cached.fingerprint == fingerprint => {
            return Ok(Arc::clone(&cached.graph));
        }
        Some(_) => {
            debug!("Topology of '{}' changed, rebuilding adjacency", mesh);
            cache.remove(mesh);
        }
        None => {}
    }

    let graph = Arc::new(AdjacencyGraph::build(topology)?);
    cache.insert(
        mesh.to_string(),
        CachedAdjacency {
            fingerprint,
            graph: Arc::clone(&graph),
        },
    );
    Ok(graph)
}
