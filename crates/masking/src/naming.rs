//! Mesh naming conventions and selection role assignment.
//!
//! The host scene identifies meshes by name. A base mesh `head` gets a
//! region-selection proxy `head_regionSelect`, and its base mask is stored
//! under the base name with the mask-key suffix removed.

use blendmask_config::NamingConfig;
use tracing::trace;

use crate::topology::VertexIndex;

/// Name transformations driven by [`NamingConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MeshNaming {
    config: NamingConfig,
}

impl MeshNaming {
    pub fn new(config: NamingConfig) -> Self {
        Self { config }
    }

    /// Name of the region-selection proxy for a base mesh
    pub fn proxy_name(&self, base_mesh: &str) -> String {
        format!("{}{}", base_mesh, self.config.proxy_suffix)
    }

    /// Whether a mesh name refers to a region-selection proxy
    pub fn is_proxy(&self, mesh: &str) -> bool {
        !self.config.proxy_suffix.is_empty() && mesh.contains(&self.config.proxy_suffix)
    }

    /// Base mesh name with any proxy suffix removed
    pub fn strip_proxy_suffix(&self, mesh: &str) -> String {
        remove_all(mesh, &self.config.proxy_suffix)
    }

    /// Mask key under which a base mesh's mask is stored
    pub fn mask_key_for(&self, base_mesh: &str) -> String {
        remove_all(base_mesh, &self.config.mask_key_suffix)
    }
}

fn remove_all(name: &str, pattern: &str) -> String {
    if pattern.is_empty() {
        name.to_string()
    } else {
        name.replace(pattern, "")
    }
}

/// Target and base meshes chosen by object selection order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MeshRoles {
    /// First selected object
    pub target: Option<String>,
    /// Second selected object
    pub base: Option<String>,
}

impl MeshRoles {
    /// Derive roles from an ordered object selection.
    ///
    /// Returns `None` when every selected object is a proxy; callers keep
    /// their current roles in that case. An empty selection clears both
    /// roles. Objects past the second are ignored.
    pub fn from_selection<S: AsRef<str>>(objects: &[S], naming: &MeshNaming) -> Option<Self> {
        if !objects.is_empty() && objects.iter().all(|o| naming.is_proxy(o.as_ref())) {
            return None;
        }

        let mut names = objects.iter().map(|o| o.as_ref().to_string());
        Some(Self {
            target: names.next(),
            base: names.next(),
        })
    }

    /// Whether both roles are assigned
    pub fn is_complete(&self) -> bool {
        self.target.is_some() && self.base.is_some()
    }
}

/// Extract vertex indices from host component names such as `head.vtx[12]`.
///
/// Entries without a bracketed index, or whose index is not a non-negative
/// integer, are skipped.
pub fn parse_vertex_components<S: AsRef<str>>(components: &[S]) -> Vec<VertexIndex> {
    components
        .iter()
        .filter_map(|component| {
            let component = component.as_ref();
            let (_, tail) = component.rsplit_once('[')?;
            let index = tail.split(']').next()?.trim();
            match index.parse::<VertexIndex>() {
                Ok(index) => Some(index),
                Err(_) => {
                    trace!("parse_vertex_components: skipping '{}'", component);
                    None
                }
            }
        })
        .collect()
}
