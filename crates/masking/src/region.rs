//! Selection → affected region resolution.

use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::error::MaskError;
use crate::tables::ColorRegionMap;
use crate::topology::VertexIndex;

/// Ordered set of vertices forced to full weight by a region override.
pub type AffectedSet = BTreeSet<VertexIndex>;

/// Expand a sparse vertex selection to every vertex of the touched regions.
///
/// Each selected vertex contributes the full vertex list of its region
/// color. Vertices without a color, and colors without a region list,
/// contribute nothing. The result does not depend on selection order.
pub fn resolve_region(
    selection: &[VertexIndex],
    regions: &ColorRegionMap,
) -> Result<AffectedSet, MaskError> {
    if selection.is_empty() {
        return Err(MaskError::EmptySelection);
    }

    let mut affected = AffectedSet::new();
    let mut colors = BTreeSet::new();

    for &vertex in selection {
        let Some(color) = regions.color_of(vertex) else {
            trace!("resolve_region: vertex {} has no region color, skipping", vertex);
            continue;
        };

        // Each region only needs expanding once
        if colors.insert(color) {
            affected.extend(regions.region_vertices(color).iter().copied());
        }
    }

    debug!(
        "resolve_region: {} selected vertices -> {} regions, {} affected vertices",
        selection.len(),
        colors.len(),
        affected.len()
    );

    Ok(affected)
}
