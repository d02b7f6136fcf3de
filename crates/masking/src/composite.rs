//! Region override compositing.

use tracing::debug;

use crate::mask::Mask;
use crate::region::AffectedSet;

/// Force every affected vertex to full weight on top of a base mask.
///
/// `result[i] = 1.0` for affected `i`, otherwise `base[i]`. The result has
/// the base mask's length; affected indices past the end are ignored.
pub fn composite_region(base: &Mask, affected: &AffectedSet) -> Mask {
    let mut result = base.clone();
    let weights = result.as_mut_slice();

    let mut ignored = 0usize;
    for &vertex in affected {
        match weights.get_mut(vertex as usize) {
            Some(w) => *w = 1.0,
            None => ignored += 1,
        }
    }

    if ignored > 0 {
        debug!(
            "composite_region: ignored {} affected vertices beyond mask length {}",
            ignored,
            base.len()
        );
    }

    result
}
