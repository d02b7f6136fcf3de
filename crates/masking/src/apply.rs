//! Writing clamped masks onto blendshape target weights.

use tracing::info;

use crate::error::MaskError;
use crate::mask::Mask;

/// Per-vertex weight array owned by a deformation system.
///
/// Implementations receive complete weight arrays only; a target is never
/// left half written by [`apply_mask`].
pub trait WeightTarget {
    /// Number of vertices of the base mesh driving this target
    fn vertex_count(&self) -> usize;

    /// Replace all weights. `weights.len()` equals [`Self::vertex_count`].
    fn write_weights(&mut self, weights: &[f32]);
}

/// In-memory weight array.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeightBuffer {
    weights: Vec<f32>,
}

impl WeightBuffer {
    /// Buffer of `vertex_count` zero weights
    pub fn new(vertex_count: usize) -> Self {
        Self {
            weights: vec![0.0; vertex_count],
        }
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}

impl WeightTarget for WeightBuffer {
    fn vertex_count(&self) -> usize {
        self.weights.len()
    }

    fn write_weights(&mut self, weights: &[f32]) {
        self.weights.copy_from_slice(weights);
    }
}

/// Outcome of a successful apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyReport {
    /// Weights written
    pub vertex_count: usize,
    /// Weights that were outside `[0, 1]` before clamping
    pub clamped_count: usize,
}

/// Clamp a mask to `[0, 1]` and write it onto a target.
///
/// Fails with [`MaskError::VertexCountMismatch`] without touching the
/// target when the mask length differs from the target's vertex count.
pub fn apply_mask<T: WeightTarget + ?Sized>(
    target: &mut T,
    mask: &Mask,
) -> Result<ApplyReport, MaskError> {
    let clamped = mask.clamped();
    let vertex_count = target.vertex_count();

    if clamped.len() != vertex_count {
        return Err(MaskError::VertexCountMismatch {
            mask_len: clamped.len(),
            vertex_count,
        });
    }

    let clamped_count = mask
        .as_slice()
        .iter()
        .zip(clamped.as_slice())
        .filter(|(before, after)| before.to_bits() != after.to_bits())
        .count();

    target.write_weights(clamped.as_slice());

    info!(
        "Applied blendshape mask: {} weights ({} clamped)",
        vertex_count, clamped_count
    );

    Ok(ApplyReport {
        vertex_count,
        clamped_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_writes_clamped_weights() {
        let mut target = WeightBuffer::new(4);
        let report = apply_mask(&mut target, &Mask::new(vec![-0.2, 0.5, 1.7, 1.0])).unwrap();

        assert_eq!(target.weights(), &[0.0, 0.5, 1.0, 1.0]);
        assert_eq!(
            report,
            ApplyReport {
                vertex_count: 4,
                clamped_count: 2
            }
        );
    }

    #[test]
    fn test_mismatch_leaves_target_untouched() {
        let mut target = WeightBuffer::new(3);
        target.write_weights(&[0.1, 0.2, 0.3]);

        let err = apply_mask(&mut target, &Mask::new(vec![1.0, 1.0])).unwrap_err();

        assert_eq!(
            err,
            MaskError::VertexCountMismatch {
                mask_len: 2,
                vertex_count: 3
            }
        );
        assert_eq!(target.weights(), &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_weights_always_in_range() {
        let mut target = WeightBuffer::new(5);
        let mask = Mask::new(vec![f32::NEG_INFINITY, -3.0, 0.25, 40.0, f32::NAN]);
        apply_mask(&mut target, &mask).unwrap();

        assert!(target.weights().iter().all(|w| (0.0..=1.0).contains(w)));
    }

    /// Counts writes so rejected applies can be shown to perform none.
    struct CountingTarget {
        vertex_count: usize,
        writes: usize,
    }

    impl WeightTarget for CountingTarget {
        fn vertex_count(&self) -> usize {
            self.vertex_count
        }

        fn write_weights(&mut self, _weights: &[f32]) {
            self.writes += 1;
        }
    }

    #[test]
    fn test_single_write_on_success_none_on_failure() {
        let mut target = CountingTarget {
            vertex_count: 2,
            writes: 0,
        };

        assert!(apply_mask(&mut target, &Mask::zeros(3)).is_err());
        assert_eq!(target.writes, 0);

        apply_mask(&mut target, &Mask::zeros(2)).unwrap();
        assert_eq!(target.writes, 1);
    }
}
