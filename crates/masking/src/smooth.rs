//! Diffusion smoothing of masks over the adjacency graph.
//!
//! Each pass replaces every weight with a weighted average of itself and
//! its neighbors from the previous pass:
//!
//! ```text
//! new[i] = (prev[i] + w * Σ_{j ∈ N(i)} prev[j]) / (1 + w * |N(i)|)
//! ```
//!
//! Passes are double-buffered: a pass reads only the frozen previous
//! buffer and writes only the next one, so the result never depends on
//! vertex visiting order. Values are not clamped between passes.

use blendmask_config::{SmoothingConfig, DEFAULT_NEIGHBOR_WEIGHT, DEFAULT_SMOOTH_ITERATIONS};
use tracing::debug;

use crate::adjacency::AdjacencyGraph;
use crate::error::MaskError;
use crate::mask::Mask;

/// Smoothing pass count and kernel weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParams {
    /// Number of sequential passes; 0 leaves the mask unchanged
    pub iterations: u32,
    /// Neighbor weight `w`; must be finite and positive
    pub weight: f32,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_SMOOTH_ITERATIONS,
            weight: DEFAULT_NEIGHBOR_WEIGHT,
        }
    }
}

impl SmoothingParams {
    pub fn new(iterations: u32, weight: f32) -> Self {
        Self { iterations, weight }
    }

    /// Configured defaults
    pub fn from_config(config: &SmoothingConfig) -> Self {
        Self {
            iterations: config.iterations,
            weight: config.neighbor_weight,
        }
    }

    fn validate(&self) -> Result<(), MaskError> {
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(MaskError::InvalidSmoothing(self.weight));
        }
        Ok(())
    }
}

/// Smooth a mask with `params.iterations` diffusion passes.
///
/// The mask must have one weight per graph vertex. The input is not
/// modified.
pub fn smooth_mask(
    mask: &Mask,
    graph: &AdjacencyGraph,
    params: &SmoothingParams,
) -> Result<Mask, MaskError> {
    params.validate()?;

    if mask.len() != graph.vertex_count() {
        return Err(MaskError::VertexCountMismatch {
            mask_len: mask.len(),
            vertex_count: graph.vertex_count(),
        });
    }

    let mut prev = mask.as_slice().to_vec();
    let mut next = vec![0.0f32; prev.len()];

    for _ in 0..params.iterations {
        diffusion_pass(&prev, &mut next, graph, params.weight);
        std::mem::swap(&mut prev, &mut next);
    }

    debug!(
        "smooth_mask: {} vertices, {} passes, weight {}",
        prev.len(),
        params.iterations,
        params.weight
    );

    Ok(Mask::new(prev))
}

/// Smoothed value of one vertex from the previous pass.
#[inline]
fn diffuse_vertex(prev: &[f32], vertex: usize, graph: &AdjacencyGraph, weight: f32) -> f32 {
    let neighbors = graph.neighbors(vertex as u32);
    let neighbor_sum: f32 = neighbors.iter().map(|&j| prev[j as usize]).sum();
    (prev[vertex] + weight * neighbor_sum) / (1.0 + weight * neighbors.len() as f32)
}

#[cfg_attr(feature = "parallel", allow(dead_code))]
fn serial_pass(prev: &[f32], next: &mut [f32], graph: &AdjacencyGraph, weight: f32) {
    for (i, out) in next.iter_mut().enumerate() {
        *out = diffuse_vertex(prev, i, graph, weight);
    }
}

#[cfg(feature = "parallel")]
fn parallel_pass(prev: &[f32], next: &mut [f32], graph: &AdjacencyGraph, weight: f32) {
    use rayon::prelude::*;

    next.par_iter_mut()
        .enumerate()
        .for_each(|(i, out)| *out = diffuse_vertex(prev, i, graph, weight));
}

/// One full pass; returns only once every vertex of `next` is written.
fn diffusion_pass(prev: &[f32], next: &mut [f32], graph: &AdjacencyGraph, weight: f32) {
    #[cfg(feature = "parallel")]
    parallel_pass(prev, next, graph, weight);

    #[cfg(not(feature = "parallel"))]
    serial_pass(prev, next, graph, weight);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::MeshTopology;

    fn two_triangle_graph() -> AdjacencyGraph {
        AdjacencyGraph::build(&MeshTopology::new(vec![vec![0, 1, 2], vec![0, 2, 3]])).unwrap()
    }

    fn path_graph(len: u32) -> AdjacencyGraph {
        let faces = (0..len.saturating_sub(1)).map(|i| vec![i, i + 1]).collect();
        AdjacencyGraph::build(&MeshTopology::new(faces)).unwrap()
    }

    fn assert_close(actual: &[f32], expected: &[f32]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!((a - e).abs() < 1e-6, "vertex {i}: expected {e}, got {a}");
        }
    }

    #[test]
    fn test_single_pass_values() {
        let graph = two_triangle_graph();
        let mask = Mask::new(vec![1.0, 0.0, 0.0, 0.0]);
        let smoothed = smooth_mask(&mask, &graph, &SmoothingParams::new(1, 0.5)).unwrap();

        assert_close(smoothed.as_slice(), &[0.4, 0.25, 0.2, 0.25]);
    }

    #[test]
    fn test_zero_iterations_is_identity() {
        let graph = two_triangle_graph();
        let mask = Mask::new(vec![0.3, -1.0, 2.0, 0.7]);
        let smoothed = smooth_mask(&mask, &graph, &SmoothingParams::new(0, 0.5)).unwrap();

        assert_eq!(smoothed, mask);
    }

    #[test]
    fn test_isolated_vertex_unchanged() {
        let topology = MeshTopology::with_vertex_count(vec![vec![0, 1, 2]], 4);
        let graph = AdjacencyGraph::build(&topology).unwrap();
        let mask = Mask::new(vec![1.0, 0.0, 0.0, 0.65]);

        let smoothed = smooth_mask(&mask, &graph, &SmoothingParams::new(7, 2.0)).unwrap();
        assert_eq!(smoothed.get(3), Some(0.65));
    }

    #[test]
    fn test_reads_previous_pass_only() {
        // In-place updates would let vertex 2 see vertex 1's new value
        let graph = path_graph(3);
        let mask = Mask::new(vec![1.0, 0.0, 0.0]);
        let smoothed = smooth_mask(&mask, &graph, &SmoothingParams::new(1, 1.0)).unwrap();

        assert_close(smoothed.as_slice(), &[0.5, 1.0 / 3.0, 0.0]);
    }

    #[test]
    fn test_no_clamping_between_passes() {
        let graph = path_graph(2);
        let mask = Mask::new(vec![3.0, 0.0]);
        let smoothed = smooth_mask(&mask, &graph, &SmoothingParams::new(1, 0.5)).unwrap();

        assert_close(smoothed.as_slice(), &[2.0, 1.0]);
    }

    #[test]
    fn test_more_passes_blur_further() {
        let graph = path_graph(6);
        let mut mask = Mask::zeros(6);
        mask.as_mut_slice()[0] = 1.0;

        let one = smooth_mask(&mask, &graph, &SmoothingParams::new(1, 0.5)).unwrap();
        let many = smooth_mask(&mask, &graph, &SmoothingParams::new(10, 0.5)).unwrap();

        assert_eq!(one.get(4), Some(0.0));
        assert!(many.get(4).unwrap() > 0.0);
        assert!(many.get(0).unwrap() < one.get(0).unwrap());
    }

    #[test]
    fn test_deterministic() {
        let graph = two_triangle_graph();
        let mask = Mask::new(vec![1.0, 0.2, 0.0, 0.9]);
        let params = SmoothingParams::default();

        let a = smooth_mask(&mask, &graph, &params).unwrap();
        let b = smooth_mask(&mask, &graph, &params).unwrap();
        let bits = |m: &Mask| m.as_slice().iter().map(|w| w.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn test_invalid_weight() {
        let graph = two_triangle_graph();
        let mask = Mask::zeros(4);

        for weight in [0.0, -0.5, f32::NAN, f32::INFINITY] {
            let result = smooth_mask(&mask, &graph, &SmoothingParams::new(1, weight));
            assert!(matches!(result, Err(MaskError::InvalidSmoothing(_))));
        }
    }

    #[test]
    fn test_length_mismatch() {
        let graph = two_triangle_graph();
        let result = smooth_mask(&Mask::zeros(3), &graph, &SmoothingParams::default());
        assert_eq!(
            result.unwrap_err(),
            MaskError::VertexCountMismatch {
                mask_len: 3,
                vertex_count: 4
            }
        );
    }

    #[test]
    fn test_default_params() {
        let params = SmoothingParams::default();
        assert_eq!(params.iterations, 10);
        assert_eq!(params.weight, 0.5);
        assert_eq!(
            SmoothingParams::from_config(&SmoothingConfig::default()),
            params
        );
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_serial() {
        let graph = path_graph(257);
        let prev: Vec<f32> = (0..257).map(|i| ((i * 37) % 11) as f32 / 10.0).collect();
        let mut serial = vec![0.0; prev.len()];
        let mut parallel = vec![0.0; prev.len()];

        serial_pass(&prev, &mut serial, &graph, 0.5);
        parallel_pass(&prev, &mut parallel, &graph, 0.5);
        assert_eq!(serial, parallel);
    }
}
