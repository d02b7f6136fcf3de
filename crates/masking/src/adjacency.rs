//! Vertex adjacency graph derived from face membership.
//!
//! Any two distinct vertices that share a face are linked, not only the
//! pairs joined by a mesh edge. On quads and n-gons this also links the
//! diagonals, which widens the smoothing kernel compared to edge-only
//! adjacency. Smoothing results depend on this exact policy.

use tracing::debug;

use crate::error::MaskError;
use crate::topology::{MeshTopology, VertexIndex};

/// Undirected 1-ring neighbor graph.
///
/// Every vertex in `[0, vertex_count)` has an entry, possibly empty.
/// Neighbor lists are sorted ascending and free of duplicates, so any
/// traversal (and floating-point summation) over them is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdjacencyGraph {
    neighbors: Vec<Vec<VertexIndex>>,
}

impl AdjacencyGraph {
    /// Build the face-clique adjacency of a mesh.
    ///
    /// Fails with [`MaskError::InvalidTopology`] on the first face that
    /// references a vertex outside `[0, vertex_count)`; no partial graph is
    /// returned.
    pub fn build(topology: &MeshTopology) -> Result<Self, MaskError> {
        let vertex_count = topology.vertex_count();
        let mut neighbors: Vec<Vec<VertexIndex>> = vec![Vec::new(); vertex_count];

        for (face_idx, face) in topology.faces().iter().enumerate() {
            if let Some(&vertex) = face.iter().find(|&&v| v as usize >= vertex_count) {
                return Err(MaskError::InvalidTopology {
                    face: face_idx,
                    vertex,
                    vertex_count,
                });
            }

            for &vi in face {
                for &vj in face {
                    if vi != vj {
                        neighbors[vi as usize].push(vj);
                    }
                }
            }
        }

        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }

        let graph = Self { neighbors };
        debug!(
            "AdjacencyGraph::build: {} vertices, {} faces, {} edges",
            vertex_count,
            topology.face_count(),
            graph.edge_count()
        );

        Ok(graph)
    }

    /// Number of vertices (entries) in the graph
    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Neighbors of a vertex; empty for isolated or out-of-range vertices
    pub fn neighbors(&self, vertex: VertexIndex) -> &[VertexIndex] {
        self.neighbors
            .get(vertex as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of neighbors of a vertex
    pub fn degree(&self, vertex: VertexIndex) -> usize {
        self.neighbors(vertex).len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Iterate `(vertex, neighbors)` in vertex order
    pub fn iter(&self) -> impl Iterator<Item = (VertexIndex, &[VertexIndex])> + '_ {
        self.neighbors
            .iter()
            .enumerate()
            .map(|(i, list)| (i as VertexIndex, list.as_slice()))
    }

    /// Whether `j ∈ neighbors(i) ⇔ i ∈ neighbors(j)` holds for every pair
    pub fn is_symmetric(&self) -> bool {
        self.iter().all(|(i, list)| {
            list.iter()
                .all(|&j| self.neighbors(j).binary_search(&i).is_ok())
        })
    }
}
