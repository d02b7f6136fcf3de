//! Mesh topology input for the adjacency builder.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::error::MaskError;

/// Dense 0-based vertex index.
///
/// Vertex identity is positional: index `i` of every mask, weight array and
/// neighbor list refers to the same vertex.
pub type VertexIndex = u32;

/// Face/vertex topology of a polygonal mesh.
///
/// Faces may have any arity. The vertex count is either derived from the
/// largest referenced index or supplied by the host (which allows trailing
/// vertices that no face references).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MeshTopology {
    faces: Vec<Vec<VertexIndex>>,
    vertex_count: usize,
}

impl MeshTopology {
    /// Build topology with the vertex count derived as `max(index) + 1`.
    ///
    /// A single bogus index (e.g. `u32::MAX`) inflates the vertex count and
    /// the adjacency graph allocates one entry per vertex. Hosts that know
    /// the real vertex count should use [`MeshTopology::with_vertex_count`],
    /// which turns such indices into [`MaskError::InvalidTopology`].
    pub fn new(faces: Vec<Vec<VertexIndex>>) -> Self {
        let vertex_count = faces
            .iter()
            .flatten()
            .max()
            .map_or(0, |&max| max as usize + 1);
        Self {
            faces,
            vertex_count,
        }
    }

    /// Build topology with an explicit vertex count.
    ///
    /// Indices are not checked here; the adjacency builder rejects faces
    /// that reference vertices outside `[0, vertex_count)`.
    pub fn with_vertex_count(faces: Vec<Vec<VertexIndex>>, vertex_count: usize) -> Self {
        Self {
            faces,
            vertex_count,
        }
    }

    /// Build topology from a flat triangle index buffer.
    pub fn from_triangles(indices: &[VertexIndex], vertex_count: usize) -> Result<Self, MaskError> {
        if indices.len() % 3 != 0 {
            return Err(MaskError::MalformedTopology(
                "Index count not divisible by 3".to_string(),
            ));
        }

        let faces = indices.chunks(3).map(<[VertexIndex]>::to_vec).collect();
        Ok(Self::with_vertex_count(faces, vertex_count))
    }

    /// All faces in order
    pub fn faces(&self) -> &[Vec<VertexIndex>] {
        &self.faces
    }

    /// Number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Hash of the faces and vertex count, used to detect topology changes.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
