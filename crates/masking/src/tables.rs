//! Vertex ↔ region color lookup tables.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use tracing::debug;

use crate::color::ColorKey;
use crate::error::LoadError;
use crate::topology::VertexIndex;

/// Vertex map document as stored on disk, before key validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawVertexMap {
    vertex_groups: HashMap<String, Vec<VertexIndex>>,
    vertex_to_color: HashMap<String, String>,
}

/// Validated pair of region lookup tables.
///
/// `color_to_vertices` is the authoritative grouping; `vertex_to_color` is
/// only the lookup key for a selected vertex. The two are expected to be
/// inverse-consistent but inconsistencies are tolerated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorRegionMap {
    vertex_to_color: HashMap<VertexIndex, ColorKey>,
    color_to_vertices: HashMap<ColorKey, Vec<VertexIndex>>,
}

impl ColorRegionMap {
    /// Create a map from already-typed tables
    pub fn new(
        vertex_to_color: HashMap<VertexIndex, ColorKey>,
        color_to_vertices: HashMap<ColorKey, Vec<VertexIndex>>,
    ) -> Self {
        Self {
            vertex_to_color,
            color_to_vertices,
        }
    }

    /// Build a map where every vertex of each region maps back to it.
    pub fn from_regions(regions: impl IntoIterator<Item = (ColorKey, Vec<VertexIndex>)>) -> Self {
        let mut map = Self::default();
        for (color, vertices) in regions {
            for &v in &vertices {
                map.vertex_to_color.insert(v, color);
            }
            map.color_to_vertices.insert(color, vertices);
        }
        map
    }

    /// Parse and validate a vertex map document.
    ///
    /// Both `vertex_groups` and `vertex_to_color` are optional. Any malformed
    /// color key or vertex id rejects the whole document.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let raw: RawVertexMap = serde_json::from_str(json)?;

        let color_to_vertices = raw
            .vertex_groups
            .into_iter()
            .map(|(color, vertices)| Ok((color.parse::<ColorKey>()?, vertices)))
            .collect::<Result<HashMap<_, _>, LoadError>>()?;

        let vertex_to_color = raw
            .vertex_to_color
            .into_iter()
            .map(|(vertex, color)| {
                let index = vertex
                    .trim()
                    .parse::<VertexIndex>()
                    .map_err(|_| LoadError::MalformedVertexId(vertex.clone()))?;
                Ok((index, color.parse::<ColorKey>()?))
            })
            .collect::<Result<HashMap<_, _>, LoadError>>()?;

        let map = Self::new(vertex_to_color, color_to_vertices);
        let inconsistent = map.inconsistent_vertices().len();
        debug!(
            "ColorRegionMap: loaded {} regions, {} colored vertices ({} inconsistent)",
            map.region_count(),
            map.vertex_to_color.len(),
            inconsistent
        );

        Ok(map)
    }

    /// Region color of a vertex, if it has one
    pub fn color_of(&self, vertex: VertexIndex) -> Option<ColorKey> {
        self.vertex_to_color.get(&vertex).copied()
    }

    /// Vertices of a region; empty if the color has no region list
    pub fn region_vertices(&self, color: ColorKey) -> &[VertexIndex] {
        self.color_to_vertices
            .get(&color)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of regions
    pub fn region_count(&self) -> usize {
        self.color_to_vertices.len()
    }

    /// Whether both tables are empty
    pub fn is_empty(&self) -> bool {
        self.vertex_to_color.is_empty() && self.color_to_vertices.is_empty()
    }

    /// Per-vertex display colors for the proxy mesh, ordered by vertex.
    pub fn vertex_colors(&self) -> Vec<(VertexIndex, ColorKey)> {
        let ordered: BTreeMap<_, _> = self.vertex_to_color.iter().map(|(&v, &c)| (v, c)).collect();
        ordered.into_iter().collect()
    }

    /// Vertices whose color's region list does not contain them, ordered.
    pub fn inconsistent_vertices(&self) -> Vec<VertexIndex> {
        let mut vertices: Vec<VertexIndex> = self
            .vertex_to_color
            .iter()
            .filter(|&(&v, &color)| !self.region_vertices(color).contains(&v))
            .map(|(&v, _)| v)
            .collect();
        vertices.sort_unstable();
        vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RED: ColorKey = ColorKey::new(255, 0, 0);
    const BLUE: ColorKey = ColorKey::new(0, 0, 255);

    #[test]
    fn test_load_vertex_map() {
        let doc = json!({
            "vertex_groups": {
                "(255, 0, 0)": [0, 1],
                "(0, 0, 255)": [2, 3]
            },
            "vertex_to_color": {
                "0": "(255, 0, 0)",
                "1": "(255, 0, 0)",
                "2": "(0, 0, 255)",
                "3": "(0, 0, 255)"
            }
        });
        let map = ColorRegionMap::from_json_str(&doc.to_string()).unwrap();

        assert_eq!(map.region_count(), 2);
        assert_eq!(map.color_of(1), Some(RED));
        assert_eq!(map.color_of(3), Some(BLUE));
        assert_eq!(map.color_of(4), None);
        assert_eq!(map.region_vertices(BLUE), &[2, 3]);
        assert!(map.inconsistent_vertices().is_empty());
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let map = ColorRegionMap::from_json_str("{}").unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_malformed_color_key_rejects_load() {
        let doc = json!({ "vertex_groups": { "(255, 0)": [0] } });
        let err = ColorRegionMap::from_json_str(&doc.to_string()).unwrap_err();
        assert!(matches!(err, LoadError::MalformedColorKey(_)));
    }

    #[test]
    fn test_malformed_vertex_id_rejects_load() {
        let doc = json!({ "vertex_to_color": { "v12": "(1, 2, 3)" } });
        let err = ColorRegionMap::from_json_str(&doc.to_string()).unwrap_err();
        assert!(matches!(err, LoadError::MalformedVertexId(id) if id == "v12"));
    }

    #[test]
    fn test_invalid_json_rejects_load() {
        let err = ColorRegionMap::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn test_inconsistent_tables_tolerated() {
        let mut vertex_to_color = HashMap::new();
        vertex_to_color.insert(0, RED);
        vertex_to_color.insert(5, RED);
        let mut color_to_vertices = HashMap::new();
        color_to_vertices.insert(RED, vec![0, 1]);
        let map = ColorRegionMap::new(vertex_to_color, color_to_vertices);

        assert_eq!(map.inconsistent_vertices(), vec![5]);
        assert_eq!(map.region_vertices(RED), &[0, 1]);
    }

    #[test]
    fn test_vertex_colors_ordered() {
        let map = ColorRegionMap::from_regions([(BLUE, vec![4, 2]), (RED, vec![3, 0])]);
        let colors = map.vertex_colors();
        assert_eq!(colors, vec![(0, RED), (2, BLUE), (3, RED), (4, BLUE)]);
    }
}
