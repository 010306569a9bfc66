//! Dual-quaternion blend weight exports.
//!
//! A weight export groups vertices by their (already computed) DQ blend
//! weight. Decoding turns every vertex into a grey color whose channels all
//! equal the weight, ready to be painted into a color channel.
//!
//! ```json
//! {
//!     "mesh": "body",
//!     "skinCluster": "skinCluster1",
//!     "exportMode": "mesh",
//!     "blendWeights": [
//!         { "weight": "0.5", "vertices": [0, 1, 2] }
//!     ]
//! }
//! ```

use crate::error::DataError;
use crate::types::grey;
use glam::Vec4;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// Whether the export covers the whole mesh or a vertex selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    #[default]
    Mesh,
    Verts,
}

/// Vertices sharing one blend weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightGroup {
    /// Weight as a trimmed decimal string, e.g. `"0.25"`.
    pub weight: String,
    // Signed so a bad export is reported instead of failing deep in serde.
    pub vertices: Vec<i64>,
}

/// A weight export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightExport {
    pub mesh: String,
    #[serde(default)]
    pub skin_cluster: String,
    #[serde(default)]
    pub export_mode: ExportMode,
    #[serde(default)]
    pub blend_weights: Vec<WeightGroup>,
}

impl WeightExport {
    /// Parse an export from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Parse an export from a JSON string.
    pub fn from_json(text: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Total number of vertices across all groups.
    pub fn vertex_count(&self) -> usize {
        self.blend_weights.iter().map(|g| g.vertices.len()).sum()
    }

    /// Flatten into parallel index and color lists.
    ///
    /// Groups are emitted in document order, vertices in listed order.
    pub fn to_indices_and_colors(&self) -> Result<(Vec<u32>, Vec<Vec4>), DataError> {
        let mut indices = Vec::with_capacity(self.vertex_count());
        let mut colors = Vec::with_capacity(self.vertex_count());

        for (group_index, group) in self.blend_weights.iter().enumerate() {
            let weight: f32 = group.weight.trim().parse().map_err(|_| DataError::InvalidWeight {
                value: group.weight.clone(),
                group: group_index,
            })?;
            if !weight.is_finite() {
                return Err(DataError::InvalidWeight {
                    value: group.weight.clone(),
                    group: group_index,
                });
            }
            let color = grey(weight);

            for &vertex in &group.vertices {
                let index = u32::try_from(vertex).map_err(|_| DataError::NegativeIndex {
                    index: vertex,
                    group: group_index,
                })?;
                indices.push(index);
                colors.push(color);
            }
        }

        debug!(
            "Decoded {} weight groups into {} assignments",
            self.blend_weights.len(),
            indices.len()
        );
        Ok((indices, colors))
    }
}

/// Load a weight export from a JSON file.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_weight_export(path: impl AsRef<Path>) -> Result<WeightExport, DataError> {
    let file = File::open(path.as_ref())?;
    let export = WeightExport::from_reader(BufReader::new(file))?;
    info!(
        "Weight export for '{}': {} groups, {} vertices",
        export.mesh,
        export.blend_weights.len(),
        export.vertex_count()
    );
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "mesh": "body",
        "skinCluster": "skinCluster1",
        "exportMode": "verts",
        "blendWeights": [
            { "weight": "0", "vertices": [4, 5] },
            { "weight": "0.5", "vertices": [1] },
            { "weight": "1", "vertices": [0, 2] }
        ]
    }"#;

    #[test]
    fn test_parse_export() {
        let export = WeightExport::from_json(SAMPLE).unwrap();
        assert_eq!(export.mesh, "body");
        assert_eq!(export.skin_cluster, "skinCluster1");
        assert_eq!(export.export_mode, ExportMode::Verts);
        assert_eq!(export.vertex_count(), 5);
    }

    #[test]
    fn test_flatten_preserves_group_order() {
        let export = WeightExport::from_json(SAMPLE).unwrap();
        let (indices, colors) = export.to_indices_and_colors().unwrap();
        assert_eq!(indices, vec![4, 5, 1, 0, 2]);
        assert_eq!(colors[0], Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(colors[2], Vec4::new(0.5, 0.5, 0.5, 1.0));
        assert_eq!(colors[4], Vec4::ONE);
    }

    #[test]
    fn test_optional_fields_default() {
        let export = WeightExport::from_json(r#"{ "mesh": "m" }"#).unwrap();
        assert_eq!(export.export_mode, ExportMode::Mesh);
        assert!(export.skin_cluster.is_empty());
        let (indices, colors) = export.to_indices_and_colors().unwrap();
        assert!(indices.is_empty() && colors.is_empty());
    }

    #[test]
    fn test_invalid_weight_string() {
        let export = WeightExport::from_json(
            r#"{ "mesh": "m", "blendWeights": [ { "weight": "heavy", "vertices": [0] } ] }"#,
        )
        .unwrap();
        assert!(matches!(
            export.to_indices_and_colors(),
            Err(DataError::InvalidWeight { group: 0, .. })
        ));
    }

    #[test]
    fn test_negative_vertex_index() {
        let export = WeightExport::from_json(
            r#"{ "mesh": "m", "blendWeights": [ { "weight": "1", "vertices": [3, -1] } ] }"#,
        )
        .unwrap();
        assert!(matches!(
            export.to_indices_and_colors(),
            Err(DataError::NegativeIndex { index: -1, group: 0 })
        ));
    }

    #[test]
    fn test_weight_above_one_is_clamped() {
        let export = WeightExport::from_json(
            r#"{ "mesh": "m", "blendWeights": [ { "weight": "1.7", "vertices": [0] } ] }"#,
        )
        .unwrap();
        let (_, colors) = export.to_indices_and_colors().unwrap();
        assert_eq!(colors, vec![Vec4::ONE]);
    }
}
