//! PLY file loading functions

use crate::error::DataError;
use crate::ply::{PlyMesh, PlyVertex};
use glam::{Vec3, Vec4};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

// Face structure for PLY files
#[derive(Deserialize, Debug)]
#[allow(dead_code)]
struct PlyFace {
    vertex_indices: Vec<i32>,
}

// PLY file structure
#[derive(Deserialize, Debug)]
struct PlyFile {
    #[serde(rename = "vertex")]
    vertex: Vec<HashMap<String, JsonValue>>,
    #[serde(default, rename = "face", skip_serializing_if = "Vec::is_empty")]
    face: Vec<PlyFace>,
}

/// Load a mesh from a PLY file.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_mesh_from_ply(path: impl AsRef<Path>) -> Result<PlyMesh, DataError> {
    debug!("Loading PLY mesh from: {}", path.as_ref().display());
    let file = File::open(path.as_ref())?;
    mesh_from_reader(BufReader::new(file))
}

/// Parse a PLY mesh from any buffered reader.
pub fn mesh_from_reader<R: BufRead>(reader: R) -> Result<PlyMesh, DataError> {
    let ply_data: PlyFile = serde_ply::from_reader(reader).map_err(|e| {
        warn!("Failed to parse PLY file: {}", e);
        DataError::Ply(e.to_string())
    })?;

    info!(
        "PLY file parsed: {} vertices, {} faces",
        ply_data.vertex.len(),
        ply_data.face.len()
    );

    let vertices = ply_data
        .vertex
        .iter()
        .enumerate()
        .map(|(i, row)| vertex_from_row(row, i))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PlyMesh {
        vertices,
        face_count: ply_data.face.len(),
    })
}

fn get_f32(prop: Option<&JsonValue>) -> Option<f32> {
    prop.and_then(|v| match v {
        JsonValue::Number(n) => n.as_f64().map(|f| f as f32),
        _ => None,
    })
}

fn get_u8(prop: Option<&JsonValue>) -> Option<u8> {
    prop.and_then(|v| match v {
        JsonValue::Number(n) => n
            .as_u64()
            .map(|u| u as u8)
            .or_else(|| n.as_i64().map(|i| i as u8)),
        _ => None,
    })
}

/// Convert one decoded PLY vertex row into a [`PlyVertex`].
pub(crate) fn vertex_from_row(
    row: &HashMap<String, JsonValue>,
    index: usize,
) -> Result<PlyVertex, DataError> {
    let coord = |property: &'static str| {
        get_f32(row.get(property)).ok_or(DataError::MissingProperty {
            property,
            vertex: index,
        })
    };
    let position = Vec3::new(coord("x")?, coord("y")?, coord("z")?);

    let rgb = if let (Some(r), Some(g), Some(b)) = (
        get_u8(row.get("red")),
        get_u8(row.get("green")),
        get_u8(row.get("blue")),
    ) {
        Some((r, g, b))
    } else if let (Some(r), Some(g), Some(b)) = (
        get_u8(row.get("r")),
        get_u8(row.get("g")),
        get_u8(row.get("b")),
    ) {
        Some((r, g, b))
    } else {
        None
    };

    let color = rgb.map(|(r, g, b)| {
        let raw_alpha = get_f32(row.get("alpha"))
            .or_else(|| get_f32(row.get("opacity")))
            .unwrap_or(1.0);
        // Byte alpha and logit opacity both show up in the wild.
        let alpha = if (0.0..=1.0).contains(&raw_alpha) {
            raw_alpha
        } else if raw_alpha > 1.0 && raw_alpha <= 255.0 && raw_alpha.fract() == 0.0 {
            raw_alpha / 255.0
        } else {
            (1.0 / (1.0 + (-raw_alpha).exp())).clamp(0.0, 1.0)
        };
        Vec4::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            alpha,
        )
    });

    Ok(PlyVertex { position, color })
}
