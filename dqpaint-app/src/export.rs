//! JSON dump of mesh color channels.

use crate::error::AppError;
use dqpaint_core::{ColorChannel, MemoryMesh};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// One color channel. Unset vertices are `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelExport {
    pub name: String,
    pub colors: Vec<Option<[f32; 4]>>,
}

impl From<&ColorChannel> for ChannelExport {
    fn from(channel: &ColorChannel) -> Self {
        Self {
            name: channel.name().to_string(),
            colors: channel
                .colors()
                .iter()
                .map(|c| c.map(|c| c.to_array()))
                .collect(),
        }
    }
}

/// Every channel of one mesh, plus which one is active and shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshExport {
    pub mesh: String,
    pub active_channel: Option<String>,
    pub visible: bool,
    pub channels: Vec<ChannelExport>,
}

impl MeshExport {
    pub fn from_mesh(mesh: &MemoryMesh) -> Self {
        Self {
            mesh: mesh.name().to_string(),
            active_channel: mesh.active_channel().map(str::to_string),
            visible: mesh.display_colors(),
            channels: mesh.channels().iter().map(ChannelExport::from).collect(),
        }
    }
}

#[cfg(test)]
impl MeshExport {
    pub fn channel(&self, name: &str) -> Option<&ChannelExport> {
        self.channels.iter().find(|c| c.name == name)
    }
}

/// Write `meshes` as a JSON array.
pub fn write_exports(meshes: &[MeshExport], path: &Path) -> Result<(), AppError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, meshes)?;
    writer.flush()?;
    info!("Wrote {} meshes to {}", meshes.len(), path.display());
    Ok(())
}
