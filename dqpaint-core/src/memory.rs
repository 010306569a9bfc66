//! In-memory mesh and scene implementations.
//!
//! [`MemoryMesh`] is a complete [`MeshStore`]: it bounds-checks indices,
//! applies bulk writes all-or-nothing, refuses reserved channel names and
//! can be marked read-only. [`Scene`] looks meshes up by name.

use crate::error::PaintError;
use crate::store::{MeshStore, StoreError};
use dqpaint_data::PlyMesh;
use glam::Vec4;
use std::collections::BTreeMap;
use tracing::debug;

/// Channel name used for colors baked into a loaded PLY file.
pub const PLY_CHANNEL_NAME: &str = "ply";

/// A named color channel with one slot per vertex.
///
/// `None` is the unset/default color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorChannel {
    name: String,
    colors: Vec<Option<Vec4>>,
}

impl ColorChannel {
    fn empty(name: &str, vertex_count: usize) -> Self {
        Self {
            name: name.to_string(),
            colors: vec![None; vertex_count],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn colors(&self) -> &[Option<Vec4>] {
        &self.colors
    }

    /// Color at `index`, `None` if unset or out of range.
    pub fn get(&self, index: usize) -> Option<Vec4> {
        self.colors.get(index).copied().flatten()
    }

    /// Number of vertices with a color set.
    pub fn assigned_count(&self) -> usize {
        self.colors.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned_count() == 0
    }
}

/// A mesh held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryMesh {
    name: String,
    vertex_count: usize,
    channels: Vec<ColorChannel>,
    active: Option<String>,
    display_colors: bool,
    read_only: bool,
    reserved: Vec<String>,
}

impl MemoryMesh {
    /// Create a writable mesh with no channels.
    pub fn new(name: impl Into<String>, vertex_count: usize) -> Self {
        Self {
            name: name.into(),
            vertex_count,
            channels: Vec::new(),
            active: None,
            display_colors: false,
            read_only: false,
            reserved: Vec::new(),
        }
    }

    /// Build a mesh from a loaded PLY file.
    ///
    /// Baked vertex colors, if any, seed a channel named [`PLY_CHANNEL_NAME`].
    pub fn from_ply(name: impl Into<String>, ply: &PlyMesh) -> Self {
        let mut mesh = Self::new(name, ply.vertex_count());
        if ply.has_colors() {
            mesh.channels.push(ColorChannel {
                name: PLY_CHANNEL_NAME.to_string(),
                colors: ply.colors(),
            });
            mesh.active = Some(PLY_CHANNEL_NAME.to_string());
        }
        mesh
    }

    /// Refuse every mutation.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Refuse to create or delete a channel with this name.
    pub fn with_reserved(mut self, name: impl Into<String>) -> Self {
        self.reserved.push(name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn channel(&self, name: &str) -> Option<&ColorChannel> {
        self.channels.iter().find(|c| c.name == name)
    }

    pub fn channels(&self) -> &[ColorChannel] {
        &self.channels
    }

    pub fn active_channel(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn display_colors(&self) -> bool {
        self.display_colors
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.read_only {
            Err(StoreError::ReadOnly(self.name.clone()))
        } else {
            Ok(())
        }
    }

    fn check_name(&self, name: &str) -> Result<(), StoreError> {
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if self.reserved.iter().any(|r| r == name) {
            return Err(StoreError::ReservedName(name.to_string()));
        }
        Ok(())
    }
}

impl MeshStore for MemoryMesh {
    fn channel_names(&self) -> Vec<String> {
        self.channels.iter().map(|c| c.name.clone()).collect()
    }

    fn create_channel(&mut self, name: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        self.check_name(name)?;
        if self.channel(name).is_some() {
            return Err(StoreError::ChannelExists(name.to_string()));
        }
        self.channels
            .push(ColorChannel::empty(name, self.vertex_count));
        debug!("Created channel '{}' on '{}'", name, self.name);
        Ok(())
    }

    fn delete_channel(&mut self, name: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        self.check_name(name)?;
        let position = self
            .channels
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| StoreError::ChannelMissing(name.to_string()))?;
        self.channels.remove(position);
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
        debug!("Deleted channel '{}' on '{}'", name, self.name);
        Ok(())
    }

    fn set_active_channel(&mut self, name: &str) -> Result<(), StoreError> {
        if self.channel(name).is_none() {
            return Err(StoreError::ChannelMissing(name.to_string()));
        }
        self.active = Some(name.to_string());
        Ok(())
    }

    fn write_colors(&mut self, indices: &[u32], colors: &[Vec4]) -> Result<(), StoreError> {
        self.check_writable()?;
        if indices.len() != colors.len() {
            return Err(StoreError::LengthMismatch {
                indices: indices.len(),
                colors: colors.len(),
            });
        }
        let active = self.active.as_deref().ok_or(StoreError::NoActiveChannel)?;
        let vertex_count = self.vertex_count;

        // Check the whole batch before touching anything.
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(StoreError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        let channel = self
            .channels
            .iter_mut()
            .find(|c| c.name == active)
            .ok_or_else(|| StoreError::ChannelMissing(active.to_string()))?;
        for (&index, &color) in indices.iter().zip(colors) {
            channel.colors[index as usize] = Some(color);
        }
        Ok(())
    }

    fn set_channel_visible(&mut self, visible: bool) -> Result<(), StoreError> {
        self.check_writable()?;
        self.display_colors = visible;
        Ok(())
    }
}

/// Meshes indexed by name.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    meshes: BTreeMap<String, MemoryMesh>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mesh, replacing any mesh with the same name.
    pub fn insert(&mut self, mesh: MemoryMesh) -> Option<MemoryMesh> {
        self.meshes.insert(mesh.name().to_string(), mesh)
    }

    pub fn mesh(&self, name: &str) -> Result<&MemoryMesh, PaintError> {
        self.meshes
            .get(name)
            .ok_or_else(|| PaintError::MeshNotFound(name.to_string()))
    }

    pub fn mesh_mut(&mut self, name: &str) -> Result<&mut MemoryMesh, PaintError> {
        self.meshes
            .get_mut(name)
            .ok_or_else(|| PaintError::MeshNotFound(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.meshes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}
