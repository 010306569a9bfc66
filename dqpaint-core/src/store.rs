//! The mesh-side contract for color channel storage.

use glam::Vec4;
use thiserror::Error;

/// Errors a mesh store can report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Channel name '{0}' is reserved")]
    ReservedName(String),

    #[error("Channel name cannot be empty")]
    EmptyName,

    #[error("Channel '{0}' already exists")]
    ChannelExists(String),

    #[error("Channel '{0}' does not exist")]
    ChannelMissing(String),

    #[error("No active channel")]
    NoActiveChannel,

    #[error("Mesh '{0}' is not writable")]
    ReadOnly(String),

    #[error("Vertex index {index} out of range (vertex count {vertex_count})")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("Got {indices} indices but {colors} colors")]
    LengthMismatch { indices: usize, colors: usize },

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Named per-vertex color channels on a single mesh.
///
/// Implemented by whatever owns the mesh. The painter borrows it exclusively
/// for one operation and never keeps it.
pub trait MeshStore {
    /// Names of all color channels, in the store's order.
    fn channel_names(&self) -> Vec<String>;

    /// Create an empty channel.
    fn create_channel(&mut self, name: &str) -> Result<(), StoreError>;

    /// Delete a channel and everything in it.
    fn delete_channel(&mut self, name: &str) -> Result<(), StoreError>;

    /// Make `name` the channel that [`MeshStore::write_colors`] targets.
    fn set_active_channel(&mut self, name: &str) -> Result<(), StoreError>;

    /// Write `colors[i]` to vertex `indices[i]` of the active channel.
    ///
    /// Either all pairs land or none do.
    fn write_colors(&mut self, indices: &[u32], colors: &[Vec4]) -> Result<(), StoreError>;

    /// Toggle vertex color display on the mesh.
    fn set_channel_visible(&mut self, visible: bool) -> Result<(), StoreError>;
}

impl<T: MeshStore + ?Sized> MeshStore for &mut T {
    fn channel_names(&self) -> Vec<String> {
        (**self).channel_names()
    }

    fn create_channel(&mut self, name: &str) -> Result<(), StoreError> {
        (**self).create_channel(name)
    }

    fn delete_channel(&mut self, name: &str) -> Result<(), StoreError> {
        (**self).delete_channel(name)
    }

    fn set_active_channel(&mut self, name: &str) -> Result<(), StoreError> {
        (**self).set_active_channel(name)
    }

    fn write_colors(&mut self, indices: &[u32], colors: &[Vec4]) -> Result<(), StoreError> {
        (**self).write_colors(indices, colors)
    }

    fn set_channel_visible(&mut self, visible: bool) -> Result<(), StoreError> {
        (**self).set_channel_visible(visible)
    }
}
