//! Find-or-create of the target color channel.

use crate::error::PaintError;
use crate::store::MeshStore;
use tracing::debug;

/// What the resolver did to get the channel in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelResolution {
    /// No channel existed; an empty one was created.
    Created,
    /// An existing channel was deleted and recreated empty.
    Replaced,
    /// An existing channel was kept with its contents.
    Merged,
}

/// Ensure exactly one channel called `name` exists and make it active.
///
/// With `merge_existing == false` an existing channel is wiped first.
pub fn resolve_channel<M: MeshStore + ?Sized>(
    mesh: &mut M,
    name: &str,
    merge_existing: bool,
) -> Result<ChannelResolution, PaintError> {
    let mut exists = mesh.channel_names().iter().any(|n| n == name);
    let mut replaced = false;

    if exists && !merge_existing {
        mesh.delete_channel(name)?;
        exists = false;
        replaced = true;
    }

    if !exists {
        mesh.create_channel(name)?;
    }
    mesh.set_active_channel(name)?;

    let resolution = match (exists, replaced) {
        (true, _) => ChannelResolution::Merged,
        (false, true) => ChannelResolution::Replaced,
        (false, false) => ChannelResolution::Created,
    };
    debug!("Resolved channel '{}': {:?}", name, resolution);
    Ok(resolution)
}
