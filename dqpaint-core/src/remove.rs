//! Removal of color channels from a mesh.

use crate::store::{MeshStore, StoreError};
use tracing::{debug, warn};

/// Channels deleted and channels the store refused to delete.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoveReport {
    pub removed: Vec<String>,
    pub failed: Vec<(String, StoreError)>,
}

impl RemoveReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Delete the channel called `name`, or every channel when `name` is `None`.
///
/// A refused delete is logged and skipped; the remaining channels are still
/// attempted. Deleting the active channel leaves the mesh with none active.
pub fn remove_channels<M: MeshStore + ?Sized>(mesh: &mut M, name: Option<&str>) -> RemoveReport {
    let targets: Vec<String> = mesh
        .channel_names()
        .into_iter()
        .filter(|n| name.is_none_or(|wanted| n == wanted))
        .collect();

    if targets.is_empty() {
        debug!("No channel to remove (requested: {:?})", name);
    }

    let mut report = RemoveReport::default();
    for channel in targets {
        match mesh.delete_channel(&channel) {
            Ok(()) => report.removed.push(channel),
            Err(e) => {
                warn!("Failed to remove '{}': {}", channel, e);
                report.failed.push((channel, e));
            }
        }
    }
    report
}
