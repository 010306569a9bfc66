//! Error types for paint operations.

use crate::paint::PaintState;
use crate::store::StoreError;
use thiserror::Error;

/// Errors that can occur while painting vertex colors.
///
/// Cancellation is not an error; see [`crate::PaintOutcome::Cancelled`].
#[derive(Debug, Error)]
pub enum PaintError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Mesh not found: {0}")]
    MeshNotFound(String),

    #[error("Channel error: {0}")]
    ChannelError(#[from] StoreError),

    /// A bulk write was rejected. Batches before it stay applied.
    #[error("Channel write failed after {applied} of {total} assignments: {source}")]
    WriteFailed {
        applied: usize,
        total: usize,
        #[source]
        source: StoreError,
    },

    #[error("Painter already ran (state: {0:?})")]
    AlreadyRan(PaintState),
}

impl PaintError {
    /// True for failures reported by the channel store.
    pub fn is_channel_error(&self) -> bool {
        matches!(self, Self::ChannelError(_) | Self::WriteFailed { .. })
    }
}
