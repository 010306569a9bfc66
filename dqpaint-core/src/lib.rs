//! Dqpaint Core Crate
//!
//! Applies sparse (vertex index, color) assignments to a mesh's named color
//! channel in bounded batches, with merge-or-replace channel policy,
//! progress reporting and cooperative cancellation between batches.
//!
//! ## Modules
//!
//! - [`store`]: the [`MeshStore`] contract a host mesh implements
//! - [`memory`]: in-memory meshes and a name-indexed scene
//! - [`progress`]: progress sinks and the cancellation flag
//! - [`validate`]: input shape checks
//! - [`resolve`]: channel find-or-create under the merge policy
//! - [`batch`]: the chunked writer
//! - [`paint`]: the orchestrator tying the steps together
//! - [`remove`]: channel removal
//!
//! ## Example
//!
//! ```
//! use dqpaint_core::{MemoryMesh, NullProgress, Policy, VertexColorPainter};
//! use dqpaint_data::rgb;
//!
//! let mut mesh = MemoryMesh::new("cube", 8);
//! let mut painter = VertexColorPainter::new(Policy::default());
//! let outcome = painter
//!     .paint(&mut mesh, &[0, 1], &[rgb(1.0, 0.0, 0.0), rgb(0.0, 1.0, 0.0)], &mut NullProgress)
//!     .unwrap();
//! assert!(outcome.is_done());
//! assert!(mesh.display_colors());
//! ```

pub mod batch;
mod error;
pub mod memory;
pub mod paint;
pub mod progress;
pub mod remove;
pub mod resolve;
pub mod store;
pub mod validate;

#[cfg(test)]
mod testing;

pub use batch::{BatchReport, BatchWriter, DEFAULT_BATCH_SIZE};
pub use error::PaintError;
pub use memory::{ColorChannel, MemoryMesh, Scene};
pub use paint::{
    DEFAULT_CHANNEL_NAME, PaintOutcome, PaintReport, PaintState, Policy, VertexColorPainter,
};
pub use progress::{CancelFlag, LogProgress, NullProgress, ProgressSink};
pub use remove::{RemoveReport, remove_channels};
pub use resolve::{ChannelResolution, resolve_channel};
pub use store::{MeshStore, StoreError};
pub use validate::{validate_assignments, validate_batch_size};
