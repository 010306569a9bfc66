//! Chunked application of assignments to the active channel.
//!
//! Each chunk becomes a single bulk [`MeshStore::write_colors`] call. Between
//! chunks the writer reports progress and polls for cancellation, so a run
//! can stop at any chunk boundary. A chunk is either fully written or never
//! issued; nothing already written is rolled back.

use crate::error::PaintError;
use crate::progress::ProgressSink;
use crate::store::MeshStore;
use dqpaint_data::AssignmentSet;
use tracing::{debug, warn};

/// Assignments per bulk write unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 666;

/// Result of a batch run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Assignments written.
    pub applied: usize,
    /// Assignments in the set.
    pub total: usize,
    /// Bulk writes issued.
    pub batches: usize,
    /// True if the run stopped early on request.
    pub cancelled: bool,
}

/// Writes an [`AssignmentSet`] in fixed-size chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchWriter {
    batch_size: usize,
}

impl Default for BatchWriter {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl BatchWriter {
    /// Create a writer. A zero batch size is treated as one.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of bulk writes a full run over `len` assignments issues.
    pub fn batch_count(&self, len: usize) -> usize {
        len.div_ceil(self.batch_size)
    }

    /// Write every chunk in order into the mesh's active channel.
    ///
    /// `progress` sees `begin` once, one `report` per written chunk and `end`
    /// on every exit path.
    #[tracing::instrument(
        skip_all,
        fields(
            total = assignments.len(),
            batch_size = self.batch_size,
            batches = self.batch_count(assignments.len())
        )
    )]
    pub fn write<M, P>(
        &self,
        mesh: &mut M,
        assignments: &AssignmentSet,
        progress: &mut P,
    ) -> Result<BatchReport, PaintError>
    where
        M: MeshStore + ?Sized,
        P: ProgressSink + ?Sized,
    {
        progress.begin(assignments.len());
        let result = self.write_chunks(mesh, assignments, progress);
        progress.end();
        result
    }

    fn write_chunks<M, P>(
        &self,
        mesh: &mut M,
        assignments: &AssignmentSet,
        progress: &mut P,
    ) -> Result<BatchReport, PaintError>
    where
        M: MeshStore + ?Sized,
        P: ProgressSink + ?Sized,
    {
        let total = assignments.len();
        let mut report = BatchReport {
            applied: 0,
            total,
            batches: 0,
            cancelled: false,
        };

        let mut indices = Vec::with_capacity(self.batch_size.min(total));
        let mut colors = Vec::with_capacity(self.batch_size.min(total));

        for chunk in assignments.chunks(self.batch_size) {
            indices.clear();
            colors.clear();
            for assignment in chunk {
                indices.push(assignment.index);
                colors.push(assignment.color);
            }

            if let Err(source) = mesh.write_colors(&indices, &colors) {
                warn!(
                    "Bulk write {} failed after {}/{} assignments: {}",
                    report.batches + 1,
                    report.applied,
                    total,
                    source
                );
                return Err(PaintError::WriteFailed {
                    applied: report.applied,
                    total,
                    source,
                });
            }
            report.applied += chunk.len();
            report.batches += 1;
            progress.report(report.applied, total);

            if progress.is_cancelled() {
                report.cancelled = true;
                debug!(
                    "Cancelled after {} batches ({}/{} assignments)",
                    report.batches, report.applied, total
                );
                break;
            }
        }

        Ok(report)
    }
}
