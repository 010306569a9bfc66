//! The paint orchestrator.
//!
//! [`VertexColorPainter`] runs validation, channel resolution and the batch
//! writer in that order, then turns on vertex color display when the write
//! completes. Its state only ever moves forward:
//!
//! ```text
//! Idle -> Validating -> Resolving -> Writing -> Finalizing -> Done
//!                                           \-> Cancelled
//! (any step) -> Failed
//! ```

use crate::batch::{BatchWriter, DEFAULT_BATCH_SIZE};
use crate::error::PaintError;
use crate::progress::ProgressSink;
use crate::resolve::{ChannelResolution, resolve_channel};
use crate::store::MeshStore;
use crate::validate::{validate_assignments, validate_batch_size};
use glam::Vec4;
use std::time::Instant;
use tracing::{info, warn};

/// Channel painted when the caller does not name one.
pub const DEFAULT_CHANNEL_NAME: &str = "dqColorSet";

/// How a paint run treats the target channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    pub channel_name: String,
    /// Keep existing channel contents (true) or wipe them first (false).
    pub merge_existing: bool,
    pub batch_size: usize,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            channel_name: DEFAULT_CHANNEL_NAME.to_string(),
            merge_existing: true,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Policy {
    /// Default policy targeting `channel_name`.
    pub fn new(channel_name: impl Into<String>) -> Self {
        Self {
            channel_name: channel_name.into(),
            ..Self::default()
        }
    }

    pub fn with_merge(mut self, merge_existing: bool) -> Self {
        self.merge_existing = merge_existing;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// Where a painter is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PaintState {
    Idle,
    Validating,
    Resolving,
    Writing,
    Finalizing,
    Done,
    Cancelled,
    Failed,
}

impl PaintState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Cancelled | Self::Failed)
    }
}

/// Summary of a run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintReport {
    pub resolution: ChannelResolution,
    pub applied: usize,
    pub total: usize,
    pub batches: usize,
}

/// How a run ended when no error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOutcome {
    /// Every assignment landed and display was enabled.
    Done(PaintReport),
    /// Stopped at a batch boundary on request; display was left untouched.
    Cancelled(PaintReport),
}

impl PaintOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    pub fn report(&self) -> &PaintReport {
        match self {
            Self::Done(report) | Self::Cancelled(report) => report,
        }
    }
}

/// Paints one set of vertex colors onto one mesh.
///
/// A painter runs once; create a new one per invocation.
#[derive(Debug, Clone)]
pub struct VertexColorPainter {
    policy: Policy,
    state: PaintState,
}

impl VertexColorPainter {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            state: PaintState::Idle,
        }
    }

    pub fn state(&self) -> PaintState {
        self.state
    }

    fn advance(&mut self, next: PaintState) {
        debug_assert!(next > self.state, "{:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Paint `colors[i]` onto vertex `indices[i]` of `mesh`.
    ///
    /// Errors leave already written batches in place. Cancellation is
    /// reported as [`PaintOutcome::Cancelled`], not as an error.
    #[tracing::instrument(
        skip_all,
        fields(
            channel = %self.policy.channel_name,
            merge = self.policy.merge_existing,
            count = indices.len(),
        )
    )]
    pub fn paint<M, P>(
        &mut self,
        mesh: &mut M,
        indices: &[u32],
        colors: &[Vec4],
        progress: &mut P,
    ) -> Result<PaintOutcome, PaintError>
    where
        M: MeshStore + ?Sized,
        P: ProgressSink + ?Sized,
    {
        if self.state != PaintState::Idle {
            return Err(PaintError::AlreadyRan(self.state));
        }

        let started = Instant::now();
        let result = self.run(mesh, indices, colors, progress);
        match &result {
            Ok(PaintOutcome::Done(report)) => info!(
                "Applied {} vertex colors to '{}' in {} batches ({:.3}s)",
                report.applied,
                self.policy.channel_name,
                report.batches,
                started.elapsed().as_secs_f64()
            ),
            Ok(PaintOutcome::Cancelled(report)) => warn!(
                "Vertex color application cancelled: {}/{} applied to '{}'",
                report.applied, report.total, self.policy.channel_name
            ),
            Err(e) => {
                self.advance(PaintState::Failed);
                warn!("Vertex color application failed: {}", e);
            }
        }
        result
    }

    fn run<M, P>(
        &mut self,
        mesh: &mut M,
        indices: &[u32],
        colors: &[Vec4],
        progress: &mut P,
    ) -> Result<PaintOutcome, PaintError>
    where
        M: MeshStore + ?Sized,
        P: ProgressSink + ?Sized,
    {
        self.advance(PaintState::Validating);
        validate_batch_size(self.policy.batch_size)?;
        let assignments = validate_assignments(indices, colors)?;

        self.advance(PaintState::Resolving);
        let resolution = resolve_channel(
            mesh,
            &self.policy.channel_name,
            self.policy.merge_existing,
        )?;

        self.advance(PaintState::Writing);
        let batch = BatchWriter::new(self.policy.batch_size).write(mesh, &assignments, progress)?;
        let report = PaintReport {
            resolution,
            applied: batch.applied,
            total: batch.total,
            batches: batch.batches,
        };

        if batch.cancelled {
            self.advance(PaintState::Cancelled);
            return Ok(PaintOutcome::Cancelled(report));
        }

        self.advance(PaintState::Finalizing);
        mesh.set_channel_visible(true)?;
        self.advance(PaintState::Done);
        Ok(PaintOutcome::Done(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryMesh;
    use crate::progress::NullProgress;
    use crate::store::StoreError;
    use crate::testing::{Call, RecordingMesh, ScriptedProgress};
    use dqpaint_data::rgb;

    fn rgb_scenario() -> ([u32; 3], [Vec4; 3]) {
        (
            [0, 1, 2],
            [rgb(1.0, 0.0, 0.0), rgb(0.0, 1.0, 0.0), rgb(0.0, 0.0, 1.0)],
        )
    }

    #[test]
    fn test_policy_defaults() {
        let policy = Policy::default();
        assert_eq!(policy.channel_name, "dqColorSet");
        assert!(policy.merge_existing);
        assert_eq!(policy.batch_size, 666);

        let policy = Policy::new("weights").with_merge(false).with_batch_size(10);
        assert_eq!(policy.channel_name, "weights");
        assert!(!policy.merge_existing);
        assert_eq!(policy.batch_size, 10);
    }

    #[test]
    fn test_three_vertices_two_batches() {
        let (indices, colors) = rgb_scenario();
        let mut mesh = RecordingMesh::new(3);
        let mut painter =
            VertexColorPainter::new(Policy::default().with_merge(false).with_batch_size(2));

        let outcome = painter
            .paint(&mut mesh, &indices, &colors, &mut NullProgress)
            .unwrap();

        assert_eq!(
            outcome,
            PaintOutcome::Done(PaintReport {
                resolution: ChannelResolution::Created,
                applied: 3,
                total: 3,
                batches: 2,
            })
        );
        assert_eq!(painter.state(), PaintState::Done);
        assert_eq!(mesh.writes(), vec![vec![0, 1], vec![2]]);
        assert_eq!(mesh.calls().last(), Some(&Call::SetVisible(true)));
        assert!(mesh.inner.display_colors());
        let channel = mesh.inner.channel(DEFAULT_CHANNEL_NAME).unwrap();
        assert_eq!(channel.get(2), Some(rgb(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_empty_input_creates_nothing() {
        let mut mesh = RecordingMesh::new(3);
        let mut painter = VertexColorPainter::new(Policy::default());
        let err = painter
            .paint(&mut mesh, &[], &[], &mut NullProgress)
            .unwrap_err();
        assert!(matches!(err, PaintError::InvalidInput(_)));
        assert!(mesh.calls().is_empty());
        assert_eq!(painter.state(), PaintState::Failed);
    }

    #[test]
    fn test_mismatch_fails_before_store_calls() {
        let mut mesh = RecordingMesh::new(8);
        let mut painter = VertexColorPainter::new(Policy::default());
        let colors = [Vec4::ONE; 3];
        let err = painter
            .paint(&mut mesh, &[0, 1, 2, 3, 4], &colors, &mut NullProgress)
            .unwrap_err();
        assert!(matches!(err, PaintError::InvalidInput(_)));
        assert!(mesh.calls().is_empty());
    }

    #[test]
    fn test_zero_batch_size_is_invalid_input() {
        let mut mesh = RecordingMesh::new(2);
        let mut painter = VertexColorPainter::new(Policy::default().with_batch_size(0));
        let err = painter
            .paint(&mut mesh, &[0], &[Vec4::ONE], &mut NullProgress)
            .unwrap_err();
        assert!(matches!(err, PaintError::InvalidInput(_)));
        assert!(mesh.calls().is_empty());
    }

    #[test]
    fn test_merge_twice_last_application_wins() {
        let mut mesh = MemoryMesh::new("m", 3);
        let first = [rgb(1.0, 0.0, 0.0); 2];
        let second = [rgb(0.0, 1.0, 0.0); 2];

        VertexColorPainter::new(Policy::default())
            .paint(&mut mesh, &[0, 1], &first, &mut NullProgress)
            .unwrap();
        let outcome = VertexColorPainter::new(Policy::default())
            .paint(&mut mesh, &[0, 1], &second, &mut NullProgress)
            .unwrap();

        assert_eq!(outcome.report().resolution, ChannelResolution::Merged);
        let channel = mesh.channel(DEFAULT_CHANNEL_NAME).unwrap();
        assert_eq!(channel.get(0), Some(rgb(0.0, 1.0, 0.0)));
        assert_eq!(channel.get(1), Some(rgb(0.0, 1.0, 0.0)));
        assert_eq!(channel.get(2), None);
    }

    #[test]
    fn test_merge_keeps_untouched_vertices() {
        let mut mesh = MemoryMesh::new("m", 3);
        VertexColorPainter::new(Policy::default())
            .paint(&mut mesh, &[2], &[Vec4::ONE], &mut NullProgress)
            .unwrap();
        VertexColorPainter::new(Policy::default())
            .paint(&mut mesh, &[0], &[Vec4::ONE], &mut NullProgress)
            .unwrap();
        let channel = mesh.channel(DEFAULT_CHANNEL_NAME).unwrap();
        assert_eq!(channel.assigned_count(), 2);
    }

    #[test]
    fn test_replace_resets_untouched_vertices() {
        let mut mesh = MemoryMesh::new("m", 3);
        VertexColorPainter::new(Policy::default())
            .paint(&mut mesh, &[1, 2], &[Vec4::ONE; 2], &mut NullProgress)
            .unwrap();

        let outcome = VertexColorPainter::new(Policy::default().with_merge(false))
            .paint(&mut mesh, &[0], &[rgb(0.5, 0.5, 0.5)], &mut NullProgress)
            .unwrap();

        assert_eq!(outcome.report().resolution, ChannelResolution::Replaced);
        let channel = mesh.channel(DEFAULT_CHANNEL_NAME).unwrap();
        assert_eq!(channel.get(0), Some(rgb(0.5, 0.5, 0.5)));
        assert_eq!(channel.get(1), None);
        assert_eq!(channel.get(2), None);
    }

    #[test]
    fn test_cancel_skips_finalization() {
        let mut mesh = RecordingMesh::new(10);
        let mut painter = VertexColorPainter::new(Policy::default().with_batch_size(3));
        let indices: Vec<u32> = (0..10).collect();
        let colors = vec![Vec4::ONE; 10];

        let outcome = painter
            .paint(&mut mesh, &indices, &colors, &mut ScriptedProgress::cancel_after(2))
            .unwrap();

        assert!(outcome.is_cancelled());
        assert_eq!(outcome.report().applied, 6);
        assert_eq!(painter.state(), PaintState::Cancelled);
        assert_eq!(mesh.writes(), vec![vec![0, 1, 2], vec![3, 4, 5]]);
        assert!(!mesh.calls().contains(&Call::SetVisible(true)));
        assert!(!mesh.inner.display_colors());
    }

    #[test]
    fn test_out_of_range_index_fails_as_channel_error() {
        let mut mesh = MemoryMesh::new("m", 2);
        let mut painter = VertexColorPainter::new(Policy::default().with_batch_size(1));
        let err = painter
            .paint(&mut mesh, &[0, 5], &[Vec4::ONE; 2], &mut NullProgress)
            .unwrap_err();

        assert!(err.is_channel_error());
        assert!(matches!(
            err,
            PaintError::WriteFailed {
                applied: 1,
                source: StoreError::IndexOutOfRange { index: 5, .. },
                ..
            }
        ));
        assert_eq!(painter.state(), PaintState::Failed);
        assert!(!mesh.display_colors());
        assert_eq!(
            mesh.channel(DEFAULT_CHANNEL_NAME).unwrap().get(0),
            Some(Vec4::ONE)
        );
    }

    #[test]
    fn test_read_only_mesh_fails_in_resolver() {
        let mut mesh = MemoryMesh::new("m", 2).read_only();
        let mut painter = VertexColorPainter::new(Policy::default());
        let err = painter
            .paint(&mut mesh, &[0], &[Vec4::ONE], &mut NullProgress)
            .unwrap_err();
        assert!(matches!(
            err,
            PaintError::ChannelError(StoreError::ReadOnly(_))
        ));
    }

    #[test]
    fn test_painter_runs_once() {
        let mut mesh = MemoryMesh::new("m", 2);
        let mut painter = VertexColorPainter::new(Policy::default());
        painter
            .paint(&mut mesh, &[0], &[Vec4::ONE], &mut NullProgress)
            .unwrap();
        let err = painter
            .paint(&mut mesh, &[1], &[Vec4::ONE], &mut NullProgress)
            .unwrap_err();
        assert!(matches!(err, PaintError::AlreadyRan(PaintState::Done)));
        assert_eq!(painter.state(), PaintState::Done);
    }

    #[test]
    fn test_terminal_states() {
        assert!(PaintState::Done.is_terminal());
        assert!(PaintState::Cancelled.is_terminal());
        assert!(PaintState::Failed.is_terminal());
        assert!(!PaintState::Writing.is_terminal());
        assert!(PaintState::Idle < PaintState::Validating);
    }
}
