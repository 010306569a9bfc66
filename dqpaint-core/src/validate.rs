//! Input shape checks run before any mesh mutation.

use crate::error::PaintError;
use dqpaint_data::AssignmentSet;
use glam::Vec4;

/// Check that indices and colors are non-empty and the same length, then pair them.
pub fn validate_assignments(indices: &[u32], colors: &[Vec4]) -> Result<AssignmentSet, PaintError> {
    if indices.is_empty() {
        return Err(PaintError::InvalidInput("no vertices provided".to_string()));
    }
    if colors.is_empty() {
        return Err(PaintError::InvalidInput("no colors provided".to_string()));
    }
    if indices.len() != colors.len() {
        return Err(PaintError::InvalidInput(format!(
            "color count mismatch: {} vertices, {} colors",
            indices.len(),
            colors.len()
        )));
    }
    Ok(AssignmentSet::zip(indices, colors))
}

/// Batches must hold at least one assignment.
pub fn validate_batch_size(batch_size: usize) -> Result<(), PaintError> {
    if batch_size == 0 {
        return Err(PaintError::InvalidInput(
            "batch size must be positive".to_string(),
        ));
    }
    Ok(())
}
