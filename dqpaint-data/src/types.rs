//! Core data types for vertex color assignments.
//!
//! These are plain CPU-side values shared by the loaders and the writer.
//! Colors are linear RGBA in the 0-1 range.

use glam::Vec4;

/// Alpha used when a color is supplied as an RGB triple.
pub const DEFAULT_ALPHA: f32 = 1.0;

/// Build an RGBA color from an RGB triple with the default alpha.
pub fn rgb(r: f32, g: f32, b: f32) -> Vec4 {
    Vec4::new(r, g, b, DEFAULT_ALPHA)
}

/// Build an opaque grey color from a single weight.
///
/// The weight is clamped to `[0, 1]`.
pub fn grey(weight: f32) -> Vec4 {
    let w = weight.clamp(0.0, 1.0);
    Vec4::new(w, w, w, DEFAULT_ALPHA)
}

/// One (vertex index, color) pair to write into a color channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    /// Vertex index on the target mesh.
    pub index: u32,
    /// RGBA color (linear, 0-1 range).
    pub color: Vec4,
}

impl Assignment {
    /// Create a new assignment.
    pub fn new(index: u32, color: Vec4) -> Self {
        Self { index, color }
    }
}

/// An ordered sequence of assignments.
///
/// Duplicate indices are allowed; later entries win when written in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentSet {
    assignments: Vec<Assignment>,
}

impl AssignmentSet {
    /// Pair up indices and colors positionally.
    ///
    /// Extra elements on the longer side are ignored; shape checks belong to the caller.
    pub fn zip(indices: &[u32], colors: &[Vec4]) -> Self {
        Self {
            assignments: indices
                .iter()
                .zip(colors)
                .map(|(&index, &color)| Assignment::new(index, color))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn as_slice(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Split into contiguous chunks of at most `size` assignments.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn chunks(&self, size: usize) -> std::slice::Chunks<'_, Assignment> {
        self.assignments.chunks(size)
    }
}

impl From<Vec<Assignment>> for AssignmentSet {
    fn from(assignments: Vec<Assignment>) -> Self {
        Self { assignments }
    }
}

impl FromIterator<Assignment> for AssignmentSet {
    fn from_iter<I: IntoIterator<Item = Assignment>>(iter: I) -> Self {
        Self {
            assignments: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AssignmentSet {
    type Item = &'a Assignment;
    type IntoIter = std::slice::Iter<'a, Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.iter()
    }
}
