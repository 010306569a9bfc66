//! PLY vertex and mesh data structures

use glam::{Vec3, Vec4};

/// Vertex data extracted from a PLY file.
#[derive(Debug, Clone, PartialEq)]
pub struct PlyVertex {
    pub position: Vec3,
    /// Baked vertex color, if the file carries one.
    pub color: Option<Vec4>,
}

/// A mesh read from a PLY file.
#[derive(Debug, Clone, Default)]
pub struct PlyMesh {
    pub vertices: Vec<PlyVertex>,
    pub face_count: usize,
}

impl PlyMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// True when at least one vertex carries a color.
    pub fn has_colors(&self) -> bool {
        self.vertices.iter().any(|v| v.color.is_some())
    }

    /// Per-vertex colors in vertex order, `None` where the file had none.
    pub fn colors(&self) -> Vec<Option<Vec4>> {
        self.vertices.iter().map(|v| v.color).collect()
    }
}
