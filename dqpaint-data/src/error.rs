//! Error types for data loading.

use thiserror::Error;

/// Errors that can occur while loading meshes or weight exports.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PLY parsing error: {0}")]
    Ply(String),

    #[error("Missing '{property}' at vertex {vertex}")]
    MissingProperty { property: &'static str, vertex: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid weight '{value}' in group {group}")]
    InvalidWeight { value: String, group: usize },

    #[error("Vertex index {index} in group {group} is negative")]
    NegativeIndex { index: i64, group: usize },
}
