//! Error types for the command line front end.

use dqpaint_core::PaintError;
use dqpaint_data::DataError;
use thiserror::Error;

/// Errors that can occur while running the paint command.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Paint(#[from] PaintError),

    #[error("Color values must come in R G B triples, got {0} values")]
    IncompleteColor(usize),

    #[error("Cannot derive a mesh name from '{0}'")]
    MeshName(String),

    #[error("No mesh files given")]
    NoMesh,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
