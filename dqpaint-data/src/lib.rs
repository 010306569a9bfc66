//! Dqpaint Data Crate
//!
//! Data types and loaders for vertex color painting: color assignments,
//! dual-quaternion weight exports and PLY meshes.
//! This crate is host-agnostic and does not touch mesh storage.

mod error;
pub mod ply;
pub mod types;
pub mod weights;

pub use error::DataError;
pub use ply::{PlyMesh, PlyVertex, load_mesh_from_ply};
pub use types::{Assignment, AssignmentSet, DEFAULT_ALPHA, grey, rgb};
pub use weights::{ExportMode, WeightExport, WeightGroup, load_weight_export};
