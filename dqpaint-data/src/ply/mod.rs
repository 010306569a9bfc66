//! PLY mesh loading

mod loader;
mod vertex;

pub use loader::{load_mesh_from_ply, mesh_from_reader};
pub use vertex::{PlyMesh, PlyVertex};
