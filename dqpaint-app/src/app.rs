//! Paint and remove commands: load meshes, run the action, export.

use crate::error::AppError;
use crate::export::{MeshExport, write_exports};
use dqpaint_core::{
    CancelFlag, LogProgress, MemoryMesh, PaintOutcome, Policy, Scene, VertexColorPainter,
    remove_channels,
};
use dqpaint_data::{load_mesh_from_ply, load_weight_export, rgb};
use glam::Vec4;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Everything one invocation needs.
#[derive(Debug, Clone)]
pub struct Request {
    pub mesh_paths: Vec<PathBuf>,
    pub target: Option<String>,
    pub action: Action,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub enum Action {
    Paint { source: ColorSource, policy: Policy },
    /// Remove the named channel, or every channel when `None`.
    Remove { channel: Option<String> },
}

/// Where the vertex colors come from.
#[derive(Debug, Clone)]
pub enum ColorSource {
    /// Explicit indices and flat `R G B` values.
    Explicit { verts: Vec<u32>, colors: Vec<f32> },
    /// DQ blend weight exports, painted as grey. More than one runs as a batch.
    Weights(Vec<PathBuf>),
}

/// How many meshes were handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub failed: usize,
    pub cancelled: bool,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0 && !self.cancelled
    }

    fn record(&mut self, outcome: &PaintOutcome) {
        if outcome.is_done() {
            self.processed += 1;
        } else {
            self.cancelled = true;
        }
    }
}

/// Group flat color values into opaque RGBA colors.
///
/// A trailing partial triple is rejected rather than dropped.
pub fn color_triples(values: &[f32]) -> Result<Vec<Vec4>, AppError> {
    if values.len() % 3 != 0 {
        return Err(AppError::IncompleteColor(values.len()));
    }
    Ok(values
        .chunks_exact(3)
        .map(|c| rgb(c[0], c[1], c[2]))
        .collect())
}

/// Strip a DAG path down to its leaf name: `|rig|body` -> `body`.
pub fn short_name(name: &str) -> &str {
    name.rsplit('|').next().unwrap_or(name)
}

fn mesh_name_from_path(path: &Path) -> Result<String, AppError> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| AppError::MeshName(path.display().to_string()))
}

/// Load every PLY into a scene. Returns the scene and the mesh names in
/// argument order.
pub fn load_scene(paths: &[PathBuf]) -> Result<(Scene, Vec<String>), AppError> {
    let mut scene = Scene::new();
    let mut names = Vec::with_capacity(paths.len());
    for path in paths {
        let name = mesh_name_from_path(path)?;
        let ply = load_mesh_from_ply(path)?;
        if scene
            .insert(MemoryMesh::from_ply(name.clone(), &ply))
            .is_some()
        {
            warn!("Mesh '{}' loaded twice, keeping {}", name, path.display());
        } else {
            names.push(name);
        }
    }
    if scene.is_empty() {
        return Err(AppError::NoMesh);
    }
    info!("Loaded {} meshes", scene.len());
    Ok((scene, names))
}

/// Run the requested action and optionally export the touched meshes.
///
/// A cancelled run is reported in the summary, not as an error.
pub fn run(request: &Request, cancel: &CancelFlag) -> Result<RunSummary, AppError> {
    let (mut scene, loaded) = load_scene(&request.mesh_paths)?;
    let target = request.target.as_deref().map(short_name);

    let mut touched = Vec::new();
    let summary = match &request.action {
        Action::Paint { source, policy } => {
            let default_target = target.or(loaded.first().map(String::as_str));
            paint_source(&mut scene, default_target, source, policy, cancel, &mut touched)?
        }
        Action::Remove { channel } => {
            let names = match target {
                Some(name) => vec![name.to_string()],
                None => scene.names().map(str::to_string).collect(),
            };
            remove_from(&mut scene, &names, channel.as_deref(), &mut touched)?
        }
    };

    if let Some(path) = &request.output {
        let exports = touched
            .iter()
            .map(|name| scene.mesh(name).map(MeshExport::from_mesh))
            .collect::<Result<Vec<_>, _>>()?;
        write_exports(&exports, path)?;
    }

    Ok(summary)
}

fn paint_source(
    scene: &mut Scene,
    target: Option<&str>,
    source: &ColorSource,
    policy: &Policy,
    cancel: &CancelFlag,
    touched: &mut Vec<String>,
) -> Result<RunSummary, AppError> {
    let mut summary = RunSummary::default();
    match source {
        ColorSource::Explicit { verts, colors } => {
            let colors = color_triples(colors)?;
            let name = target.ok_or(AppError::NoMesh)?;
            let outcome = paint_mesh(scene, name, verts, &colors, policy, cancel)?;
            touch(touched, name);
            summary.record(&outcome);
        }
        ColorSource::Weights(paths) => {
            let batch = paths.len() > 1;
            for path in paths {
                match paint_weights(scene, path, target, policy, cancel) {
                    Ok((name, outcome)) => {
                        touch(touched, &name);
                        summary.record(&outcome);
                    }
                    Err(e) if batch => {
                        error!("Error processing {}: {}", path.display(), e);
                        summary.failed += 1;
                    }
                    Err(e) => return Err(e),
                }
                if cancel.is_cancelled() {
                    summary.cancelled = true;
                    break;
                }
            }
            if batch {
                info!(
                    "Batch complete. Processed {} meshes ({} failed)",
                    summary.processed, summary.failed
                );
            }
        }
    }
    Ok(summary)
}

/// Paint one weight export onto the mesh it names, or onto `target`.
fn paint_weights(
    scene: &mut Scene,
    path: &Path,
    target: Option<&str>,
    policy: &Policy,
    cancel: &CancelFlag,
) -> Result<(String, PaintOutcome), AppError> {
    let export = load_weight_export(path)?;
    let (indices, colors) = export.to_indices_and_colors()?;
    let name = target.unwrap_or_else(|| short_name(&export.mesh)).to_string();
    let outcome = paint_mesh(scene, &name, &indices, &colors, policy, cancel)?;
    Ok((name, outcome))
}

fn paint_mesh(
    scene: &mut Scene,
    name: &str,
    indices: &[u32],
    colors: &[Vec4],
    policy: &Policy,
    cancel: &CancelFlag,
) -> Result<PaintOutcome, AppError> {
    let mesh = scene.mesh_mut(name)?;
    info!(
        "Painting {} vertices of '{}' ({} in mesh) into '{}'",
        indices.len(),
        mesh.name(),
        mesh.vertex_count(),
        policy.channel_name
    );

    let mut progress = LogProgress::new("Applying DQ Colors").with_cancel_flag(cancel.clone());
    let mut painter = VertexColorPainter::new(policy.clone());
    Ok(painter.paint(mesh, indices, colors, &mut progress)?)
}

fn remove_from(
    scene: &mut Scene,
    names: &[String],
    channel: Option<&str>,
    touched: &mut Vec<String>,
) -> Result<RunSummary, AppError> {
    let mut summary = RunSummary::default();
    for name in names {
        let mesh = scene.mesh_mut(name)?;
        let report = remove_channels(mesh, channel);
        info!("Removed {} channels from '{}'", report.removed.len(), name);
        if report.is_clean() {
            summary.processed += 1;
        } else {
            summary.failed += 1;
        }
        touch(touched, name);
    }
    Ok(summary)
}

fn touch(touched: &mut Vec<String>, name: &str) {
    if !touched.iter().any(|n| n == name) {
        touched.push(name.to_string());
    }
}
