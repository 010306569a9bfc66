//! Dqpaint
//!
//! Paints per-vertex colors onto a mesh's named color channel, or removes
//! color channels from meshes.
//!
//! Colors come either from explicit `--verts`/`--colors` lists or from DQ
//! blend weight exports (`--weights`), which are painted as greyscale.
//! Several weight exports run as a batch: a failing export is logged and
//! skipped. Ctrl-C stops a run at the next batch boundary.

mod app;
mod error;
mod export;
mod logging;
mod signal;

use app::{Action, ColorSource, Request};
use clap::{ArgAction, Parser};
use dqpaint_core::{CancelFlag, DEFAULT_BATCH_SIZE, DEFAULT_CHANNEL_NAME, Policy};
use logging::LoggingConfig;
use std::path::PathBuf;
use tracing::warn;

/// Dqpaint - apply vertex colors to a mesh color channel
#[derive(Parser, Debug)]
#[command(name = "dqpaint")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// PLY files holding the meshes, each named by its file stem
    #[arg(short, long, required = true, num_args = 1.., action = ArgAction::Append)]
    mesh: Vec<PathBuf>,

    /// Mesh to act on (defaults to the weight export's mesh, then the first file)
    #[arg(short, long)]
    target: Option<String>,

    /// Vertex colors as R G B triples, one per vertex
    #[arg(short, long, num_args = 3.., action = ArgAction::Append, allow_negative_numbers = true)]
    colors: Vec<f32>,

    /// Vertex indices, matched positionally with the colors
    #[arg(short, long, num_args = 1.., action = ArgAction::Append)]
    verts: Vec<u32>,

    /// Color channel to paint or remove
    #[arg(short, long, default_value = DEFAULT_CHANNEL_NAME)]
    set: String,

    /// Keep existing channel contents (false replaces the channel)
    #[arg(short = 'M', long, default_value_t = true, action = ArgAction::Set)]
    merge: bool,

    /// DQ blend weight exports (JSON) to paint instead of explicit colors
    #[arg(
        short,
        long,
        num_args = 1..,
        action = ArgAction::Append,
        conflicts_with_all = ["colors", "verts"]
    )]
    weights: Vec<PathBuf>,

    /// Remove the color channel instead of painting
    #[arg(short, long, conflicts_with_all = ["colors", "verts", "weights"])]
    remove: bool,

    /// With --remove, delete every color channel, not just --set
    #[arg(long, requires = "remove")]
    all_sets: bool,

    /// Assignments per bulk write
    #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Write the touched meshes' channels to this JSON file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn into_request(self) -> Request {
        let action = if self.remove {
            Action::Remove {
                channel: (!self.all_sets).then_some(self.set),
            }
        } else {
            let source = if self.weights.is_empty() {
                ColorSource::Explicit {
                    verts: self.verts,
                    colors: self.colors,
                }
            } else {
                ColorSource::Weights(self.weights)
            };
            Action::Paint {
                source,
                policy: Policy::new(self.set)
                    .with_merge(self.merge)
                    .with_batch_size(self.batch_size),
            }
        };
        Request {
            mesh_paths: self.mesh,
            target: self.target,
            action,
            output: self.output,
        }
    }
}

fn main() {
    let args = Args::parse();
    LoggingConfig::new(args.log_level.clone()).init();

    let cancel = CancelFlag::new();
    if let Err(e) = signal::cancel_on_interrupt(cancel.clone()) {
        warn!("Ctrl-C will not cancel this run: {}", e);
    }

    match app::run(&args.into_request(), &cancel) {
        Ok(summary) if summary.is_success() => {}
        Ok(_) => std::process::exit(1),
        Err(e) => {
            eprintln!("dqpaint: {}", e);
            std::process::exit(1);
        }
    }
}
