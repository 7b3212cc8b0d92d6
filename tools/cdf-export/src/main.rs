//! cdf-export - Custom Data Format export tool
//!
//! Converts OBJ/glTF meshes to GPU-ready `.custom` files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use cdf_export::{export, manifest, CdfMesh, ExportOptions, UpAxis, CDF_MESH_EXT};

#[derive(Parser)]
#[command(name = "cdf-export")]
#[command(about = "Custom Data Format mesh export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export one or more mesh files into a single .custom file
    Mesh {
        /// Input mesh files (OBJ/glTF/GLB), exported in the given order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output .custom file (default: first input with .custom extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write a <output>.json debug mirror
        #[arg(long)]
        debug_json: bool,

        /// Up axis of the source data (default: z for OBJ, y for glTF)
        #[arg(long, value_enum)]
        up_axis: Option<UpAxis>,
    },

    /// Build exports from a manifest file
    Build {
        /// Path to assets.toml manifest
        #[arg(default_value = "assets.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate manifest without building
    Check {
        /// Path to assets.toml manifest
        #[arg(default_value = "assets.toml")]
        manifest: PathBuf,
    },

    /// Read a .custom file back and print what it contains
    Inspect {
        /// Input .custom file
        input: PathBuf,

        /// Print every index and vertex record
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Mesh {
            inputs,
            output,
            debug_json,
            up_axis,
        } => {
            let output = output.unwrap_or_else(|| inputs[0].with_extension(CDF_MESH_EXT));
            tracing::info!("Converting {:?} -> {:?}", inputs, output);
            let options = ExportOptions {
                debug_json,
                up_axis,
            };
            export::export_files(&inputs, &output, &options)?;
            tracing::info!("Done!");
        }

        Commands::Build {
            manifest,
            output,
            verbose,
        } => {
            if verbose {
                tracing::info!("Building exports from {:?}", manifest);
            }
            let config = manifest::load_manifest(&manifest)?;
            let summaries = manifest::build_all(&config, output.as_deref())?;
            if verbose {
                for summary in &summaries {
                    tracing::info!(
                        "  {:?}: {} meshes, {} vertices, {} indices",
                        summary.output,
                        summary.mesh_count,
                        summary.vertex_count,
                        summary.index_count
                    );
                }
            }
            tracing::info!("Build complete!");
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Inspect { input, verbose } => inspect(&input, verbose)?,
    }

    Ok(())
}

fn inspect(input: &Path, verbose: bool) -> Result<()> {
    let data = std::fs::read(input).with_context(|| format!("Failed to read {:?}", input))?;
    let mesh = CdfMesh::from_bytes(&data).with_context(|| format!("Invalid mesh file {:?}", input))?;
    let header = mesh.header();

    println!("{}", input.display());
    println!("  Version: {}", header.format_version);
    println!("  Indices: {} ({} triangles)", header.index_count, mesh.triangle_count());
    println!(
        "  Vertex floats: {} ({} vertices)",
        header.vertex_float_count,
        mesh.vertex_count()
    );
    if let Some((min, max)) = mesh.bounds() {
        println!("  Bounds: {:?} .. {:?}", min, max);
    }

    if verbose {
        for (i, tri) in mesh.indices().chunks_exact(3).enumerate() {
            println!("  tri {}: {:?}", i, tri);
        }
        for (i, record) in mesh.vertex_records().iter().enumerate() {
            println!(
                "  v {}: position {:?} normal {:?}",
                i, record.position, record.normal
            );
        }
    }

    Ok(())
}
