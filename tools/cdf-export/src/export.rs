//! Export pipeline: normalize and deduplicate every mesh, concatenate, write
//!
//! Meshes are converted in parallel; offsets are assigned afterwards in input
//! order, so the output does not depend on scheduling.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::formats::{
    debug_json_path, write_cdf_mesh, write_debug_json, VertexRecord, FLOATS_PER_VERTEX,
};
use crate::mesh::{dedup_mesh, load_sources, DedupedMesh, SourceMesh, UpAxis};

/// Flags carried into an export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Also write `<output>.json`
    pub debug_json: bool,
    /// Overrides the up axis each loader reports
    pub up_axis: Option<UpAxis>,
}

/// Concatenated vertex records and global triangle indices of all meshes.
///
/// Append-only; every index stays below [`ExportBuffer::vertex_count`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportBuffer {
    indices: Vec<u32>,
    vertices: Vec<f32>,
}

impl ExportBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one mesh, offsetting its local indices by the vertices already emitted
    pub fn append(&mut self, mesh: &DedupedMesh) -> Result<()> {
        assert_eq!(mesh.positions.len(), mesh.normals.len());

        let offset = u32::try_from(self.vertex_count()).context("Vertex count exceeds u32")?;
        u32::try_from(self.vertex_count() + mesh.vertex_count())
            .context("Vertex count exceeds u32")?;

        self.vertices.reserve(mesh.vertex_count() * FLOATS_PER_VERTEX);
        for (&position, &normal) in mesh.positions.iter().zip(&mesh.normals) {
            self.vertices
                .extend_from_slice(VertexRecord::new(position, normal).as_floats());
        }
        self.indices.extend(mesh.indices.iter().map(|&i| i + offset));
        Ok(())
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Flat vertex floats, 8 per record
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty() && self.vertices.is_empty()
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        write_cdf_mesh(w, &self.indices, &self.vertices)
    }

    pub fn write_debug_json_to<W: Write>(&self, w: &mut W) -> Result<()> {
        write_debug_json(w, &self.indices, &self.vertices)
    }
}

/// What an export produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub mesh_count: usize,
    pub vertex_count: usize,
    pub index_count: usize,
    pub output: PathBuf,
    pub debug_json: Option<PathBuf>,
}

/// Validate, convert and concatenate meshes in the given order.
///
/// Each mesh is converted from its own `up_axis` unless `up_axis` overrides it.
pub fn build_export_buffer(
    meshes: &[SourceMesh],
    up_axis: Option<UpAxis>,
) -> Result<ExportBuffer> {
    for mesh in meshes {
        mesh.validate()?;
    }

    let deduped: Vec<DedupedMesh> = meshes
        .par_iter()
        .map(|mesh| dedup_mesh(mesh, up_axis.unwrap_or(mesh.up_axis)))
        .collect();

    let mut buffer = ExportBuffer::new();
    for mesh in &deduped {
        buffer.append(mesh)?;
    }
    Ok(buffer)
}

/// Export meshes to a `.custom` file (and its debug mirror when requested).
///
/// Nothing is written if any mesh fails validation. The binary file is
/// written before the mirror, so a mirror failure leaves it intact.
pub fn export_meshes(
    meshes: &[SourceMesh],
    output: &Path,
    options: &ExportOptions,
) -> Result<ExportSummary> {
    let buffer = build_export_buffer(meshes, options.up_axis)?;
    if buffer.is_empty() {
        tracing::warn!("No triangles to export for {:?}", output);
    }

    let file =
        File::create(output).with_context(|| format!("Failed to create output: {:?}", output))?;
    let mut writer = BufWriter::new(file);
    buffer.write_to(&mut writer)?;
    writer
        .flush()
        .with_context(|| format!("Failed to write output: {:?}", output))?;

    tracing::info!(
        "Exported {} meshes: {} vertex floats ({} vertices), {} indices",
        meshes.len(),
        buffer.vertices().len(),
        buffer.vertex_count(),
        buffer.indices().len()
    );

    let debug_json = if options.debug_json {
        let path = debug_json_path(output);
        let file = File::create(&path)
            .with_context(|| format!("Failed to create debug mirror: {:?}", path))?;
        let mut writer = BufWriter::new(file);
        buffer.write_debug_json_to(&mut writer)?;
        writer
            .flush()
            .with_context(|| format!("Failed to write debug mirror: {:?}", path))?;
        tracing::info!("Wrote debug mirror {:?}", path);
        Some(path)
    } else {
        None
    };

    Ok(ExportSummary {
        mesh_count: meshes.len(),
        vertex_count: buffer.vertex_count(),
        index_count: buffer.indices().len(),
        output: output.to_path_buf(),
        debug_json,
    })
}

/// Load source files in order and export them into one `.custom` file
pub fn export_files<P: AsRef<Path>>(
    inputs: &[P],
    output: &Path,
    options: &ExportOptions,
) -> Result<ExportSummary> {
    let meshes = load_sources(inputs)?;
    export_meshes(&meshes, output, options)
}
