//! cdf-export library
//!
//! Mesh normalization, deduplication and `.custom` writing, for use by the
//! CLI and by other tools that already hold mesh data in memory.

pub mod export;
pub mod formats;
pub mod manifest;
pub mod mesh;

// Re-export the file layout from cdf-common
pub use cdf_common::{CdfMesh, CdfMeshHeader, VertexRecord, CDF_MESH_EXT, FORMAT_VERSION};

// Re-export key types for mesh conversion
pub use export::{
    build_export_buffer, export_files, export_meshes, ExportBuffer, ExportOptions, ExportSummary,
};
pub use mesh::{dedup_mesh, load_source, DedupedMesh, MeshError, SourceMesh, UpAxis};
