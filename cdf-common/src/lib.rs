//! Shared types for the Custom Data Format (`.custom`) mesh asset
//!
//! This crate describes the on-disk layout and is used by:
//! - `cdf-export` (asset pipeline, writes files)
//! - any runtime loader that wants to read them back
//!
//! # Modules
//!
//! - [`formats`] - Binary headers, vertex records and the file reader

pub mod formats;

pub use formats::{
    CdfMesh, CdfMeshHeader, FormatError, VertexRecord, CDF_MESH_EXT, FLOATS_PER_VERTEX,
    FORMAT_VERSION,
};
