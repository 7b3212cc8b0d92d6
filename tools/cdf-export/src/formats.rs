//! Writers for Custom Data Format files
//!
//! Re-exports the layout types from cdf-common.

pub use cdf_common::formats::*;

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write a complete `.custom` file: header, indices, vertex floats
pub fn write_cdf_mesh<W: Write>(w: &mut W, indices: &[u32], vertices: &[f32]) -> Result<()> {
    let index_count = u32::try_from(indices.len()).context("Index count exceeds u32")?;
    let vertex_float_count =
        u32::try_from(vertices.len()).context("Vertex float count exceeds u32")?;

    let header = CdfMeshHeader::new(index_count, vertex_float_count);
    w.write_all(&header.to_bytes())?;

    for i in indices {
        w.write_all(&i.to_le_bytes())?;
    }
    for f in vertices {
        w.write_all(&f.to_le_bytes())?;
    }

    Ok(())
}

/// Human-readable mirror of a `.custom` file, for inspection only
#[derive(Serialize)]
struct DebugMirror<'a> {
    #[serde(rename = "VERSION")]
    version: u32,
    indices_len: usize,
    vertices_len: usize,
    indices: &'a [u32],
    vertices: &'a [f32],
}

/// Write the debug JSON mirror of the same logical data
pub fn write_debug_json<W: Write>(w: &mut W, indices: &[u32], vertices: &[f32]) -> Result<()> {
    let mirror = DebugMirror {
        version: FORMAT_VERSION,
        indices_len: indices.len(),
        vertices_len: vertices.len(),
        indices,
        vertices,
    };
    serde_json::to_writer(&mut *w, &mirror)?;
    w.write_all(b"\n")?;
    Ok(())
}

/// `<path>.json`, next to the binary file
pub fn debug_json_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".json");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_layout() {
        let mut out = Vec::new();
        write_cdf_mesh(&mut out, &[0, 1, 2], &[1.5; 8]).unwrap();

        assert_eq!(out.len(), CdfMeshHeader::SIZE + 3 * 4 + 8 * 4);
        assert_eq!(&out[0..4], &1u32.to_le_bytes());
        assert_eq!(&out[4..8], &3u32.to_le_bytes());
        assert_eq!(&out[8..12], &8u32.to_le_bytes());
        assert_eq!(&out[12..16], &0u32.to_le_bytes());
        assert_eq!(&out[20..24], &2u32.to_le_bytes());
        assert_eq!(&out[24..28], &1.5f32.to_le_bytes());
    }

    #[test]
    fn test_write_then_read() {
        let indices = [0, 1, 2];
        let vertices = [
            0.0, 1.0, 2.0, 0.0, 0.0, 1.0, 0.0, 0.0, //
            3.0, 4.0, 5.0, 0.0, 0.0, 0.0, -1.0, 0.0, //
            -6.5, 7.25, 1e-7, 0.0, 0.6, 0.8, 0.0, 0.0,
        ];
        let mut out = Vec::new();
        write_cdf_mesh(&mut out, &indices, &vertices).unwrap();

        let mesh = CdfMesh::from_bytes(&out).unwrap();
        assert_eq!(mesh.header(), &CdfMeshHeader::new(3, 24));
        assert_eq!(mesh.indices(), &indices);
        let bits = |v: &[f32]| v.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(mesh.vertices()), bits(&vertices));
    }

    #[test]
    fn test_debug_json_contents() {
        let mut out = Vec::new();
        write_debug_json(&mut out, &[0, 1, 2], &[0.5; 8]).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["VERSION"], 1);
        assert_eq!(value["indices_len"], 3);
        assert_eq!(value["vertices_len"], 8);
        assert_eq!(value["indices"], serde_json::json!([0, 1, 2]));
        assert_eq!(value["vertices"].as_array().unwrap().len(), 8);
    }

    #[test]
    fn test_debug_json_path_appends_suffix() {
        assert_eq!(
            debug_json_path(Path::new("out/level.custom")),
            PathBuf::from("out/level.custom.json")
        );
    }
}
