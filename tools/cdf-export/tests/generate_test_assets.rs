//! Test asset generation
//!
//! Generates simple test assets for integration testing.
//! OBJ is written as text, glTF as JSON plus an external .bin buffer.

#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::Path;

/// Generate a unit cube OBJ with one normal per face
pub fn generate_cube_obj(path: &Path) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;

    writeln!(file, "# Simple cube for testing")?;
    writeln!(file, "o cube")?;

    // Vertices (8 corners of unit cube)
    writeln!(file, "v -0.5 -0.5  0.5")?;
    writeln!(file, "v  0.5 -0.5  0.5")?;
    writeln!(file, "v  0.5  0.5  0.5")?;
    writeln!(file, "v -0.5  0.5  0.5")?;
    writeln!(file, "v -0.5 -0.5 -0.5")?;
    writeln!(file, "v  0.5 -0.5 -0.5")?;
    writeln!(file, "v  0.5  0.5 -0.5")?;
    writeln!(file, "v -0.5  0.5 -0.5")?;

    // Normals (6 face normals)
    writeln!(file, "vn  0  0  1")?; // front
    writeln!(file, "vn  0  0 -1")?; // back
    writeln!(file, "vn  1  0  0")?; // right
    writeln!(file, "vn -1  0  0")?; // left
    writeln!(file, "vn  0  1  0")?; // top
    writeln!(file, "vn  0 -1  0")?; // bottom

    // Faces (quads, counter-clockwise from outside)
    writeln!(file, "f 1//1 2//1 3//1 4//1")?;
    writeln!(file, "f 6//2 5//2 8//2 7//2")?;
    writeln!(file, "f 2//3 6//3 7//3 3//3")?;
    writeln!(file, "f 5//4 1//4 4//4 8//4")?;
    writeln!(file, "f 4//5 3//5 7//5 8//5")?;
    writeln!(file, "f 5//6 6//6 2//6 1//6")?;

    Ok(())
}

/// Generate a single triangle OBJ without normals
pub fn generate_triangle_obj(path: &Path) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    writeln!(file, "# Minimal triangle")?;
    writeln!(file, "v 0 0 0")?;
    writeln!(file, "v 1 0 0")?;
    writeln!(file, "v 0 1 0")?;
    writeln!(file, "f 1 2 3")?;
    Ok(())
}

fn push_f32s(buffer: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        buffer.extend_from_slice(&v.to_le_bytes());
    }
}

fn push_u32s(buffer: &mut Vec<u8>, values: &[u32]) {
    for v in values {
        buffer.extend_from_slice(&v.to_le_bytes());
    }
}

/// Generate a glTF file with two meshes:
/// - `tri`: indexed triangle with per-vertex normals
/// - `flat_quad`: indexed quad (two triangles) without normals
///
/// The buffer is written next to the .gltf as `<stem>.bin`.
pub fn generate_two_mesh_gltf(path: &Path) -> std::io::Result<()> {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("mesh");
    let bin_name = format!("{}.bin", stem);

    let mut buffer = Vec::new();
    // tri positions @0
    push_f32s(&mut buffer, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    // tri normals @36
    push_f32s(&mut buffer, &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    // tri indices @72
    push_u32s(&mut buffer, &[0, 1, 2]);
    // quad positions @84
    push_f32s(
        &mut buffer,
        &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
    );
    // quad indices @132
    push_u32s(&mut buffer, &[0, 1, 2, 0, 2, 3]);
    assert_eq!(buffer.len(), 156);

    let document = serde_json::json!({
        "asset": { "version": "2.0" },
        "buffers": [{ "uri": bin_name, "byteLength": buffer.len() }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 72, "byteLength": 12 },
            { "buffer": 0, "byteOffset": 84, "byteLength": 48 },
            { "buffer": 0, "byteOffset": 132, "byteLength": 24 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3" },
            { "bufferView": 2, "componentType": 5125, "count": 3, "type": "SCALAR" },
            { "bufferView": 3, "componentType": 5126, "count": 4, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 4, "componentType": 5125, "count": 6, "type": "SCALAR" }
        ],
        "meshes": [
            {
                "name": "tri",
                "primitives": [{ "attributes": { "POSITION": 0, "NORMAL": 1 }, "indices": 2 }]
            },
            {
                "name": "flat_quad",
                "primitives": [{ "attributes": { "POSITION": 3 }, "indices": 4 }]
            }
        ]
    });

    fs::write(path.with_file_name(&bin_name), &buffer)?;
    fs::write(path, serde_json::to_vec_pretty(&document)?)?;
    Ok(())
}
