//! Mesh conversion (OBJ/glTF -> deduplicated triangle lists)

mod dedup;
mod gltf;
mod normalize;
mod obj;
mod types;

use anyhow::{bail, Result};
use std::path::Path;

// Re-export public API
pub use self::dedup::{build_corners, dedup_corners, dedup_mesh, expand_triangles};
pub use self::gltf::load_gltf;
pub use self::normalize::{
    convert_normals, convert_positions, fix_coordinate, normalize_normal, round_to_digits,
    UpAxis, ROUNDING_DIGITS,
};
pub use self::obj::{load_obj, parse_obj};
pub use self::types::{
    triangulate_polygons, DedupedMesh, MeshCorner, MeshError, SourceMesh,
};

/// Load all meshes of a source file, dispatching on its extension
pub fn load_source(input: &Path) -> Result<Vec<SourceMesh>> {
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    let meshes = match ext.as_str() {
        "obj" => load_obj(input)?,
        "gltf" | "glb" => load_gltf(input)?,
        _ => bail!(
            "Unsupported mesh format: {:?} (use .obj, .gltf, or .glb)",
            input
        ),
    };

    tracing::debug!("Loaded {} mesh(es) from {:?}", meshes.len(), input);
    Ok(meshes)
}

/// Load several source files, keeping file order then in-file order
pub fn load_sources<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<SourceMesh>> {
    let mut meshes = Vec::new();
    for input in inputs {
        meshes.extend(load_source(input.as_ref())?);
    }
    Ok(meshes)
}
