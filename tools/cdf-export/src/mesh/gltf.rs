//! glTF/GLB mesh loading

use anyhow::{bail, Context, Result};
use glam::Vec3;
use std::path::Path;

use super::normalize::UpAxis;
use super::types::SourceMesh;

/// Load every triangle-list primitive of every mesh, in document order.
///
/// Each primitive becomes one [`SourceMesh`]; glTF vertices are shared
/// between triangles, so corner `i` is simply index `i` of the primitive.
/// glTF is Y-up, so the meshes are marked [`UpAxis::Y`].
pub fn load_gltf(input: &Path) -> Result<Vec<SourceMesh>> {
    let (document, buffers, _images) =
        gltf::import(input).with_context(|| format!("Failed to load glTF: {:?}", input))?;

    let mut meshes = Vec::new();
    for mesh in document.meshes() {
        let mesh_name = mesh
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("mesh{}", mesh.index()));
        let primitive_count = mesh.primitives().count();

        for primitive in mesh.primitives() {
            let name = if primitive_count > 1 {
                format!("{}.{}", mesh_name, primitive.index())
            } else {
                mesh_name.clone()
            };

            if primitive.mode() != gltf::mesh::Mode::Triangles {
                tracing::warn!(
                    "Skipping primitive '{}': mode {:?} is not a triangle list",
                    name,
                    primitive.mode()
                );
                continue;
            }

            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            // Positions (required)
            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .with_context(|| format!("No positions in primitive '{}'", name))?
                .collect();

            // Indices (optional)
            let indices: Vec<u32> = reader
                .read_indices()
                .map(|iter| iter.into_u32().collect())
                .unwrap_or_else(|| (0..positions.len() as u32).collect());

            if indices.len() % 3 != 0 {
                bail!(
                    "Primitive '{}' has {} indices, not a multiple of 3",
                    name,
                    indices.len()
                );
            }
            if let Some(&bad) = indices.iter().find(|i| **i as usize >= positions.len()) {
                bail!(
                    "Primitive '{}' index {} exceeds vertex count {}",
                    name,
                    bad,
                    positions.len()
                );
            }

            // Normals (optional, flat shading when missing)
            let normals: Option<Vec<[f32; 3]>> = reader
                .read_normals()
                .map(|iter| iter.collect())
                .filter(|n: &Vec<[f32; 3]>| n.len() == positions.len());
            let corner_normals = match normals {
                Some(normals) => indices.iter().map(|&i| normals[i as usize]).collect(),
                None => {
                    tracing::warn!("Primitive '{}' has no normals, using face normals", name);
                    flat_normals(&positions, &indices)
                }
            };

            let triangle_count = indices.len() as u32 / 3;
            meshes.push(SourceMesh {
                name,
                positions,
                corner_vertices: indices,
                corner_normals,
                triangles: (0..triangle_count)
                    .map(|t| [t * 3, t * 3 + 1, t * 3 + 2])
                    .collect(),
                up_axis: UpAxis::Y,
            });
        }
    }

    Ok(meshes)
}

/// One face normal per triangle, repeated for its three corners
fn flat_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    indices
        .chunks_exact(3)
        .flat_map(|tri| {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(positions[i as usize]));
            let n = (b - a).cross(c - a).normalize_or_zero().to_array();
            [n; 3]
        })
        .collect()
}
