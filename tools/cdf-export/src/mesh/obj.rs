//! OBJ mesh loading

use anyhow::{bail, Context, Result};
use glam::Vec3;
use hashbrown::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::types::SourceMesh;

/// Load every object of an OBJ file as a separate mesh
pub fn load_obj(input: &Path) -> Result<Vec<SourceMesh>> {
    let file = File::open(input).with_context(|| format!("Failed to open OBJ: {:?}", input))?;
    let default_name = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("obj");
    parse_obj(BufReader::new(file), default_name)
        .with_context(|| format!("Failed to parse OBJ: {:?}", input))
}

/// One `o`/`g` section being collected
struct ObjObject {
    name: String,
    /// OBJ position index -> local vertex index, in first-use order
    vertex_map: HashMap<usize, u32>,
    positions: Vec<[f32; 3]>,
    corner_vertices: Vec<u32>,
    corner_normals: Vec<[f32; 3]>,
    polygon_sizes: Vec<u32>,
}

impl ObjObject {
    fn new(name: String) -> Self {
        Self {
            name,
            vertex_map: HashMap::new(),
            positions: Vec::new(),
            corner_vertices: Vec::new(),
            corner_normals: Vec::new(),
            polygon_sizes: Vec::new(),
        }
    }

    fn local_vertex(&mut self, index: usize, position: [f32; 3]) -> u32 {
        if let Some(&local) = self.vertex_map.get(&index) {
            return local;
        }
        let local = self.positions.len() as u32;
        self.positions.push(position);
        self.vertex_map.insert(index, local);
        local
    }

    fn finish(self, meshes: &mut Vec<SourceMesh>) {
        if self.polygon_sizes.is_empty() {
            tracing::debug!("Skipping OBJ object '{}' without faces", self.name);
            return;
        }
        meshes.push(SourceMesh::from_polygons(
            self.name,
            self.positions,
            self.corner_vertices,
            self.corner_normals,
            &self.polygon_sizes,
        ));
    }
}

/// Parse OBJ text.
///
/// Supports `v`, `vn`, `f` (`v`, `v/vt`, `v/vt/vn`, `v//vn`, negative
/// indices) and `o`/`g` sections. Corners without a normal get the
/// polygon's face normal.
pub fn parse_obj<R: BufRead>(reader: R, default_name: &str) -> Result<Vec<SourceMesh>> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut meshes = Vec::new();
    let mut current = ObjObject::new(default_name.to_string());

    for (line_idx, line) in reader.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "v" => positions.push(parse_vec3(&parts, line_no)?),
            "vn" => normals.push(parse_vec3(&parts, line_no)?),
            "o" | "g" => {
                let name = parts[1..].join(" ");
                let name = if name.is_empty() {
                    default_name.to_string()
                } else {
                    name
                };
                let finished = std::mem::replace(&mut current, ObjObject::new(name));
                finished.finish(&mut meshes);
            }
            "f" => {
                let refs = parts[1..]
                    .iter()
                    .map(|s| parse_obj_vertex(s, positions.len(), normals.len(), line_no))
                    .collect::<Result<Vec<_>>>()?;

                if refs.len() < 3 {
                    tracing::warn!("Line {}: face with {} corners skipped", line_no, refs.len());
                    continue;
                }

                let face_points: Vec<[f32; 3]> = refs.iter().map(|(vi, _)| positions[*vi]).collect();
                let fallback = if refs.iter().any(|(_, ni)| ni.is_none()) {
                    face_normal(&face_points)
                } else {
                    [0.0; 3]
                };

                for (vi, ni) in refs {
                    let local = current.local_vertex(vi, positions[vi]);
                    current.corner_vertices.push(local);
                    current
                        .corner_normals
                        .push(ni.map(|n| normals[n]).unwrap_or(fallback));
                }
                current.polygon_sizes.push(face_points.len() as u32);
            }
            // vt, s, usemtl, mtllib, l, p: nothing to export
            _ => {}
        }
    }

    current.finish(&mut meshes);
    Ok(meshes)
}

fn parse_vec3(parts: &[&str], line_no: usize) -> Result<[f32; 3]> {
    if parts.len() < 4 {
        bail!("Line {}: expected 3 components after '{}'", line_no, parts[0]);
    }
    let mut out = [0.0f32; 3];
    for (slot, s) in out.iter_mut().zip(&parts[1..4]) {
        *slot = s
            .parse()
            .with_context(|| format!("Line {}: invalid number {:?}", line_no, s))?;
    }
    Ok(out)
}

/// Resolve a 1-based or negative (relative) OBJ index
fn resolve_index(raw: &str, len: usize, kind: &str, line_no: usize) -> Result<usize> {
    let value: i64 = raw
        .parse()
        .with_context(|| format!("Line {}: invalid {} index {:?}", line_no, kind, raw))?;
    let resolved = match value {
        v if v > 0 => v - 1,
        v if v < 0 => len as i64 + v,
        _ => bail!("Line {}: {} index 0 is invalid", line_no, kind),
    };
    if resolved < 0 || resolved as usize >= len {
        bail!(
            "Line {}: {} index {} out of range ({} defined)",
            line_no,
            kind,
            value,
            len
        );
    }
    Ok(resolved as usize)
}

/// Parse a face corner: "v", "v/vt", "v/vt/vn", or "v//vn"
fn parse_obj_vertex(
    s: &str,
    position_count: usize,
    normal_count: usize,
    line_no: usize,
) -> Result<(usize, Option<usize>)> {
    let mut parts = s.split('/');
    let vi = resolve_index(parts.next().unwrap_or(""), position_count, "vertex", line_no)?;
    let ni = match parts.nth(1).filter(|s| !s.is_empty()) {
        Some(raw) => Some(resolve_index(raw, normal_count, "normal", line_no)?),
        None => None,
    };
    Ok((vi, ni))
}

/// Newell's method; zero for degenerate polygons
fn face_normal(points: &[[f32; 3]]) -> [f32; 3] {
    let mut normal = Vec3::ZERO;
    for (i, a) in points.iter().enumerate() {
        let a = Vec3::from_array(*a);
        let b = Vec3::from_array(points[(i + 1) % points.len()]);
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal.normalize_or_zero().to_array()
}
