//! Types for mesh conversion

use thiserror::Error;

use super::normalize::UpAxis;

/// One mesh object as handed over by a loader.
///
/// Corners (loops) are polygon vertex instances: corner `i` references
/// `positions[corner_vertices[i]]` and carries its own `corner_normals[i]`.
/// `triangles` holds corner indices, three per triangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceMesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub corner_vertices: Vec<u32>,
    pub corner_normals: Vec<[f32; 3]>,
    pub triangles: Vec<[u32; 3]>,
    /// Convention of `positions` and `corner_normals`, set by the loader
    pub up_axis: UpAxis,
}

/// Precondition violations of a [`SourceMesh`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("Mesh '{name}' has {vertices} corner vertex indices but {normals} corner normals")]
    CornerCountMismatch {
        name: String,
        vertices: usize,
        normals: usize,
    },

    #[error("Mesh '{name}': corner {corner} references vertex {vertex}, mesh has {vertex_count}")]
    VertexOutOfRange {
        name: String,
        corner: usize,
        vertex: u32,
        vertex_count: usize,
    },

    #[error("Mesh '{name}': triangle {triangle} references corner {corner}, mesh has {corner_count}")]
    CornerOutOfRange {
        name: String,
        triangle: usize,
        corner: u32,
        corner_count: usize,
    },
}

impl SourceMesh {
    /// Build a mesh from polygons stored as consecutive runs of corners.
    ///
    /// `polygon_sizes[p]` is the corner count of polygon `p`; the polygons are
    /// fan-triangulated. The data is taken as Z-up.
    pub fn from_polygons(
        name: impl Into<String>,
        positions: Vec<[f32; 3]>,
        corner_vertices: Vec<u32>,
        corner_normals: Vec<[f32; 3]>,
        polygon_sizes: &[u32],
    ) -> Self {
        Self {
            name: name.into(),
            positions,
            corner_vertices,
            corner_normals,
            triangles: triangulate_polygons(polygon_sizes),
            up_axis: UpAxis::Z,
        }
    }

    pub fn corner_count(&self) -> usize {
        self.corner_vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Check every precondition the conversion pipeline relies on
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.corner_vertices.len() != self.corner_normals.len() {
            return Err(MeshError::CornerCountMismatch {
                name: self.name.clone(),
                vertices: self.corner_vertices.len(),
                normals: self.corner_normals.len(),
            });
        }

        if let Some((corner, &vertex)) = self
            .corner_vertices
            .iter()
            .enumerate()
            .find(|(_, v)| **v as usize >= self.positions.len())
        {
            return Err(MeshError::VertexOutOfRange {
                name: self.name.clone(),
                corner,
                vertex,
                vertex_count: self.positions.len(),
            });
        }

        for (triangle, corners) in self.triangles.iter().enumerate() {
            if let Some(&corner) = corners
                .iter()
                .find(|c| **c as usize >= self.corner_vertices.len())
            {
                return Err(MeshError::CornerOutOfRange {
                    name: self.name.clone(),
                    triangle,
                    corner,
                    corner_count: self.corner_vertices.len(),
                });
            }
        }

        Ok(())
    }
}

/// Fan-triangulate polygons stored as consecutive corner runs.
///
/// Polygons with fewer than 3 corners produce no triangles but still
/// advance the corner cursor.
pub fn triangulate_polygons(polygon_sizes: &[u32]) -> Vec<[u32; 3]> {
    let mut triangles = Vec::new();
    let mut start = 0u32;
    for &size in polygon_sizes {
        for i in 1..size.saturating_sub(1) {
            triangles.push([start, start + i, start + i + 1]);
        }
        start += size;
    }
    triangles
}

/// One triangle corner after normalization: the unit of deduplication
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshCorner {
    pub vertex_index: u32,
    pub normal: [f32; 3],
}

/// Deduplicated vertices and local triangle indices of one mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedupedMesh {
    /// One position per distinct corner, already converted
    pub positions: Vec<[f32; 3]>,
    /// One normal per distinct corner, parallel to `positions`
    pub normals: Vec<[f32; 3]>,
    /// Triangle list indexing `positions`/`normals`
    pub indices: Vec<u32>,
}

impl DedupedMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}
