//! Corner expansion and vertex deduplication

use std::cmp::Ordering;

use super::normalize::{convert_normals, convert_positions, UpAxis};
use super::types::{DedupedMesh, MeshCorner, SourceMesh};

/// Pair every corner's vertex index with its (already converted) normal
pub fn build_corners(corner_vertices: &[u32], normals: &[[f32; 3]]) -> Vec<MeshCorner> {
    assert_eq!(
        corner_vertices.len(),
        normals.len(),
        "corner vertex indices and corner normals must have the same length"
    );
    corner_vertices
        .iter()
        .zip(normals)
        .map(|(&vertex_index, &normal)| MeshCorner {
            vertex_index,
            normal,
        })
        .collect()
}

/// One corner record per triangle corner, in triangle order
pub fn expand_triangles(corners: &[MeshCorner], triangles: &[[u32; 3]]) -> Vec<MeshCorner> {
    triangles
        .iter()
        .flatten()
        .map(|&corner| corners[corner as usize])
        .collect()
}

/// Normal component as compared for deduplication: `-0.0` becomes `+0.0`
#[inline]
fn normal_key(c: f32) -> f32 {
    c + 0.0
}

/// Total order used for deduplication.
///
/// Vertex index first, then the normal components by `total_cmp` on their
/// keys, so two corners compare equal exactly when their rounded normals are
/// `==` (a zero of either sign is one value).
fn corner_order(a: &MeshCorner, b: &MeshCorner) -> Ordering {
    a.vertex_index.cmp(&b.vertex_index).then_with(|| {
        a.normal
            .iter()
            .zip(&b.normal)
            .map(|(&x, &y)| normal_key(x).total_cmp(&normal_key(y)))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

/// Sorted distinct corners plus, for every input corner, its index in that set.
///
/// Each distinct corner is stored as the first input corner of its run.
pub fn dedup_corners(expanded: &[MeshCorner]) -> (Vec<MeshCorner>, Vec<u32>) {
    let mut order: Vec<usize> = (0..expanded.len()).collect();
    // ties keep input order, so each run starts with its earliest corner
    order.sort_unstable_by(|&a, &b| corner_order(&expanded[a], &expanded[b]).then(a.cmp(&b)));

    let mut unique: Vec<MeshCorner> = Vec::new();
    let mut inverse = vec![0u32; expanded.len()];
    for i in order {
        let corner = expanded[i];
        let is_new = unique
            .last()
            .is_none_or(|last| corner_order(last, &corner) != Ordering::Equal);
        if is_new {
            unique.push(corner);
        }
        inverse[i] = (unique.len() - 1) as u32;
    }

    (unique, inverse)
}

/// Normalize, expand and deduplicate one mesh.
///
/// Indices in the result are local to the mesh. Panics if the mesh violates
/// the preconditions checked by [`SourceMesh::validate`].
pub fn dedup_mesh(mesh: &SourceMesh, up_axis: UpAxis) -> DedupedMesh {
    let positions = convert_positions(&mesh.positions, up_axis);
    let normals = convert_normals(&mesh.corner_normals, up_axis);

    let corners = build_corners(&mesh.corner_vertices, &normals);
    let expanded = expand_triangles(&corners, &mesh.triangles);
    let (unique, indices) = dedup_corners(&expanded);

    tracing::debug!(
        "Mesh '{}': {} triangle corners -> {} vertices",
        mesh.name,
        expanded.len(),
        unique.len()
    );

    DedupedMesh {
        positions: unique
            .iter()
            .map(|c| positions[c.vertex_index as usize])
            .collect(),
        normals: unique.iter().map(|c| c.normal).collect(),
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UP: [f32; 3] = [0.0, 0.0, 1.0];

    fn quad(normals: Vec<[f32; 3]>) -> SourceMesh {
        SourceMesh::from_polygons(
            "quad",
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            vec![0, 1, 2, 3],
            normals,
            &[4],
        )
    }

    fn corner(vertex_index: u32, normal: [f32; 3]) -> MeshCorner {
        MeshCorner {
            vertex_index,
            normal,
        }
    }

    #[test]
    fn test_single_triangle() {
        let mesh = SourceMesh {
            name: "tri".into(),
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            corner_vertices: vec![0, 1, 2],
            corner_normals: vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            triangles: vec![[0, 1, 2]],
            ..Default::default()
        };
        let out = dedup_mesh(&mesh, UpAxis::Z);

        assert_eq!(out.indices, vec![0, 1, 2]);
        assert_eq!(out.vertex_count(), 3);
        assert_eq!(out.positions[2], [0.0, 0.0, -1.0]);
        assert_eq!(out.normals[1], [0.0, 0.0, -1.0]);
        assert_eq!(out.normals[2], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_quad_shares_edge_vertices() {
        let out = dedup_mesh(&quad(vec![UP; 4]), UpAxis::Z);

        assert_eq!(out.vertex_count(), 4);
        assert_eq!(out.indices, vec![0, 1, 2, 0, 2, 3]);
        assert!(out.normals.iter().all(|n| *n == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_same_vertex_different_normal_is_split() {
        // two triangles sharing vertices 0 and 2 with different normals
        let mesh = SourceMesh {
            name: "crease".into(),
            positions: vec![[0.0; 3]; 4],
            corner_vertices: vec![0, 1, 2, 0, 2, 3],
            corner_normals: vec![
                UP,
                UP,
                UP,
                [1.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
            ],
            triangles: vec![[0, 1, 2], [3, 4, 5]],
            ..Default::default()
        };
        let out = dedup_mesh(&mesh, UpAxis::Y);

        assert_eq!(out.vertex_count(), 6);
        assert_eq!(out.indices.len(), 6);
        assert_ne!(out.indices[0], out.indices[3]);
        assert_ne!(out.indices[2], out.indices[4]);
    }

    #[test]
    fn test_normals_equal_after_rounding_are_merged() {
        // differ past the 4th digit, including opposite signs rounding to zero
        let mesh = SourceMesh {
            name: "rounded".into(),
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            corner_vertices: vec![0, 1, 2, 0, 1, 2],
            corner_normals: vec![
                [0.5, 0.000_04, 0.0],
                [0.5, 0.000_04, 0.0],
                [0.300_02, 0.0, 0.399_98],
                [0.5, -0.000_04, 0.0],
                [0.5, -0.000_04, 0.0],
                [0.299_99, -0.000_01, 0.400_01],
            ],
            triangles: vec![[0, 1, 2], [3, 4, 5]],
            ..Default::default()
        };

        for up_axis in [UpAxis::Z, UpAxis::Y] {
            let out = dedup_mesh(&mesh, up_axis);
            assert_eq!(out.vertex_count(), 3, "{:?}", out.normals);
            assert_eq!(out.indices, vec![0, 1, 2, 0, 1, 2]);
        }
    }

    #[test]
    fn test_signed_zero_normals_share_one_corner() {
        let expanded = vec![
            corner(0, [1.0, 0.0, -0.0]),
            corner(0, [1.0, -0.0, 0.0]),
            corner(0, [1.0, 0.0, 0.0]),
        ];
        let (unique, inverse) = dedup_corners(&expanded);

        assert_eq!(inverse, vec![0, 0, 0]);
        // the earliest corner of the run is kept
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].normal[2].to_bits(), (-0.0f32).to_bits());
        assert_eq!(unique[0].normal[1].to_bits(), 0.0f32.to_bits());
    }

    #[test]
    fn test_equal_corners_map_to_equal_indices() {
        let expanded = vec![
            corner(5, UP),
            corner(2, UP),
            corner(5, UP),
            corner(5, [0.0, 1.0, 0.0]),
            corner(2, UP),
        ];
        let (unique, inverse) = dedup_corners(&expanded);

        assert_eq!(unique.len(), 3);
        for (i, a) in expanded.iter().enumerate() {
            assert_eq!(unique[inverse[i] as usize], *a);
            for (j, b) in expanded.iter().enumerate() {
                assert_eq!(a == b, inverse[i] == inverse[j]);
            }
        }
    }

    #[test]
    fn test_unique_set_is_sorted() {
        let expanded = vec![
            corner(3, UP),
            corner(1, [0.0, 1.0, 0.0]),
            corner(1, [-1.0, 0.0, 0.0]),
        ];
        let (unique, inverse) = dedup_corners(&expanded);

        assert_eq!(
            unique,
            vec![
                corner(1, [-1.0, 0.0, 0.0]),
                corner(1, [0.0, 1.0, 0.0]),
                corner(3, UP),
            ]
        );
        assert_eq!(inverse, vec![2, 1, 0]);
    }

    #[test]
    fn test_zero_triangles() {
        let mut mesh = quad(vec![UP; 4]);
        mesh.triangles.clear();
        let out = dedup_mesh(&mesh, UpAxis::Z);
        assert_eq!(out, DedupedMesh::default());
    }

    #[test]
    fn test_degenerate_triangle_is_kept() {
        let mesh = SourceMesh {
            name: "sliver".into(),
            positions: vec![[1.0, 1.0, 1.0]],
            corner_vertices: vec![0, 0, 0],
            corner_normals: vec![[0.0; 3]; 3],
            triangles: vec![[0, 1, 2]],
            ..Default::default()
        };
        let out = dedup_mesh(&mesh, UpAxis::Z);
        assert_eq!(out.indices, vec![0, 0, 0]);
        assert_eq!(out.vertex_count(), 1);
    }

    #[test]
    fn test_dedup_is_deterministic() {
        let mesh = quad(vec![UP, [0.0, 0.3, 0.9], UP, [0.1, 0.0, 1.0]]);
        assert_eq!(dedup_mesh(&mesh, UpAxis::Z), dedup_mesh(&mesh, UpAxis::Z));
    }

    #[test]
    #[should_panic]
    fn test_mismatched_corners_panic() {
        build_corners(&[0, 1, 2], &[UP; 2]);
    }
}
