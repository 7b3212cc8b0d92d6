//! Custom mesh binary format (.custom)
//!
//! GPU-ready triangle list: a u32 index buffer followed by a flat f32 vertex
//! buffer. POD format - no magic bytes, no checksum, no compression.
//!
//! # Layout
//! ```text
//! 0x00:   format_version u32 (= 1)
//! 0x04:   index_count u32 (N)
//! 0x08:   vertex_float_count u32 (M = 8 * vertex records)
//! 0x0C:   indices u32[N]
//! 12+4N:  vertex attributes f32[M], record-major:
//!         [pos.x, pos.y, pos.z, 0.0, normal.x, normal.y, normal.z, 0.0]
//! ```
//!
//! All words are little-endian.

use bytemuck::{Pod, Zeroable};
use thiserror::Error;

/// Only version a consumer of this crate accepts
pub const FORMAT_VERSION: u32 = 1;

/// File extension for exported meshes
pub const CDF_MESH_EXT: &str = "custom";

/// Floats per vertex record (position + pad + normal + pad)
pub const FLOATS_PER_VERTEX: usize = 8;

/// Errors from reading a `.custom` file back
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Mesh data truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("Unsupported format version {0} (expected {v})", v = FORMAT_VERSION)]
    UnsupportedVersion(u32),

    #[error("Vertex float count {0} is not a multiple of {n}", n = FLOATS_PER_VERTEX)]
    MisalignedVertexData(u32),

    #[error("Index count {0} is not a multiple of 3")]
    IncompleteTriangle(u32),

    #[error("Index {value} at position {position} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        value: u32,
        position: usize,
        vertex_count: usize,
    },

    #[error("{0} unexpected bytes after vertex data")]
    TrailingBytes(usize),
}

/// Custom mesh header (12 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct CdfMeshHeader {
    pub format_version: u32,
    pub index_count: u32,
    pub vertex_float_count: u32,
}

impl CdfMeshHeader {
    pub const SIZE: usize = 12;

    pub fn new(index_count: u32, vertex_float_count: u32) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            index_count,
            vertex_float_count,
        }
    }

    /// Number of vertex records described by this header
    pub fn vertex_count(&self) -> u32 {
        self.vertex_float_count / FLOATS_PER_VERTEX as u32
    }

    /// Size of the index and vertex payload that follows the header
    pub fn payload_size(&self) -> usize {
        (self.index_count as usize + self.vertex_float_count as usize) * 4
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.format_version.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.index_count.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.vertex_float_count.to_le_bytes());
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            format_version: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            index_count: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            vertex_float_count: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        })
    }
}

/// One exported vertex (32 bytes)
///
/// The pad words keep position and normal 16-byte aligned for vec4 loads.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct VertexRecord {
    pub position: [f32; 3],
    pub _pad0: f32,
    pub normal: [f32; 3],
    pub _pad1: f32,
}

impl VertexRecord {
    pub const SIZE: usize = FLOATS_PER_VERTEX * 4;

    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self {
            position,
            _pad0: 0.0,
            normal,
            _pad1: 0.0,
        }
    }

    /// The record as it is laid out in the vertex buffer
    pub fn as_floats(&self) -> &[f32; FLOATS_PER_VERTEX] {
        bytemuck::cast_ref(self)
    }
}

/// A parsed and validated `.custom` file
#[derive(Debug, Clone, PartialEq)]
pub struct CdfMesh {
    header: CdfMeshHeader,
    indices: Vec<u32>,
    vertices: Vec<f32>,
}

impl CdfMesh {
    /// Parse a complete file.
    ///
    /// Rejects other format versions, short or over-long input, vertex data
    /// that is not whole records, partial triangles and out-of-range indices.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        let header = CdfMeshHeader::from_bytes(bytes).ok_or(FormatError::Truncated {
            expected: CdfMeshHeader::SIZE,
            actual: bytes.len(),
        })?;

        if header.format_version != FORMAT_VERSION {
            return Err(FormatError::UnsupportedVersion(header.format_version));
        }
        if header.vertex_float_count as usize % FLOATS_PER_VERTEX != 0 {
            return Err(FormatError::MisalignedVertexData(header.vertex_float_count));
        }
        if header.index_count % 3 != 0 {
            return Err(FormatError::IncompleteTriangle(header.index_count));
        }

        let expected = CdfMeshHeader::SIZE + header.payload_size();
        if bytes.len() < expected {
            return Err(FormatError::Truncated {
                expected,
                actual: bytes.len(),
            });
        }
        if bytes.len() > expected {
            return Err(FormatError::TrailingBytes(bytes.len() - expected));
        }

        let index_end = CdfMeshHeader::SIZE + header.index_count as usize * 4;
        let indices: Vec<u32> = bytes[CdfMeshHeader::SIZE..index_end]
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        let vertices: Vec<f32> = bytes[index_end..]
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        let vertex_count = header.vertex_count() as usize;
        if let Some((position, &value)) = indices
            .iter()
            .enumerate()
            .find(|(_, v)| **v as usize >= vertex_count)
        {
            return Err(FormatError::IndexOutOfRange {
                value,
                position,
                vertex_count,
            });
        }

        Ok(Self {
            header,
            indices,
            vertices,
        })
    }

    pub fn header(&self) -> &CdfMeshHeader {
        &self.header
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Flat vertex floats, exactly as stored
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex buffer viewed as records
    pub fn vertex_records(&self) -> &[VertexRecord] {
        bytemuck::cast_slice(self.vertices.as_slice())
    }

    /// Axis-aligned bounds of all vertex positions, `None` for an empty mesh
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let mut records = self.vertex_records().iter();
        let first = records.next()?.position;
        Some(records.fold((first, first), |(mut min, mut max), record| {
            for axis in 0..3 {
                min[axis] = min[axis].min(record.position[axis]);
                max[axis] = max[axis].max(record.position[axis]);
            }
            (min, max)
        }))
    }
}
