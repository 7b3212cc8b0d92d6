//! Custom Data Format binary layouts
//!
//! POD formats, little-endian, no magic bytes. The leading `format_version`
//! word is the only negotiation a consumer gets.

pub mod mesh;

pub use mesh::*;
