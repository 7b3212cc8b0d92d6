//! Coordinate conversion and normal cleanup

use glam::Vec3;
use serde::Deserialize;

/// Decimal digits kept when rounding normal components
pub const ROUNDING_DIGITS: i32 = 4;

/// Up axis of the source data
///
/// The export target is Y-up. Z-up sources are converted with
/// [`fix_coordinate`]; Y-up sources are left in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UpAxis {
    #[default]
    Z,
    Y,
}

/// Map a Z-up right-handed vector to Y-up: `(x, y, z) -> (x, z, -y)`
#[inline]
pub fn fix_coordinate([x, y, z]: [f32; 3]) -> [f32; 3] {
    [x, z, -y]
}

/// Round to `digits` decimal places, ties to even
#[inline]
pub fn round_to_digits(value: f32, digits: i32) -> f32 {
    let scale = 10f32.powi(digits);
    (value * scale).round_ties_even() / scale
}

/// Round each component, then scale to unit length.
///
/// The length is taken after rounding, so the result is only unit length to
/// within the rounding precision. A zero vector stays zero.
pub fn normalize_normal(normal: [f32; 3]) -> [f32; 3] {
    let rounded = Vec3::from_array(normal.map(|c| round_to_digits(c, ROUNDING_DIGITS)));
    let length = rounded.length();
    if length != 0.0 {
        (rounded / length).to_array()
    } else {
        rounded.to_array()
    }
}

/// Convert raw positions to the target convention
pub fn convert_positions(positions: &[[f32; 3]], up_axis: UpAxis) -> Vec<[f32; 3]> {
    match up_axis {
        UpAxis::Z => positions.iter().copied().map(fix_coordinate).collect(),
        UpAxis::Y => positions.to_vec(),
    }
}

/// Round, normalize, then convert raw per-corner normals (in that order)
pub fn convert_normals(normals: &[[f32; 3]], up_axis: UpAxis) -> Vec<[f32; 3]> {
    normals
        .iter()
        .map(|&n| {
            let n = normalize_normal(n);
            match up_axis {
                UpAxis::Z => fix_coordinate(n),
                UpAxis::Y => n,
            }
        })
        .collect()
}
