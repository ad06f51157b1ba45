//! Depth sign normalisation.
//!
//! Source files store elevation (positive above sea level). The map shows
//! depth, so land cells become no-data (NaN) and sea cells are negated.

/// Convert one raw elevation value to a depth, or NaN for land.
#[inline]
pub fn normalize_depth(raw: f32) -> f32 {
    if raw > 0.0 {
        f32::NAN
    } else {
        -raw
    }
}

/// Normalise a slice of raw elevations in place.
///
/// Not idempotent: applying it twice turns every sea cell into land.
pub fn normalize_depths(values: &mut [f32]) {
    for value in values.iter_mut() {
        *value = normalize_depth(*value);
    }
}
