use crate::models::PhysiqueQuery;

/// Age range accepted by the matcher, in years
pub const AGE_RANGE: (u8, u8) = (6, 60);

/// Internal height range in centimetres; narrower than the UI range
pub const HEIGHT_RANGE: (u16, u16) = (150, 205);

/// Internal weight range in kilograms; narrower than the UI range
pub const WEIGHT_RANGE: (u16, u16) = (45, 115);

/// Bucket width for height and weight
pub const BUCKET_STEP: u16 = 5;

/// Clamp an age into the matcher range. Ages are never bucketed.
#[inline]
pub fn clamp_age(age: u8) -> u8 {
    age.clamp(AGE_RANGE.0, AGE_RANGE.1)
}

/// Round to the nearest multiple of `step`, ties away from zero
#[inline]
pub fn snap_to_step(value: u16, step: u16) -> u16 {
    if step == 0 {
        return value;
    }
    let buckets = (f64::from(value) / f64::from(step)).round();
    (buckets as u16).saturating_mul(step)
}

/// Clamp a height into the internal range and snap it to the bucket grid
///
/// Both range bounds sit on the grid, so the result never leaves the range.
#[inline]
pub fn snap_height(height_cm: u16) -> u16 {
    snap_to_step(height_cm.clamp(HEIGHT_RANGE.0, HEIGHT_RANGE.1), BUCKET_STEP)
}

/// Clamp a weight into the internal range and snap it to the bucket grid
#[inline]
pub fn snap_weight(weight_kg: u16) -> u16 {
    snap_to_step(weight_kg.clamp(WEIGHT_RANGE.0, WEIGHT_RANGE.1), BUCKET_STEP)
}

/// Apply every clamp and snap to a query
pub fn normalize(query: &PhysiqueQuery) -> PhysiqueQuery {
    PhysiqueQuery {
        age: clamp_age(query.age),
        height_cm: snap_height(query.height_cm),
        weight_kg: snap_weight(query.weight_kg),
    }
}
