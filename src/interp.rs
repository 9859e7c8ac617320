use crate::types::Value;

/// Normalized position reported for a degenerate (`min == max`) range.
pub const DEGENERATE_MIDPOINT: Value = 0.5;

// linearly map a number from one range to another
pub fn remap(s: Value, range_in: [Value; 2], range_out: [Value; 2]) -> Value {
    range_out[0] + (s - range_in[0]) * (range_out[1] - range_out[0]) / (range_in[1] - range_in[0])
}

// Linear interpolation
pub fn lerp(a: Value, b: Value, t: Value) -> Value {
    a + (b - a) * t
}

/// Maps `value` from `[min, max]` into `[0, 1]`.
///
/// A degenerate range yields [`DEGENERATE_MIDPOINT`] for every input. Values
/// outside the range are clamped.
pub fn normalize(value: Value, min: Value, max: Value) -> Value {
    if min == max {
        return DEGENERATE_MIDPOINT;
    }
    remap(value, [min, max], [0.0, 1.0]).clamp(0.0, 1.0)
}
