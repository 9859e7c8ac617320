use rayon::prelude::*;

use crate::{interp::normalize, types::Value};

/// A `(min, max)` pair over a numeric sequence.
///
/// NaN samples are ignored; a sequence without any finite-or-infinite number
/// has no extrema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extrema {
    pub min: Value,
    pub max: Value,
}

impl Extrema {
    pub fn new(min: Value, max: Value) -> Self {
        Self { min, max }
    }

    pub fn of<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        values
            .into_iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| Some(Self::include(acc, v)))
    }

    /// Like [`of`](Extrema::of), but scans the slice in parallel.
    ///
    /// Used once per field buffer at load time, where the buffer can be large.
    pub fn of_slice(values: &[Value]) -> Option<Self> {
        values
            .par_iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(|| None, |acc, v| Some(Self::include(acc, v)))
            .reduce(
                || None,
                |a, b| match (a, b) {
                    (Some(a), Some(b)) => Some(Self::new(a.min.min(b.min), a.max.max(b.max))),
                    (a, None) => a,
                    (None, b) => b,
                },
            )
    }

    fn include(acc: Option<Self>, v: Value) -> Self {
        match acc {
            Some(e) => Self::new(e.min.min(v), e.max.max(v)),
            None => Self::new(v, v),
        }
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Normalizes `value` against this range, see [`normalize`].
    #[inline]
    pub fn normalize(&self, value: Value) -> Value {
        normalize(value, self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extrema_skip_nan() {
        let e = Extrema::of([3.0, Value::NAN, -1.0, 7.5]).unwrap();
        assert_eq!(e, Extrema::new(-1.0, 7.5));
        assert!(Extrema::of([Value::NAN]).is_none());
        assert!(Extrema::of(Vec::<Value>::new()).is_none());
    }

    #[test]
    fn parallel_scan_matches_sequential() {
        let values: Vec<Value> = (0..10_000).map(|i| ((i * 37) % 1013) as Value - 500.0).collect();
        assert_eq!(Extrema::of_slice(&values), Extrema::of(values.iter().copied()));
    }

    #[test]
    fn degenerate_normalizes_to_midpoint() {
        let e = Extrema::of([4.0, 4.0]).unwrap();
        assert!(e.is_degenerate());
        assert_eq!(e.normalize(4.0), 0.5);
    }
}
