use ndarray::{Array4, ArrayView4};
use tracing::debug;

use crate::{
    error::{Result, SliceError},
    extremum::Extrema,
    types::{Axis, MultiIndex, RANK, Value},
};

/// Immutable 4D field over a flat row-major buffer.
///
/// The buffer is owned exclusively by the array and never mutated after
/// construction. The offset of `(i0, i1, i2, i3)` is
///
/// ```text
/// i0 * (e1 * e2 * e3) + i1 * (e2 * e3) + i2 * e3 + i3
/// ```
///
/// The extremum over the whole buffer is computed once here so every slice is
/// normalized against the same scale.
#[derive(Debug, Clone)]
pub struct NdArray {
    data: Array4<Value>,
    extents: MultiIndex,
    strides: MultiIndex,
    extrema: Extrema,
}

impl NdArray {
    /// Wraps `buffer` as a field with the given per-axis extents.
    ///
    /// Returns [`SliceError::ShapeMismatch`] if `buffer.len()` is not the product
    /// of `extents`, if any extent is zero, or if the product overflows `usize`
    /// (reported as `expected: usize::MAX`).
    pub fn new(buffer: Vec<Value>, extents: MultiIndex) -> Result<Self> {
        let expected = element_count(&extents).unwrap_or(usize::MAX);
        if expected == 0 || buffer.len() != expected {
            return Err(SliceError::ShapeMismatch {
                extents: extents.to_vec(),
                expected,
                actual: buffer.len(),
            });
        }

        let shape = (extents[0], extents[1], extents[2], extents[3]);
        let data = Array4::from_shape_vec(shape, buffer).map_err(|_| SliceError::ShapeMismatch {
            extents: extents.to_vec(),
            expected,
            actual: expected,
        })?;

        // Every sample NaN: fall back to a degenerate range so normalization stays defined.
        let extrema = data
            .as_slice()
            .and_then(Extrema::of_slice)
            .unwrap_or(Extrema::new(0.0, 0.0));

        debug!(?extents, min = extrema.min, max = extrema.max, "loaded field");

        Ok(Self {
            data,
            extents,
            strides: row_major_strides(&extents),
            extrema,
        })
    }

    /// Number of samples along `axis`.
    #[inline]
    pub fn length_along(&self, axis: Axis) -> usize {
        self.extents[axis.ordinal()]
    }

    #[inline]
    pub fn extents(&self) -> MultiIndex {
        self.extents
    }

    /// Distance in the flat buffer between neighbouring samples along `axis`.
    #[inline]
    pub fn stride(&self, axis: Axis) -> usize {
        self.strides[axis.ordinal()]
    }

    /// Extremum over the entire buffer, computed at construction.
    #[inline]
    pub fn extrema(&self) -> Extrema {
        self.extrema
    }

    /// Returns the flat row-major offset of `index`.
    ///
    /// Returns [`SliceError::IndexOutOfRange`] for the first axis whose index is
    /// not in `[0, extent)`.
    pub fn offset(&self, index: MultiIndex) -> Result<usize> {
        for axis in Axis::ALL {
            let (i, extent) = (index[axis.ordinal()], self.extents[axis.ordinal()]);
            if i >= extent {
                return Err(SliceError::IndexOutOfRange {
                    axis,
                    index: i,
                    extent,
                });
            }
        }
        Ok(self.offset_unchecked(index))
    }

    #[inline]
    pub(crate) fn offset_unchecked(&self, index: MultiIndex) -> usize {
        index
            .iter()
            .zip(self.strides.iter())
            .map(|(i, s)| i * s)
            .sum()
    }

    /// Returns the sample at `(i0, i1, i2, i3)`.
    pub fn get(&self, i0: usize, i1: usize, i2: usize, i3: usize) -> Result<Value> {
        self.at([i0, i1, i2, i3])
    }

    /// Returns the sample at `index`.
    pub fn at(&self, index: MultiIndex) -> Result<Value> {
        let offset = self.offset(index)?;
        Ok(self.buffer()[offset])
    }

    /// The flat row-major buffer.
    #[inline]
    pub fn buffer(&self) -> &[Value] {
        // Built by `from_shape_vec` with the default layout, so always contiguous.
        self.data
            .as_slice()
            .unwrap_or_default()
    }

    pub fn view(&self) -> ArrayView4<'_, Value> {
        self.data.view()
    }
}

/// Product of `extents`, `None` on overflow.
pub(crate) fn element_count(extents: &MultiIndex) -> Option<usize> {
    extents.iter().try_fold(1usize, |acc, &e| acc.checked_mul(e))
}

fn row_major_strides(extents: &MultiIndex) -> MultiIndex {
    let mut strides = [1; RANK];
    for k in (0..RANK - 1).rev() {
        strides[k] = strides[k + 1] * extents[k + 1];
    }
    strides
}
