use rayon::prelude::*;
use tracing::debug;

use crate::{
    array::{NdArray, element_count},
    catalog::AxisCatalog,
    error::{Result, SliceError},
    selector::AxisSelection,
    types::{Axis, Value},
};

/// One cell of a [`SliceGrid`]: the raw field value and the free-axis
/// coordinates used to reach it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceCell {
    pub value: Value,
    /// Coordinate along the row axis (`free.a`).
    pub row_coordinate: Value,
    /// Coordinate along the column axis (`free.b`).
    pub col_coordinate: Value,
}

/// Raw field values over the two free axes, fixed axes held constant.
///
/// Sized `extent(free.a) × extent(free.b)`. Cells are stored row-major with
/// the row index `p` (along `free.a`) outer and `q` (along `free.b`) inner,
/// so cell `(p, q)` lives at `p * cols + q`. Mesh topology relies on this order.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceGrid {
    selection: AxisSelection,
    rows: usize,
    cols: usize,
    values: Vec<Value>,
    row_coordinates: Vec<Value>,
    col_coordinates: Vec<Value>,
}

impl SliceGrid {
    /// Extracts the slice described by `selection`.
    ///
    /// Returns [`SliceError::ShapeMismatch`] if `catalog` does not describe
    /// `array`, and [`SliceError::IndexOutOfRange`] if a fixed index is past its
    /// axis extent.
    pub fn extract(array: &NdArray, catalog: &AxisCatalog, selection: &AxisSelection) -> Result<Self> {
        check_catalog(array, catalog)?;
        let (a, b) = selection.free();
        let (rows, cols) = (array.length_along(a), array.length_along(b));
        let mut grid = Self {
            selection: *selection,
            rows,
            cols,
            values: vec![0.0; rows * cols],
            row_coordinates: catalog.coordinates(a).to_vec(),
            col_coordinates: catalog.coordinates(b).to_vec(),
        };
        grid.fill(array, selection)?;
        Ok(grid)
    }

    /// Re-reads the field values for new fixed indices, reusing the allocation.
    ///
    /// If `selection` displays a different free pair than this grid, the grid is
    /// rebuilt with [`extract`](SliceGrid::extract) instead. On error the grid is
    /// left unchanged.
    pub fn refresh(
        &mut self,
        array: &NdArray,
        catalog: &AxisCatalog,
        selection: &AxisSelection,
    ) -> Result<()> {
        if selection.free() != self.selection.free() {
            *self = Self::extract(array, catalog, selection)?;
            return Ok(());
        }
        self.fill(array, selection)
    }

    fn fill(&mut self, array: &NdArray, selection: &AxisSelection) -> Result<()> {
        let (a, b) = selection.free();
        // The far corner has every index at its maximum, so checking it bounds the whole slice.
        let base = array.offset(selection.multi_index(0, 0))?;
        array.offset(selection.multi_index(self.rows - 1, self.cols - 1))?;

        let (stride_a, stride_b) = (array.stride(a), array.stride(b));
        let buffer = array.buffer();
        self.values
            .par_chunks_mut(self.cols)
            .enumerate()
            .for_each(|(p, row)| {
                let row_base = base + p * stride_a;
                for (q, cell) in row.iter_mut().enumerate() {
                    *cell = buffer[row_base + q * stride_b];
                }
            });

        self.selection = *selection;
        debug!(rows = self.rows, cols = self.cols, fixed = ?selection.fixed(), "extracted slice");
        Ok(())
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The selection this grid was extracted with.
    #[inline]
    pub fn selection(&self) -> &AxisSelection {
        &self.selection
    }

    /// Free axes as `(row axis, column axis)`.
    #[inline]
    pub fn axes(&self) -> (Axis, Axis) {
        self.selection.free()
    }

    /// Raw field values in row-major order.
    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[inline]
    pub fn row_coordinates(&self) -> &[Value] {
        &self.row_coordinates
    }

    #[inline]
    pub fn col_coordinates(&self) -> &[Value] {
        &self.col_coordinates
    }

    pub fn value(&self, p: usize, q: usize) -> Option<Value> {
        (p < self.rows && q < self.cols).then(|| self.values[p * self.cols + q])
    }

    pub fn cell(&self, p: usize, q: usize) -> Option<SliceCell> {
        Some(SliceCell {
            value: self.value(p, q)?,
            row_coordinate: self.row_coordinates[p],
            col_coordinate: self.col_coordinates[q],
        })
    }
}

pub(crate) fn check_catalog(array: &NdArray, catalog: &AxisCatalog) -> Result<()> {
    if catalog.extents() != array.extents() {
        let extents = catalog.extents();
        return Err(SliceError::ShapeMismatch {
            extents: extents.to_vec(),
            expected: element_count(&extents).unwrap_or(usize::MAX),
            actual: array.buffer().len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MultiIndex;

    fn axis(i: usize) -> Axis {
        Axis::new(i).unwrap()
    }

    fn fixture(extents: MultiIndex) -> (NdArray, AxisCatalog) {
        let n = extents.iter().product::<usize>();
        // Non-uniform coordinates: k^2 along each axis.
        let coords = |e: usize| (0..e).map(|k| (k * k) as Value).collect::<Vec<_>>();
        let catalog = AxisCatalog::gpd(
            coords(extents[0]),
            coords(extents[1]),
            coords(extents[2]),
            coords(extents[3]),
        )
        .unwrap();
        let array = NdArray::new((0..n).map(|v| (v * 3 + 1) as Value).collect(), extents).unwrap();
        (array, catalog)
    }

    #[test]
    fn cells_match_get_for_all_pairs_and_fixed_indices() {
        let (array, catalog) = fixture([2, 3, 4, 5]);
        for a in Axis::ALL {
            for b in Axis::ALL {
                if a == b {
                    continue;
                }
                let base = AxisSelection::new(a, b).unwrap();
                let ((c, _), (d, _)) = base.fixed();
                for ic in 0..array.length_along(c) {
                    for id in 0..array.length_along(d) {
                        let sel = base.with_fixed_indices([ic, id]);
                        let grid = SliceGrid::extract(&array, &catalog, &sel).unwrap();
                        assert_eq!(grid.rows(), array.length_along(a));
                        assert_eq!(grid.cols(), array.length_along(b));
                        for p in 0..grid.rows() {
                            for q in 0..grid.cols() {
                                let expected = array.at(sel.multi_index(p, q)).unwrap();
                                assert_eq!(grid.value(p, q), Some(expected));
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn cell_carries_free_axis_coordinates() {
        let (array, catalog) = fixture([2, 3, 4, 5]);
        let sel = AxisSelection::new(axis(3), axis(1)).unwrap();
        let grid = SliceGrid::extract(&array, &catalog, &sel).unwrap();
        let cell = grid.cell(4, 2).unwrap();
        assert_eq!(cell.row_coordinate, 16.0);
        assert_eq!(cell.col_coordinate, 4.0);
        assert_eq!(cell.value, array.get(0, 2, 0, 4).unwrap());
        assert!(grid.cell(5, 0).is_none());
    }

    #[test]
    fn refresh_keeps_allocation_for_same_pair() {
        let (array, catalog) = fixture([2, 3, 4, 5]);
        let sel = AxisSelection::new(axis(0), axis(1)).unwrap();
        let mut grid = SliceGrid::extract(&array, &catalog, &sel).unwrap();
        let ptr = grid.values().as_ptr();

        let moved = sel.with_fixed_indices([3, 4]);
        grid.refresh(&array, &catalog, &moved).unwrap();
        assert_eq!(grid.values().as_ptr(), ptr);
        assert_eq!(grid.value(1, 2), Some(array.get(1, 2, 3, 4).unwrap()));

        let swapped = AxisSelection::new(axis(2), axis(3)).unwrap();
        grid.refresh(&array, &catalog, &swapped).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (4, 5));
    }

    #[test]
    fn out_of_range_fixed_index_leaves_grid_unchanged() {
        let (array, catalog) = fixture([2, 3, 4, 5]);
        let sel = AxisSelection::new(axis(0), axis(1)).unwrap();
        let mut grid = SliceGrid::extract(&array, &catalog, &sel).unwrap();
        let before = grid.clone();
        let bad = sel.with_fixed_indices([4, 0]);
        assert!(matches!(
            grid.refresh(&array, &catalog, &bad),
            Err(SliceError::IndexOutOfRange { index: 4, extent: 4, .. })
        ));
        assert_eq!(grid, before);
    }

    #[test]
    fn catalog_must_describe_array() {
        let (array, _) = fixture([2, 3, 4, 5]);
        let (_, other) = fixture([2, 3, 4, 6]);
        let sel = AxisSelection::new(axis(0), axis(1)).unwrap();
        assert!(matches!(
            SliceGrid::extract(&array, &other, &sel),
            Err(SliceError::ShapeMismatch { .. })
        ));
    }
}
