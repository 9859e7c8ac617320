use std::sync::Arc;

use tracing::{debug, debug_span};

use crate::{
    array::NdArray,
    catalog::AxisCatalog,
    colormap::Colormap,
    error::Result,
    mesh::MeshDescriptor,
    selector::{AxisSelection, DirtyFlags, FixedSlot, SliceSelector},
    slice::{SliceGrid, check_catalog},
    types::{Axis, RANK, Value},
};

/// Settings a [`SliceView`] starts from.
///
/// ```rust,ignore
/// let config = ViewConfig::default()
///     .with_colormap(Colormap::Hot)
///     .with_initial_free(Axis::new(0)?, Axis::new(2)?);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewConfig {
    /// Colormap used for vertex colors. Default: jet.
    pub colormap: Colormap,
    /// Axes displayed at startup. Default: `xi` and `Q2`, with `x` and `t` on sliders.
    pub initial_free: (Axis, Axis),
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            colormap: Colormap::default(),
            initial_free: (Axis::ALL[1], Axis::ALL[3]),
        }
    }
}

impl ViewConfig {
    pub fn with_colormap(mut self, colormap: Colormap) -> Self {
        self.colormap = colormap;
        self
    }

    pub fn with_initial_free(mut self, a: Axis, b: Axis) -> Self {
        self.initial_free = (a, b);
        self
    }
}

/// The slice pipeline for one field: selection state, extracted grid and mesh.
///
/// Setters only record what changed. [`update`](SliceView::update) does the
/// work, at most one geometry pass and one value pass per call:
///
/// ```text
/// set_free          →  geometry + value dirty  →  extract grid, x/y, z/color
/// set_fixed_index   →  value dirty             →  refill grid, z/color
/// set_colormap      →  value dirty             →  z/color
/// ```
///
/// The field and catalog are read-only and held behind [`Arc`] so several
/// views can share them.
#[derive(Debug, Clone)]
pub struct SliceView {
    array: Arc<NdArray>,
    catalog: Arc<AxisCatalog>,
    selector: SliceSelector,
    colormap: Colormap,
    grid: Option<SliceGrid>,
    mesh: MeshDescriptor,
}

impl SliceView {
    /// Returns [`SliceError::ShapeMismatch`](crate::error::SliceError::ShapeMismatch)
    /// if `catalog` does not describe `array`.
    pub fn new(array: Arc<NdArray>, catalog: Arc<AxisCatalog>, config: ViewConfig) -> Result<Self> {
        check_catalog(&array, &catalog)?;
        let (a, b) = config.initial_free;
        let selector = SliceSelector::new(array.extents(), (a, b))?;
        Ok(Self {
            array,
            catalog,
            selector,
            colormap: config.colormap,
            grid: None,
            mesh: MeshDescriptor::new_empty(),
        })
    }

    /// Builds a view over raw host buffers: the flat field and the four GPD
    /// coordinate sequences (`x`, `xi`, `t`, `Q2`).
    ///
    /// The field length must equal the product of the coordinate lengths.
    pub fn from_buffers(field: Vec<Value>, axes: [Vec<Value>; RANK], config: ViewConfig) -> Result<Self> {
        let [x, xi, t, q2] = axes;
        let catalog = AxisCatalog::gpd(x, xi, t, q2)?;
        let array = NdArray::new(field, catalog.extents())?;
        Self::new(Arc::new(array), Arc::new(catalog), config)
    }

    /// Runs whatever passes are pending and returns what was recomputed.
    pub fn update(&mut self) -> Result<DirtyFlags> {
        let dirty = self.selector.dirty();
        if !dirty.any() {
            return Ok(DirtyFlags::default());
        }
        let selection = *self.selector.selection();

        if dirty.geometry || self.grid.is_none() {
            let _span = debug_span!("geometry_pass").entered();
            let grid = SliceGrid::extract(&self.array, &self.catalog, &selection)?;
            self.mesh.update_geometry(&grid, &self.catalog);
            self.grid = Some(grid);
        } else if let Some(grid) = self.grid.as_mut() {
            let _span = debug_span!("value_pass").entered();
            grid.refresh(&self.array, &self.catalog, &selection)?;
        }

        if let Some(grid) = self.grid.as_ref() {
            self.mesh.update_values(grid, self.array.extrema(), self.colormap);
        }

        let done = self.selector.take_dirty();
        debug!(geometry = done.geometry, value = done.value, "slice view updated");
        Ok(done)
    }

    pub fn set_free(&mut self, a: Axis, b: Axis) -> Result<()> {
        self.selector.set_free(a, b)
    }

    pub fn set_fixed_index(&mut self, slot: FixedSlot, index: usize) -> Result<()> {
        self.selector.set_fixed_index(slot, index)
    }

    /// Moves a slider to the coordinate `value`, which must be one of
    /// [`slider_values`](SliceView::slider_values).
    pub fn set_fixed_value(&mut self, slot: FixedSlot, value: Value) -> Result<()> {
        let (axis, _) = self.selector.selection().fixed_slot(slot);
        let index = self.catalog.nearest_index(axis, value)?;
        self.selector.set_fixed_index(slot, index)
    }

    /// Installs a complete selection atomically, see [`SliceSelector::apply`].
    pub fn apply(&mut self, selection: AxisSelection) -> Result<()> {
        self.selector.apply(selection)
    }

    pub fn set_colormap(&mut self, colormap: Colormap) {
        if colormap != self.colormap {
            self.colormap = colormap;
            self.selector.invalidate_values();
        }
    }

    /// Valid snap points for the slider in `slot`, in coordinate order.
    pub fn slider_values(&self, slot: FixedSlot) -> &[Value] {
        let (axis, _) = self.selector.selection().fixed_slot(slot);
        self.catalog.coordinates(axis)
    }

    /// Current coordinate of the slider in `slot`.
    pub fn fixed_value(&self, slot: FixedSlot) -> Value {
        let (axis, index) = self.selector.selection().fixed_slot(slot);
        self.catalog.coordinates(axis)[index]
    }

    #[inline]
    pub fn selection(&self) -> &AxisSelection {
        self.selector.selection()
    }

    /// Work pending for the next [`update`](SliceView::update).
    #[inline]
    pub fn dirty(&self) -> DirtyFlags {
        self.selector.dirty()
    }

    #[inline]
    pub fn colormap(&self) -> Colormap {
        self.colormap
    }

    /// The mesh as of the last [`update`](SliceView::update).
    #[inline]
    pub fn mesh(&self) -> &MeshDescriptor {
        &self.mesh
    }

    /// The slice as of the last [`update`](SliceView::update).
    #[inline]
    pub fn grid(&self) -> Option<&SliceGrid> {
        self.grid.as_ref()
    }

    #[inline]
    pub fn array(&self) -> &Arc<NdArray> {
        &self.array
    }

    #[inline]
    pub fn catalog(&self) -> &Arc<AxisCatalog> {
        &self.catalog
    }
}
