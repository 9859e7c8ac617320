use tracing::debug;

use crate::{
    error::{Result, SliceError},
    extremum::Extrema,
    types::{Axis, MultiIndex, RANK, Value},
};

/// Axis names of the GPD field, in ordinal order.
pub const GPD_AXIS_NAMES: [&str; RANK] = ["x", "xi", "t", "Q2"];

/// Label of the field value itself (the height axis of the surface).
pub const FIELD_LABEL: &str = "GPD";

/// One named axis and its coordinate values.
#[derive(Debug, Clone)]
pub struct AxisCoordinates {
    pub name: String,
    coordinates: Vec<Value>,
    extrema: Extrema,
}

impl AxisCoordinates {
    fn new(axis: Axis, name: impl Into<String>, coordinates: Vec<Value>) -> Result<Self> {
        let (Some(&first), Some(&last)) = (coordinates.first(), coordinates.last()) else {
            return Err(SliceError::EmptyAxis(axis));
        };

        if let Some(position) = coordinates.iter().position(|c| !c.is_finite()) {
            return Err(SliceError::NonFinite { axis, position });
        }

        let increasing = last >= first;
        if let Some(position) = coordinates
            .windows(2)
            .position(|w| if increasing { !(w[1] > w[0]) } else { !(w[1] < w[0]) })
        {
            return Err(SliceError::NonMonotonic {
                axis,
                position: position + 1,
            });
        }

        let extrema = Extrema::of(coordinates.iter().copied()).ok_or(SliceError::EmptyAxis(axis))?;
        Ok(Self {
            name: name.into(),
            coordinates,
            extrema,
        })
    }
}

/// The four named axes of the field and their coordinate sequences.
///
/// Coordinates are loaded once and never change, so per-axis extrema are
/// computed at construction and cached for the lifetime of the catalog.
#[derive(Debug, Clone)]
pub struct AxisCatalog {
    axes: [AxisCoordinates; RANK],
}

impl AxisCatalog {
    /// Builds a catalog from `(name, coordinates)` pairs in ordinal order.
    ///
    /// Each coordinate sequence must be non-empty and strictly monotonic.
    pub fn new(axes: [(String, Vec<Value>); RANK]) -> Result<Self> {
        let [a0, a1, a2, a3] = axes;
        let axes = [
            AxisCoordinates::new(Axis::ALL[0], a0.0, a0.1)?,
            AxisCoordinates::new(Axis::ALL[1], a1.0, a1.1)?,
            AxisCoordinates::new(Axis::ALL[2], a2.0, a2.1)?,
            AxisCoordinates::new(Axis::ALL[3], a3.0, a3.1)?,
        ];
        let catalog = Self { axes };
        debug!(extents = ?catalog.extents(), "built axis catalog");
        Ok(catalog)
    }

    /// Builds a catalog with the GPD axis names `x`, `xi`, `t`, `Q2`.
    pub fn gpd(x: Vec<Value>, xi: Vec<Value>, t: Vec<Value>, q2: Vec<Value>) -> Result<Self> {
        let [n0, n1, n2, n3] = GPD_AXIS_NAMES.map(String::from);
        Self::new([(n0, x), (n1, xi), (n2, t), (n3, q2)])
    }

    fn axis(&self, axis: Axis) -> &AxisCoordinates {
        &self.axes[axis.ordinal()]
    }

    pub fn name(&self, axis: Axis) -> &str {
        &self.axis(axis).name
    }

    /// Ordered coordinate values of `axis`; these are the only valid slider positions.
    pub fn coordinates(&self, axis: Axis) -> &[Value] {
        &self.axis(axis).coordinates
    }

    /// Index of the coordinate of `axis` exactly equal to `value`.
    ///
    /// Slider values are always drawn from [`coordinates`](AxisCatalog::coordinates),
    /// so no interpolation is attempted. Returns [`SliceError::ValueNotFound`]
    /// if there is no exact match.
    pub fn nearest_index(&self, axis: Axis, value: Value) -> Result<usize> {
        self.coordinates(axis)
            .iter()
            .position(|&c| c == value)
            .ok_or(SliceError::ValueNotFound { axis, value })
    }

    /// Cached `(min, max)` of the coordinates of `axis`.
    #[inline]
    pub fn extreme(&self, axis: Axis) -> Extrema {
        self.axis(axis).extrema
    }

    pub fn extent(&self, axis: Axis) -> usize {
        self.coordinates(axis).len()
    }

    /// Extents of all four axes in ordinal order.
    pub fn extents(&self) -> MultiIndex {
        Axis::ALL.map(|axis| self.extent(axis))
    }
}
