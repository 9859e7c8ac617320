use derive_more::Display;

use crate::types::{Axis, Value};

pub type Result<T> = core::result::Result<T, SliceError>;

#[derive(Debug, Display, Clone, PartialEq)]
pub enum SliceError {
    /// Field buffer length does not match the product of the axis extents.
    #[display("shape mismatch: extents {extents:?} need {expected} values, buffer holds {actual}")]
    ShapeMismatch {
        extents: Vec<usize>,
        expected: usize,
        actual: usize,
    },
    #[display("index {index} out of range for {axis} (extent {extent})")]
    IndexOutOfRange {
        axis: Axis,
        index: usize,
        extent: usize,
    },
    /// Both displayed axes name the same ordinal.
    #[display("{_0} selected twice as a displayed axis")]
    DuplicateAxis(Axis),
    #[display("{value} is not a coordinate of {axis}")]
    ValueNotFound { axis: Axis, value: Value },
    #[display("no axis with ordinal {_0}")]
    InvalidAxis(usize),
    #[display("{_0} has no coordinates")]
    EmptyAxis(Axis),
    /// Coordinates must be real numbers: no NaN, no infinities.
    #[display("coordinate {position} of {axis} is not finite")]
    NonFinite { axis: Axis, position: usize },
    /// Coordinates must be strictly increasing or strictly decreasing.
    #[display("coordinates of {axis} are not strictly monotonic at position {position}")]
    NonMonotonic { axis: Axis, position: usize },
    #[display("unknown colormap {_0:?}")]
    UnknownColormap(String),
}

impl std::error::Error for SliceError {}
