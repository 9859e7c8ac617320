use derive_more::Display;
use nalgebra::{Point3, Vector3};

use crate::error::{Result, SliceError};

/// Coordinate or field sample as supplied by the host buffers.
pub type Value = f64;

/// A renderer-space position, each component in `[0, 1]`.
pub type Point = Point3<f32>;

/// A renderer-space vector (used for normals).
pub type Vector = Vector3<f32>;

/// Byte-valued color triple.
pub type Rgb = [u8; 3];

/// Number of axes indexing the field.
pub const RANK: usize = 4;

/// Ordinal of one of the four field axes.
///
/// Construct with [`Axis::new`]; the ordinal is always in `0..RANK`.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("axis {_0}")]
pub struct Axis(usize);

impl Axis {
    /// All four axes in ordinal order.
    pub const ALL: [Axis; RANK] = [Axis(0), Axis(1), Axis(2), Axis(3)];

    /// Returns the axis with the given ordinal.
    ///
    /// Returns [`SliceError::InvalidAxis`] if `ordinal >= 4`.
    pub fn new(ordinal: usize) -> Result<Self> {
        if ordinal < RANK {
            Ok(Self(ordinal))
        } else {
            Err(SliceError::InvalidAxis(ordinal))
        }
    }

    #[inline]
    pub fn ordinal(self) -> usize {
        self.0
    }
}

impl TryFrom<usize> for Axis {
    type Error = SliceError;

    fn try_from(ordinal: usize) -> Result<Self> {
        Axis::new(ordinal)
    }
}

/// A full multi-index into the 4D field, one entry per axis ordinal.
pub type MultiIndex = [usize; RANK];
