use tracing::debug;

use crate::{
    error::{Result, SliceError},
    types::{Axis, MultiIndex},
};

/// Identifies one of the two fixed (slider) axes.
///
/// `First` is always the fixed axis with the lower ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedSlot {
    First,
    Second,
}

impl FixedSlot {
    pub const ALL: [FixedSlot; 2] = [FixedSlot::First, FixedSlot::Second];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            FixedSlot::First => 0,
            FixedSlot::Second => 1,
        }
    }
}

/// Which two axes are displayed and where the other two are held.
///
/// `free = (a, b)` maps `a` to grid rows and `b` to grid columns. The fixed
/// axes are the remaining two ordinals in ascending order, independent of the
/// order `a` and `b` were chosen in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSelection {
    free: (Axis, Axis),
    fixed: [(Axis, usize); 2],
}

impl AxisSelection {
    /// Displays `a` and `b`, with both fixed axes at index 0.
    ///
    /// Returns [`SliceError::DuplicateAxis`] if `a == b`.
    pub fn new(a: Axis, b: Axis) -> Result<Self> {
        if a == b {
            return Err(SliceError::DuplicateAxis(a));
        }
        let mut rest = Axis::ALL.into_iter().filter(|&axis| axis != a && axis != b);
        // Two distinct axes removed from four always leaves exactly two, already ascending.
        let (Some(c), Some(d)) = (rest.next(), rest.next()) else {
            unreachable!("four axes minus two distinct axes leaves two");
        };
        Ok(Self {
            free: (a, b),
            fixed: [(c, 0), (d, 0)],
        })
    }

    /// Replaces both fixed indices. Bounds are checked by [`SliceSelector::apply`].
    pub fn with_fixed_indices(mut self, indices: [usize; 2]) -> Self {
        self.fixed[0].1 = indices[0];
        self.fixed[1].1 = indices[1];
        self
    }

    #[inline]
    pub fn free(&self) -> (Axis, Axis) {
        self.free
    }

    #[inline]
    pub fn fixed(&self) -> ((Axis, usize), (Axis, usize)) {
        (self.fixed[0], self.fixed[1])
    }

    #[inline]
    pub fn fixed_slot(&self, slot: FixedSlot) -> (Axis, usize) {
        self.fixed[slot.index()]
    }

    /// The full multi-index reaching grid cell `(p, q)`.
    ///
    /// `p` lands at ordinal `free.a`, `q` at `free.b`, and the fixed indices at
    /// their own ordinals.
    #[inline]
    pub fn multi_index(&self, p: usize, q: usize) -> MultiIndex {
        let mut index = [0; 4];
        index[self.free.0.ordinal()] = p;
        index[self.free.1.ordinal()] = q;
        for (axis, i) in self.fixed {
            index[axis.ordinal()] = i;
        }
        index
    }

    fn check_fixed(&self, extents: &MultiIndex) -> Result<()> {
        for (axis, index) in self.fixed {
            let extent = extents[axis.ordinal()];
            if index >= extent {
                return Err(SliceError::IndexOutOfRange {
                    axis,
                    index,
                    extent,
                });
            }
        }
        Ok(())
    }
}

/// Recomputation work pending since the last [`SliceSelector::take_dirty`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyFlags {
    /// The free pair changed: grid shape and (x, y) positions are stale.
    pub geometry: bool,
    /// Fixed indices changed: heights and colors are stale.
    pub value: bool,
}

impl DirtyFlags {
    pub const ALL: DirtyFlags = DirtyFlags {
        geometry: true,
        value: true,
    };

    #[inline]
    pub fn any(&self) -> bool {
        self.geometry || self.value
    }
}

/// Interaction state for the current slice: single writer, validated setters.
///
/// Every setter either applies completely or returns an error and leaves the
/// selection untouched. A geometry change always implies a value change.
#[derive(Debug, Clone)]
pub struct SliceSelector {
    extents: MultiIndex,
    selection: AxisSelection,
    dirty: DirtyFlags,
}

impl SliceSelector {
    /// Starts with `free` displayed, both fixed indices at 0, and all work pending.
    pub fn new(extents: MultiIndex, free: (Axis, Axis)) -> Result<Self> {
        Ok(Self {
            extents,
            selection: AxisSelection::new(free.0, free.1)?,
            dirty: DirtyFlags::ALL,
        })
    }

    /// Displays axes `a` and `b` and resets both fixed indices to 0.
    pub fn set_free(&mut self, a: Axis, b: Axis) -> Result<()> {
        self.selection = AxisSelection::new(a, b)?;
        self.dirty = DirtyFlags::ALL;
        debug!(free = ?(a.ordinal(), b.ordinal()), "displayed axes changed");
        Ok(())
    }

    /// Moves the fixed axis in `slot` to `index`.
    ///
    /// Returns [`SliceError::IndexOutOfRange`] if `index` is past that axis's extent.
    pub fn set_fixed_index(&mut self, slot: FixedSlot, index: usize) -> Result<()> {
        let (axis, _) = self.selection.fixed_slot(slot);
        let extent = self.extents[axis.ordinal()];
        if index >= extent {
            return Err(SliceError::IndexOutOfRange {
                axis,
                index,
                extent,
            });
        }
        self.selection.fixed[slot.index()].1 = index;
        self.dirty.value = true;
        debug!(axis = axis.ordinal(), index, "fixed index changed");
        Ok(())
    }

    /// Installs a complete selection in one step.
    ///
    /// Only the work the change actually requires is marked dirty.
    pub fn apply(&mut self, selection: AxisSelection) -> Result<()> {
        selection.check_fixed(&self.extents)?;
        if selection.free != self.selection.free {
            self.dirty = DirtyFlags::ALL;
        } else if selection.fixed != self.selection.fixed {
            self.dirty.value = true;
        }
        self.selection = selection;
        Ok(())
    }

    #[inline]
    pub fn selection(&self) -> &AxisSelection {
        &self.selection
    }

    #[inline]
    pub fn free(&self) -> (Axis, Axis) {
        self.selection.free()
    }

    #[inline]
    pub fn fixed(&self) -> ((Axis, usize), (Axis, usize)) {
        self.selection.fixed()
    }

    #[inline]
    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// Returns the pending work and clears both flags.
    pub fn take_dirty(&mut self) -> DirtyFlags {
        std::mem::take(&mut self.dirty)
    }

    /// Marks heights and colors stale without touching the selection.
    pub fn invalidate_values(&mut self) {
        self.dirty.value = true;
    }
}
