pub mod array;
pub mod catalog;
pub mod colormap;
pub mod error;
pub mod extremum;
pub mod interp;
pub mod mesh;
#[cfg(feature = "plugin")]
pub mod plugin;
pub mod selector;
pub mod slice;
pub mod types;
pub mod view;

pub use array::NdArray;
pub use catalog::AxisCatalog;
pub use colormap::Colormap;
pub use error::{Result, SliceError};
pub use mesh::MeshDescriptor;
#[cfg(feature = "plugin")]
pub use plugin::SliceViewPlugin;
pub use selector::{AxisSelection, FixedSlot, SliceSelector};
pub use slice::SliceGrid;
pub use types::Axis;
pub use view::{SliceView, ViewConfig};
