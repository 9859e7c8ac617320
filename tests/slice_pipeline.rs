use std::sync::Arc;

use gpd_slice::{
    Axis, AxisCatalog, Colormap, FixedSlot, NdArray, SliceError, SliceView, ViewConfig,
    selector::DirtyFlags, types::Value,
};

fn axis(i: usize) -> Axis {
    Axis::new(i).unwrap()
}

/// Shape (2, 3, 2, 4) with every sample equal to its flat index.
fn iota_view(config: ViewConfig) -> SliceView {
    let field: Vec<Value> = (0..48).map(|v| v as Value).collect();
    let axes = [
        vec![0.0, 1.0],
        vec![-1.0, 0.0, 2.0],
        vec![0.5, 0.25],
        vec![1.0, 10.0, 100.0, 1000.0],
    ];
    SliceView::from_buffers(field, axes, config).unwrap()
}

fn grid_values(view: &SliceView) -> Vec<Value> {
    view.grid().unwrap().values().to_vec()
}

#[test]
fn end_to_end_axis_swap() {
    let mut view = iota_view(ViewConfig::default().with_initial_free(axis(0), axis(1)));
    assert_eq!(view.update().unwrap(), DirtyFlags::ALL);

    let grid = view.grid().unwrap();
    assert_eq!((grid.rows(), grid.cols()), (2, 3));
    assert_eq!(grid_values(&view), vec![0.0, 8.0, 16.0, 24.0, 32.0, 40.0]);

    view.set_fixed_index(FixedSlot::Second, 2).unwrap();
    view.update().unwrap();
    assert_eq!(grid_values(&view), vec![2.0, 10.0, 18.0, 26.0, 34.0, 42.0]);

    view.set_free(axis(1), axis(2)).unwrap();
    assert_eq!(view.selection().fixed(), ((axis(0), 0), (axis(3), 0)));
    view.update().unwrap();
    let grid = view.grid().unwrap();
    assert_eq!((grid.rows(), grid.cols()), (3, 2));
    assert_eq!(grid_values(&view), vec![0.0, 4.0, 8.0, 12.0, 16.0, 20.0]);
    assert_eq!(view.mesh().labels(), ["xi", "t", "GPD"]);
}

#[test]
fn passes_run_only_when_dirty() {
    let mut view = iota_view(ViewConfig::default());
    view.update().unwrap();
    assert_eq!(view.update().unwrap(), DirtyFlags::default());

    let xy: Vec<(f32, f32)> = view.mesh().positions.iter().map(|p| (p.x, p.y)).collect();
    view.set_fixed_index(FixedSlot::First, 1).unwrap();
    assert_eq!(
        view.update().unwrap(),
        DirtyFlags {
            geometry: false,
            value: true,
        }
    );
    let after: Vec<(f32, f32)> = view.mesh().positions.iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(xy, after);

    view.set_colormap(Colormap::Gray);
    assert_eq!(view.dirty(), DirtyFlags { geometry: false, value: true });
    view.update().unwrap();
    let z = view.mesh().positions[0].z as Value;
    assert_eq!(view.mesh().colors[0], Colormap::Gray.rgb(z));
}

#[test]
fn heights_use_whole_field_extrema() {
    let mut view = iota_view(ViewConfig::default().with_initial_free(axis(0), axis(1)));
    view.set_fixed_index(FixedSlot::First, 1).unwrap();
    view.set_fixed_index(FixedSlot::Second, 3).unwrap();
    view.update().unwrap();
    // last cell is the last sample of the whole buffer
    let last = view.mesh().positions.last().unwrap();
    assert_eq!(last.z, 1.0);
    let first = view.mesh().positions[0];
    assert!((first.z - 7.0 / 47.0).abs() < 1e-6);
}

#[test]
fn slider_values_and_lookup() {
    let mut view = iota_view(ViewConfig::default());
    // default displays xi and Q2, sliders on x and t
    assert_eq!(view.slider_values(FixedSlot::First), &[0.0, 1.0]);
    assert_eq!(view.slider_values(FixedSlot::Second), &[0.5, 0.25]);

    view.set_fixed_value(FixedSlot::Second, 0.25).unwrap();
    assert_eq!(view.selection().fixed_slot(FixedSlot::Second), (axis(2), 1));
    assert_eq!(view.fixed_value(FixedSlot::Second), 0.25);

    let before = *view.selection();
    assert_eq!(
        view.set_fixed_value(FixedSlot::First, 0.5),
        Err(SliceError::ValueNotFound {
            axis: axis(0),
            value: 0.5,
        })
    );
    assert_eq!(*view.selection(), before);
}

#[test]
fn rejections_leave_state_unchanged() {
    let mut view = iota_view(ViewConfig::default());
    view.update().unwrap();
    let selection = *view.selection();

    assert_eq!(view.set_free(axis(3), axis(3)), Err(SliceError::DuplicateAxis(axis(3))));
    assert!(matches!(
        view.set_fixed_index(FixedSlot::First, 2),
        Err(SliceError::IndexOutOfRange { index: 2, extent: 2, .. })
    ));
    assert_eq!(*view.selection(), selection);
    assert!(!view.dirty().any());
}

#[test]
fn construction_checks_shapes() {
    let err = SliceView::from_buffers(
        vec![0.0; 5],
        [vec![0.0, 1.0], vec![0.0], vec![0.0], vec![0.0, 1.0]],
        ViewConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SliceError::ShapeMismatch { expected: 4, actual: 5, .. }));

    let array = Arc::new(NdArray::new(vec![0.0; 4], [1, 1, 2, 2]).unwrap());
    let catalog = Arc::new(
        AxisCatalog::gpd(vec![0.0], vec![0.0], vec![0.0, 1.0], vec![0.0, 1.0, 2.0]).unwrap(),
    );
    assert!(matches!(
        SliceView::new(array, catalog, ViewConfig::default()),
        Err(SliceError::ShapeMismatch { .. })
    ));

    assert!(matches!(
        iota_view_result(ViewConfig::default().with_initial_free(axis(2), axis(2))),
        Err(SliceError::DuplicateAxis(_))
    ));
}

fn iota_view_result(config: ViewConfig) -> gpd_slice::Result<SliceView> {
    let field: Vec<Value> = (0..48).map(|v| v as Value).collect();
    SliceView::from_buffers(
        field,
        [vec![0.0, 1.0], vec![0.0, 1.0, 2.0], vec![0.0, 1.0], vec![0.0, 1.0, 2.0, 3.0]],
        config,
    )
}
