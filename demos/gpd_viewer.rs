//! Interactive viewer for a synthetic GPD field.
//!
//! ```text
//! Q / W        cycle the first / second displayed axis
//! ← / →        move the first slider
//! ↓ / ↑        move the second slider
//! C            cycle the colormap
//! ```
use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use bevy_infinite_grid::{InfiniteGridBundle, InfiniteGridPlugin, InfiniteGridSettings};
use bevy_panorbit_camera::{PanOrbitCamera, PanOrbitCameraPlugin};
use gpd_slice::{
    Colormap, FixedSlot, SliceView, SliceViewPlugin, ViewConfig, plugin::SliceSurface,
    types::Value,
};

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins,
            SliceViewPlugin::default(),
            PanOrbitCameraPlugin,
            InfiniteGridPlugin,
        ))
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            handle_input.before(gpd_slice::plugin::SliceViewSet::Refresh),
        )
        .run();
}

fn linspace(start: Value, end: Value, n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| start + (end - start) * i as Value / (n - 1) as Value)
        .collect()
}

/// A smooth stand-in for a GPD over `(x, xi, t, Q2)`, laid out row-major.
fn synthetic_field() -> (Vec<Value>, [Vec<Value>; 4]) {
    let x = linspace(0.05, 0.95, 37);
    let xi = linspace(0.0, 0.5, 21);
    let t = linspace(-1.0, -0.1, 16);
    let q2: Vec<Value> = linspace(0.0, 2.0, 9).into_iter().map(|e| 10f64.powf(e)).collect();

    let mut field = Vec::with_capacity(x.len() * xi.len() * t.len() * q2.len());
    for &x in &x {
        for &xi in &xi {
            for &t in &t {
                for &q2 in &q2 {
                    let forward = (1.0 - x).powi(3) / x.sqrt();
                    let skewness = 1.0 - 0.6 * xi * xi / (x * x + xi * xi + 0.01);
                    let profile = (1.2 * (1.0 - x) * t).exp();
                    let evolution = 1.0 + 0.08 * q2.ln() * (0.5 - x);
                    field.push(forward * skewness * profile * evolution);
                }
            }
        }
    }
    (field, [x, xi, t, q2])
}

fn setup(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn(InfiniteGridBundle {
        settings: InfiniteGridSettings {
            fadeout_distance: 100.0,
            ..Default::default()
        },
        ..Default::default()
    });

    commands.spawn((
        Camera3d::default(),
        PanOrbitCamera::default(),
        Transform::from_xyz(2.0, 5.0, 7.0).looking_at(Vec3::new(2.0, 1.0, -2.0), Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: light_consts::lux::FULL_DAYLIGHT,
            ..Default::default()
        },
        Transform::from_xyz(1.0, 1.0, 1.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let (field, axes) = synthetic_field();
    let view = match SliceView::from_buffers(field, axes, ViewConfig::default()) {
        Ok(view) => view,
        Err(err) => {
            error!("could not build slice view: {err}");
            return;
        }
    };
    info!("displaying {:?}", view.selection().free());

    commands.spawn((
        SliceSurface::new(view),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            metallic: 0.1,
            perceptual_roughness: 0.5,
            double_sided: true,
            cull_mode: None,
            ..Default::default()
        })),
        // Surface z is the field value; stand it up along Bevy's +Y.
        Transform::from_rotation(Quat::from_rotation_x(-FRAC_PI_2)).with_scale(Vec3::splat(4.0)),
    ));
}

fn handle_input(keys: Res<ButtonInput<KeyCode>>, mut surfaces: Query<&mut SliceSurface>) {
    for mut surface in surfaces.iter_mut() {
        let view = &mut surface.view;
        let mut changed = true;

        if keys.just_pressed(KeyCode::KeyQ) {
            cycle_free(view, false);
        } else if keys.just_pressed(KeyCode::KeyW) {
            cycle_free(view, true);
        } else if keys.just_pressed(KeyCode::ArrowRight) {
            step_slider(view, FixedSlot::First, 1);
        } else if keys.just_pressed(KeyCode::ArrowLeft) {
            step_slider(view, FixedSlot::First, -1);
        } else if keys.just_pressed(KeyCode::ArrowUp) {
            step_slider(view, FixedSlot::Second, 1);
        } else if keys.just_pressed(KeyCode::ArrowDown) {
            step_slider(view, FixedSlot::Second, -1);
        } else if keys.just_pressed(KeyCode::KeyC) {
            let all = Colormap::ALL;
            let next = all.iter().position(|&c| c == view.colormap()).map_or(0, |i| (i + 1) % all.len());
            view.set_colormap(all[next]);
        } else {
            changed = false;
        }

        if changed {
            let catalog = view.catalog();
            let ((c, _), (d, _)) = view.selection().fixed();
            let (a, b) = view.selection().free();
            info!(
                "showing {} x {} | {} = {} | {} = {} | {}",
                catalog.name(a),
                catalog.name(b),
                catalog.name(c),
                view.fixed_value(FixedSlot::First),
                catalog.name(d),
                view.fixed_value(FixedSlot::Second),
                view.colormap(),
            );
        }
    }
}

fn cycle_free(view: &mut SliceView, second: bool) {
    let (a, b) = view.selection().free();
    let current = if second { b } else { a };
    let Ok(next) = gpd_slice::Axis::new((current.ordinal() + 1) % 4) else {
        return;
    };
    let result = if second {
        view.set_free(a, next)
    } else {
        view.set_free(next, b)
    };
    if let Err(err) = result {
        warn!("please select two different axes: {err}");
    }
}

fn step_slider(view: &mut SliceView, slot: FixedSlot, delta: isize) {
    let (_, index) = view.selection().fixed_slot(slot);
    let snap_points = view.slider_values(slot);
    let next = (index as isize + delta).clamp(0, snap_points.len() as isize - 1) as usize;
    let value = snap_points[next];
    if let Err(err) = view.set_fixed_value(slot, value) {
        warn!("slider rejected {value}: {err}");
    }
}
