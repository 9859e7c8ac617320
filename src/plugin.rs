use bevy::{
    asset::RenderAssetUsages,
    mesh::{Indices, PrimitiveTopology},
    prelude::*,
};

use crate::{mesh::MeshDescriptor, view::SliceView};

/// System sets for the slice surface pipeline.
///
/// Use these to order your own systems relative to mesh generation:
///
/// ```rust,ignore
/// // Move sliders before the refresh so the change shows up the same frame:
/// app.add_systems(Update, read_slider_input.before(SliceViewSet::Refresh));
/// ```
///
/// ```text
/// [your input systems]  →  SliceViewSet::Refresh  →  SliceViewSet::Upload
/// ```
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SliceViewSet {
    /// Runs pending geometry/value passes on dirty [`SliceSurface`]s.
    Refresh,
    /// Uploads refreshed [`MeshDescriptor`]s into a Bevy [`Mesh3d`].
    Upload,
}

/// A surface entity showing one slice of a 4D field.
///
/// Mutate the wrapped view (`set_free`, `set_fixed_index`, ...) from any system;
/// the plugin picks up the change on the next frame.
#[derive(Component)]
#[require(Transform)]
pub struct SliceSurface {
    pub view: SliceView,
}

impl SliceSurface {
    pub fn new(view: SliceView) -> Self {
        Self { view }
    }
}

/// Marker added to a [`SliceSurface`] whose mesh changed and still needs uploading.
#[derive(Component)]
pub struct RefreshedSurface;

/// Runtime configuration for the slice surface pipeline.
///
/// Inserted as a resource by [`SliceViewPlugin`].
#[derive(Resource)]
pub struct SliceViewConfig {
    /// Maximum number of surfaces refreshed per frame. Default: `4`.
    ///
    /// Surfaces past the budget stay dirty and are picked up on a later frame.
    pub max_refreshes_per_frame: usize,
}

impl Default for SliceViewConfig {
    fn default() -> Self {
        Self {
            max_refreshes_per_frame: 4,
        }
    }
}

/// Bevy plugin that keeps every [`SliceSurface`] mesh in sync with its view.
///
/// ```text
/// view setter called            (your systems)
///   → dirty flags set
///   → view.update()             (SliceViewSet::Refresh, only while dirty)
///   → RefreshedSurface inserted
///   → Mesh3d inserted           (SliceViewSet::Upload)
///   → RefreshedSurface removed
/// ```
pub struct SliceViewPlugin {
    /// Initial value for [`SliceViewConfig::max_refreshes_per_frame`].
    pub max_refreshes_per_frame: usize,
}

impl Default for SliceViewPlugin {
    fn default() -> Self {
        Self {
            max_refreshes_per_frame: SliceViewConfig::default().max_refreshes_per_frame,
        }
    }
}

impl Plugin for SliceViewPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SliceViewConfig {
            max_refreshes_per_frame: self.max_refreshes_per_frame,
        })
        .configure_sets(Update, (SliceViewSet::Refresh, SliceViewSet::Upload).chain())
        .add_systems(
            Update,
            (
                refresh_surfaces.in_set(SliceViewSet::Refresh),
                upload_surfaces.in_set(SliceViewSet::Upload),
            ),
        );
    }
}

/// Runs pending passes on dirty surfaces, up to [`SliceViewConfig::max_refreshes_per_frame`].
fn refresh_surfaces(
    mut commands: Commands,
    config: Res<SliceViewConfig>,
    mut query: Query<(Entity, &mut SliceSurface)>,
) {
    for (entity, mut surface) in query
        .iter_mut()
        .filter(|(_, surface)| surface.view.dirty().any())
        .take(config.max_refreshes_per_frame)
    {
        match surface.view.update() {
            Ok(_) => {
                commands.entity(entity).insert(RefreshedSurface);
            }
            Err(err) => tracing::warn!(%err, ?entity, "slice refresh failed"),
        }
    }
}

/// Uploads the refreshed [`MeshDescriptor`] of each surface into a new [`Mesh3d`].
fn upload_surfaces(
    mut commands: Commands,
    query: Query<(Entity, &SliceSurface), With<RefreshedSurface>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    for (entity, surface) in query.iter() {
        let mesh = to_bevy_mesh(surface.view.mesh());
        commands
            .entity(entity)
            .insert(Mesh3d(meshes.add(mesh)))
            .remove::<RefreshedSurface>();
    }
}

/// Converts a [`MeshDescriptor`] into an indexed triangle-list Bevy [`Mesh`]
/// with position, normal and vertex color attributes.
///
/// Colormap bytes are sRGB and are converted to the linear colors Bevy expects.
pub fn to_bevy_mesh(descriptor: &MeshDescriptor) -> Mesh {
    let positions: Vec<[f32; 3]> = descriptor.positions.iter().map(|p| [p.x, p.y, p.z]).collect();
    let normals: Vec<[f32; 3]> = descriptor.normals.iter().map(|n| [n.x, n.y, n.z]).collect();
    let colors: Vec<[f32; 4]> = descriptor
        .colors
        .iter()
        .map(|&[r, g, b]| {
            let c = LinearRgba::from(Color::srgb_u8(r, g, b));
            [c.red, c.green, c.blue, c.alpha]
        })
        .collect();
    let indices: Vec<u32> = descriptor.tris.iter().flatten().copied().collect();

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{types::Value, view::ViewConfig};

    #[test]
    fn bevy_mesh_matches_descriptor() {
        let field: Vec<Value> = (0..24).map(|v| v as Value).collect();
        let axes = [
            vec![0.0, 1.0],
            vec![0.0, 0.5, 1.0],
            vec![0.0, 1.0],
            vec![1.0, 2.0],
        ];
        let mut view = SliceView::from_buffers(field, axes, ViewConfig::default()).unwrap();
        view.update().unwrap();

        let mesh = to_bevy_mesh(view.mesh());
        // free axes xi (3) and Q2 (2): 6 vertices, 2 quads
        assert_eq!(mesh.count_vertices(), 6);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(12));
        assert!(mesh.attribute(Mesh::ATTRIBUTE_COLOR).is_some());
    }
}
