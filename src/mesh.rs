use crate::{
    catalog::{AxisCatalog, FIELD_LABEL},
    colormap::Colormap,
    extremum::Extrema,
    slice::SliceGrid,
    types::{Axis, Point, Rgb, Value, Vector},
};

/// Renderer-ready surface for one slice.
///
/// Vertex `p * cols + q` is grid cell `(p, q)`. Positions lie in `[0, 1]³`:
/// `x` is the normalized row-axis coordinate, `y` the normalized column-axis
/// coordinate and `z` the normalized field value. Colors run parallel to
/// positions.
///
/// The two halves are refreshed independently:
///
/// ```text
/// update_geometry  (free pair changed)     →  x, y, triangles, labels
/// update_values    (fixed indices changed) →  z, colors, normals
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MeshDescriptor {
    rows: usize,
    cols: usize,
    axes: Option<(Axis, Axis)>,
    axis_names: [String; 2],

    /// Vertex positions, `rows * cols` of them.
    pub positions: Vec<Point>,

    /// Vertex colors, parallel to `positions`.
    pub colors: Vec<Rgb>,

    /// Per-vertex unit normals, parallel to `positions`.
    pub normals: Vec<Vector>,

    /// Triangle index triples into `positions`, two per grid quad.
    pub tris: Vec<[u32; 3]>,
}

impl MeshDescriptor {
    /// Creates an empty descriptor with no vertices.
    pub fn new_empty() -> Self {
        Self {
            rows: 0,
            cols: 0,
            axes: None,
            axis_names: [String::new(), String::new()],
            positions: Vec::new(),
            colors: Vec::new(),
            normals: Vec::new(),
            tris: Vec::new(),
        }
    }

    /// Builds geometry and values for `grid` in one go.
    pub fn build(grid: &SliceGrid, catalog: &AxisCatalog, field: Extrema, colormap: Colormap) -> Self {
        let mut mesh = Self::new_empty();
        mesh.update_geometry(grid, catalog);
        mesh.update_values(grid, field, colormap);
        mesh
    }

    /// Recomputes the (x, y) positions, the triangle list and the axis labels.
    ///
    /// Resizes every vertex buffer to the grid. Heights, colors and normals are
    /// reset and must be refreshed with [`update_values`](MeshDescriptor::update_values).
    pub fn update_geometry(&mut self, grid: &SliceGrid, catalog: &AxisCatalog) {
        let (a, b) = grid.axes();
        let (rows, cols) = (grid.rows(), grid.cols());
        let (ea, eb) = (catalog.extreme(a), catalog.extreme(b));

        self.positions.clear();
        self.positions.reserve(rows * cols);
        for &row in grid.row_coordinates() {
            let x = ea.normalize(row) as f32;
            for &col in grid.col_coordinates() {
                self.positions.push(Point::new(x, eb.normalize(col) as f32, 0.0));
            }
        }

        self.colors.clear();
        self.colors.resize(rows * cols, [0; 3]);
        self.normals.clear();
        self.normals.resize(rows * cols, Vector::z());
        self.tris = grid_triangles(rows, cols);

        self.rows = rows;
        self.cols = cols;
        self.axes = Some((a, b));
        self.axis_names = [catalog.name(a).to_string(), catalog.name(b).to_string()];
    }

    /// Recomputes heights, colors and normals from the grid's raw values.
    ///
    /// `field` is the extremum over the whole field, so heights are comparable
    /// across slices.
    pub fn update_values(&mut self, grid: &SliceGrid, field: Extrema, colormap: Colormap) {
        debug_assert_eq!(grid.len(), self.positions.len(), "geometry is stale");
        for ((position, color), &raw) in self
            .positions
            .iter_mut()
            .zip(self.colors.iter_mut())
            .zip(grid.values())
        {
            let z: Value = field.normalize(raw);
            position.z = z as f32;
            *color = colormap.rgb(z);
        }
        self.create_normals();
    }

    /// Computes the face normal for triangle `tri`, scaled by twice its area.
    ///
    /// Returns the zero vector if the triangle is degenerate.
    pub fn tri_normal(&self, tri: usize) -> Vector {
        let [ia, ib, ic] = self.tris[tri];
        let va = self.positions[ia as usize];
        let vb = self.positions[ib as usize];
        let vc = self.positions[ic as usize];
        (vb - va).cross(&(vc - vb))
    }

    /// Recomputes per-vertex normals as the area-weighted mean of the adjacent faces.
    ///
    /// Vertices without a non-degenerate adjacent face point along +Z.
    pub fn create_normals(&mut self) {
        let mut sums = vec![Vector::zeros(); self.positions.len()];
        for tri in 0..self.tris.len() {
            let n = self.tri_normal(tri);
            for i in self.tris[tri] {
                sums[i as usize] += n;
            }
        }
        self.normals = sums
            .into_iter()
            .map(|n| n.try_normalize(f32::EPSILON).unwrap_or_else(Vector::z))
            .collect();
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Displayed axes as `(x axis, y axis)`, `None` before the first geometry pass.
    #[inline]
    pub fn axes(&self) -> Option<(Axis, Axis)> {
        self.axes
    }

    /// Labels for the x, y and z axes of the surface.
    pub fn labels(&self) -> [&str; 3] {
        [&self.axis_names[0], &self.axis_names[1], FIELD_LABEL]
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

impl Default for MeshDescriptor {
    fn default() -> Self {
        Self::new_empty()
    }
}

/// Two triangles per grid quad, counter-clockwise seen from +Z for increasing coordinates.
///
/// ```text
///  q+1  d----c
///       | \  |
///       |  \ |
///  q    a----b
///       p    p+1
/// ```
fn grid_triangles(rows: usize, cols: usize) -> Vec<[u32; 3]> {
    let vertex = |p: usize, q: usize| (p * cols + q) as u32;
    let mut tris = Vec::with_capacity(rows.saturating_sub(1) * cols.saturating_sub(1) * 2);
    for p in 0..rows.saturating_sub(1) {
        for q in 0..cols.saturating_sub(1) {
            let (a, b, c, d) = (vertex(p, q), vertex(p + 1, q), vertex(p + 1, q + 1), vertex(p, q + 1));
            tris.push([a, b, d]);
            tris.push([b, c, d]);
        }
    }
    tris
}
