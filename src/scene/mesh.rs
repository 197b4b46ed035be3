use crate::core::geometry::Vertex;
use crate::core::math::transform::TransformFactory;
use nalgebra::{Matrix4, Point3, Vector2, Vector3};

/// How the index buffer is grouped into triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimitiveTopology {
    /// Every 3 indices form one triangle.
    #[default]
    TriangleList,
    /// Each index after the second forms a triangle with the two before it.
    TriangleStrip,
}

/// A collection of vertices and indices representing a 3D object.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// List of vertices.
    pub vertices: Vec<Vertex>,
    /// Index buffer, interpreted according to `topology`.
    pub indices: Vec<u32>,
    pub topology: PrimitiveTopology,

    // --- World Transform (composed as translation * rotation * scale) ---
    pub scale: Matrix4<f32>,
    pub rotation: Matrix4<f32>,
    pub translation: Matrix4<f32>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>, topology: PrimitiveTopology) -> Self {
        Self {
            vertices,
            indices,
            topology,
            scale: Matrix4::identity(),
            rotation: Matrix4::identity(),
            translation: Matrix4::identity(),
        }
    }

    /// Object-to-world matrix.
    pub fn world(&self) -> Matrix4<f32> {
        self.translation * self.rotation * self.scale
    }

    pub fn set_translation(&mut self, offset: &Vector3<f32>) {
        self.translation = TransformFactory::translation(offset);
    }

    pub fn set_scale(&mut self, scale: &Vector3<f32>) {
        self.scale = TransformFactory::scaling_nonuniform(scale);
    }

    /// Adds `angle_rad` of rotation about the world Y axis.
    pub fn rotate_y(&mut self, angle_rad: f32) {
        self.rotation = TransformFactory::rotation_y(angle_rad) * self.rotation;
    }

    /// Number of triangles the topology yields, degenerate strip triangles included.
    pub fn triangle_count(&self) -> usize {
        match self.topology {
            PrimitiveTopology::TriangleList => self.indices.len() / 3,
            PrimitiveTopology::TriangleStrip => self.indices.len().saturating_sub(2),
        }
    }

    /// Iterates the triangles as index triples with front-face winding.
    ///
    /// Strip triangles at odd positions have their last two indices swapped so
    /// every triangle keeps the strip's winding; strip triangles that repeat an
    /// index (used to stitch strips together) are skipped.
    pub fn triangles(&self) -> Box<dyn Iterator<Item = [u32; 3]> + '_> {
        match self.topology {
            PrimitiveTopology::TriangleList => Box::new(
                self.indices
                    .chunks_exact(3)
                    .map(|c| [c[0], c[1], c[2]]),
            ),
            PrimitiveTopology::TriangleStrip => Box::new(
                self.indices
                    .windows(3)
                    .enumerate()
                    .map(|(i, w)| strip_triangle(i, [w[0], w[1], w[2]]))
                    .filter(|t| !is_degenerate(t)),
            ),
        }
    }

    /// Creates a simple triangle mesh for testing purposes.
    ///
    /// Wound clockwise as seen from a camera looking down +Z at it.
    pub fn create_test_triangle() -> Self {
        let normal = Vector3::new(0.0, 0.0, -1.0);
        let vertices = vec![
            Vertex::new(Point3::new(0.0, 0.5, 0.0), normal, Vector2::new(0.5, 0.0)), // Top
            Vertex::new(Point3::new(0.5, -0.5, 0.0), normal, Vector2::new(1.0, 1.0)), // Bottom Right
            Vertex::new(Point3::new(-0.5, -0.5, 0.0), normal, Vector2::new(0.0, 1.0)), // Bottom Left
        ];

        Self::new(vertices, vec![0, 1, 2], PrimitiveTopology::TriangleList)
    }

    /// A unit quad in the XY plane facing -Z, as a 4-index triangle strip.
    pub fn create_quad(half_size: f32) -> Self {
        let normal = Vector3::new(0.0, 0.0, -1.0);
        let tangent = Vector3::x();
        let s = half_size;
        let vertices = vec![
            Vertex::new(Point3::new(-s, s, 0.0), normal, Vector2::new(0.0, 0.0)),
            Vertex::new(Point3::new(s, s, 0.0), normal, Vector2::new(1.0, 0.0)),
            Vertex::new(Point3::new(-s, -s, 0.0), normal, Vector2::new(0.0, 1.0)),
            Vertex::new(Point3::new(s, -s, 0.0), normal, Vector2::new(1.0, 1.0)),
        ]
        .into_iter()
        .map(|v| v.with_tangent(tangent))
        .collect();

        Self::new(vertices, vec![0, 1, 2, 3], PrimitiveTopology::TriangleStrip)
    }
}

/// Effective winding of the strip triangle starting at `position`.
#[inline]
pub fn strip_triangle(position: usize, [a, b, c]: [u32; 3]) -> [u32; 3] {
    if position % 2 == 1 { [a, c, b] } else { [a, b, c] }
}

#[inline]
fn is_degenerate([a, b, c]: &[u32; 3]) -> bool {
    a == b || b == c || a == c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_yields_consecutive_triples() {
        let mut mesh = Mesh::create_test_triangle();
        mesh.indices = vec![0, 1, 2, 2, 1, 0, 7];
        let tris: Vec<_> = mesh.triangles().collect();
        assert_eq!(tris, vec![[0, 1, 2], [2, 1, 0]]);
    }

    #[test]
    fn strip_flips_odd_triangles_and_skips_degenerates() {
        let mut mesh = Mesh::create_quad(1.0);
        mesh.indices = vec![0, 1, 2, 3, 3, 4, 4, 5, 6];
        let tris: Vec<_> = mesh.triangles().collect();
        // positions 2..=5 repeat an index
        assert_eq!(tris, vec![[0, 1, 2], [1, 3, 2], [4, 5, 6]]);
        // the shared index buffer is untouched
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 3, 4, 4, 5, 6]);
        assert_eq!(mesh.triangle_count(), 7);
    }

    #[test]
    fn world_applies_scale_then_rotation_then_translation() {
        let mut mesh = Mesh::create_test_triangle();
        mesh.set_scale(&Vector3::repeat(2.0));
        mesh.rotate_y(std::f32::consts::FRAC_PI_2);
        mesh.set_translation(&Vector3::new(0.0, 0.0, 5.0));

        let p = mesh.world().transform_point(&Point3::new(0.0, 0.0, 1.0));
        // scaled to z = 2, turned onto +X, then pushed 5 along Z
        assert!((p - Point3::new(2.0, 0.0, 5.0)).norm() < 1e-5);
    }
}
