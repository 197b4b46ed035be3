use crate::core::geometry::VertexOut;
use crate::core::math::transform::apply_perspective_division;
use crate::scene::camera::Camera;
use crate::scene::mesh::Mesh;
use nalgebra::{Matrix4, Vector3, Vector4};

/// Runs the vertex stage for one mesh: one `VertexOut` per input vertex,
/// index-aligned with `mesh.vertices`.
///
/// Positions go through `projection * view * world` and the perspective divide;
/// the clip-space w is kept in `position.w`. Normals and tangents are
/// transformed by the world matrix only. A vertex whose w is not positive keeps
/// its clip coordinates and is culled by the rasterizer.
pub fn transform_vertices(mesh: &Mesh, camera: &Camera) -> Vec<VertexOut> {
    let world = mesh.world();
    let wvp = camera.projection_matrix() * camera.view_matrix() * world;

    mesh.vertices
        .iter()
        .map(|vertex| {
            let clip = wvp * vertex.position.to_homogeneous();
            let position = match apply_perspective_division(&clip) {
                Some(ndc) => Vector4::new(ndc.x, ndc.y, ndc.z, clip.w),
                None => clip,
            };

            let world_pos = world.transform_point(&vertex.position);
            let view_direction = (world_pos - camera.origin)
                .try_normalize(1e-6)
                .unwrap_or_else(|| camera.forward);

            VertexOut {
                position,
                color: vertex.color,
                uv: vertex.uv,
                normal: transform_direction(&world, &vertex.normal),
                tangent: transform_direction(&world, &vertex.tangent),
                view_direction,
            }
        })
        .collect()
}

/// Transforms a direction by the world matrix and normalizes it.
/// Zero vectors (missing tangents) stay zero.
fn transform_direction(world: &Matrix4<f32>, v: &Vector3<f32>) -> Vector3<f32> {
    let t = world.transform_vector(v);
    t.try_normalize(1e-8).unwrap_or(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn keeps_clip_w_and_divides_xyz() {
        let camera = Camera::new(1.0, 90.0, Point3::new(0.0, 0.0, -2.0));
        let mut mesh = Mesh::create_test_triangle();
        mesh.set_translation(&Vector3::new(0.0, 0.0, 3.0));

        let out = transform_vertices(&mesh, &camera);
        assert_eq!(out.len(), 3);

        let top = &out[0];
        // view-space z: 3 - (-2) = 5
        assert!((top.position.w - 5.0).abs() < 1e-4);
        assert!((top.position.y - 0.5 / 5.0).abs() < 1e-4);
        assert!(top.position.x.abs() < 1e-5);
        assert!(top.position.z > 0.0 && top.position.z < 1.0);
    }

    #[test]
    fn normals_use_world_rotation_only() {
        let camera = Camera::new(1.0, 90.0, Point3::new(0.0, 0.0, -2.0));
        let mut mesh = Mesh::create_test_triangle();
        mesh.set_scale(&Vector3::repeat(3.0));
        mesh.rotate_y(std::f32::consts::FRAC_PI_2);

        let out = transform_vertices(&mesh, &camera);
        // -Z rotated a quarter turn about Y is -X; scale does not leak in.
        assert!((out[0].normal - Vector3::new(-1.0, 0.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn view_direction_points_from_camera_to_vertex() {
        let camera = Camera::new(1.0, 90.0, Point3::new(0.0, 0.5, -4.0));
        let mesh = Mesh::create_test_triangle();
        let out = transform_vertices(&mesh, &camera);
        assert!((out[0].view_direction - Vector3::z()).norm() < 1e-5);
    }

    #[test]
    fn vertex_color_passes_through() {
        let mut mesh = Mesh::create_test_triangle();
        let tint = Vector3::new(0.2, 0.4, 0.6);
        mesh.vertices = mesh.vertices.into_iter().map(|v| v.with_color(tint)).collect();
        let cam = Camera::new(1.0, 60.0, Point3::new(0.0, 0.0, -5.0));
        assert!(transform_vertices(&mesh, &cam).iter().all(|v| v.color == tint));
    }
}
