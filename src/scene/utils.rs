use crate::core::geometry::Vertex;
use nalgebra::Vector3;

/// Generates per-vertex tangents from positions and UVs.
///
/// Each triangle's tangent (the object-space direction of increasing U) is
/// accumulated onto its three vertices, then every vertex tangent is
/// Gram-Schmidt orthogonalised against that vertex's normal. Vertices whose
/// triangles have degenerate UVs get an arbitrary tangent perpendicular to the
/// normal.
pub fn compute_tangents(vertices: &mut [Vertex], triangles: &[[u32; 3]]) {
    let mut accum = vec![Vector3::<f32>::zeros(); vertices.len()];

    for tri in triangles {
        let [i0, i1, i2] = tri.map(|i| i as usize);
        if i0 >= vertices.len() || i1 >= vertices.len() || i2 >= vertices.len() {
            continue;
        }
        let (v0, v1, v2) = (&vertices[i0], &vertices[i1], &vertices[i2]);

        let edge1 = v1.position - v0.position;
        let edge2 = v2.position - v0.position;
        let duv1 = v1.uv - v0.uv;
        let duv2 = v2.uv - v0.uv;

        let det = duv1.x * duv2.y - duv2.x * duv1.y;
        if det.abs() < 1e-8 {
            continue;
        }
        let tangent = (edge1 * duv2.y - edge2 * duv1.y) / det;

        accum[i0] += tangent;
        accum[i1] += tangent;
        accum[i2] += tangent;
    }

    for (vertex, t) in vertices.iter_mut().zip(accum) {
        let n = vertex.normal;
        let orthogonal = t - n * n.dot(&t);
        vertex.tangent = orthogonal
            .try_normalize(1e-6)
            .unwrap_or_else(|| any_perpendicular(&n));
    }
}

fn any_perpendicular(n: &Vector3<f32>) -> Vector3<f32> {
    let helper = if n.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    n.cross(&helper).try_normalize(1e-6).unwrap_or_else(Vector3::x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector2};

    #[test]
    fn tangent_follows_u_direction() {
        let n = Vector3::new(0.0, 0.0, -1.0);
        let mut vertices = vec![
            Vertex::new(Point3::new(0.0, 0.0, 0.0), n, Vector2::new(0.0, 1.0)),
            Vertex::new(Point3::new(0.0, 1.0, 0.0), n, Vector2::new(0.0, 0.0)),
            Vertex::new(Point3::new(1.0, 0.0, 0.0), n, Vector2::new(1.0, 1.0)),
        ];
        compute_tangents(&mut vertices, &[[0, 1, 2]]);

        for v in &vertices {
            assert!((v.tangent - Vector3::x()).norm() < 1e-5);
        }
    }

    #[test]
    fn degenerate_uvs_still_yield_unit_perpendicular_tangent() {
        let n = Vector3::y();
        let mut vertices = vec![
            Vertex::new(Point3::new(0.0, 0.0, 0.0), n, Vector2::zeros()),
            Vertex::new(Point3::new(1.0, 0.0, 0.0), n, Vector2::zeros()),
            Vertex::new(Point3::new(0.0, 0.0, 1.0), n, Vector2::zeros()),
        ];
        compute_tangents(&mut vertices, &[[0, 1, 2]]);

        for v in &vertices {
            assert!((v.tangent.norm() - 1.0).abs() < 1e-5);
            assert!(v.tangent.dot(&n).abs() < 1e-5);
        }
    }
}
