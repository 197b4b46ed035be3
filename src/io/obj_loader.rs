use crate::core::geometry::Vertex;
use crate::error::ResourceLoadError;
use crate::scene::mesh::{Mesh, PrimitiveTopology};
use crate::scene::utils::compute_tangents;
use log::{info, warn};
use nalgebra::{Point3, Vector2, Vector3};
use std::path::Path;

/// Loads an OBJ file and returns a unified triangle-list Mesh.
///
/// OBJ files are right-handed with counter-clockwise front faces and a
/// bottom-left UV origin. They are converted on load: z is mirrored (which
/// also makes front faces clockwise) and v is flipped to a top-left origin.
/// Tangents are generated from the UVs.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, ResourceLoadError> {
    let path_obj = path.as_ref();
    info!("Loading OBJ file: {:?}", path_obj);

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true, // Unifies indices for Position/Normal/UV
        ..Default::default()
    };

    let (models, _materials) =
        tobj::load_obj(path_obj, &load_options).map_err(|source| ResourceLoadError::Obj {
            path: path_obj.to_path_buf(),
            source,
        })?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let mut index_offset = 0;

    // Sub-meshes are merged into one index space.
    for model in models {
        let mesh = &model.mesh;
        let num_vertices = mesh.positions.len() / 3;

        let has_normals = !mesh.normals.is_empty();
        let has_texcoords = !mesh.texcoords.is_empty();
        if !has_normals {
            warn!(
                "Mesh '{}' is missing normals. Using face normals.",
                model.name
            );
        }

        for i in 0..num_vertices {
            let position = Point3::new(
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                -mesh.positions[i * 3 + 2],
            );
            let normal = if has_normals {
                Vector3::new(
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    -mesh.normals[i * 3 + 2],
                )
            } else {
                Vector3::zeros()
            };
            let uv = if has_texcoords {
                Vector2::new(mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1])
            } else {
                Vector2::zeros()
            };

            vertices.push(Vertex::new(position, normal, uv));
        }

        indices.extend(mesh.indices.iter().map(|index| index + index_offset));
        index_offset += num_vertices as u32;
    }

    if indices.len() < 3 {
        return Err(ResourceLoadError::EmptyMesh(path_obj.to_path_buf()));
    }

    let triangles: Vec<[u32; 3]> = indices
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();

    fill_missing_normals(&mut vertices, &triangles);
    compute_tangents(&mut vertices, &triangles);

    info!(
        "OBJ loaded successfully. Total vertices: {}, Total triangles: {}",
        vertices.len(),
        triangles.len()
    );

    Ok(Mesh::new(vertices, indices, PrimitiveTopology::TriangleList))
}

/// Gives vertices without a normal the average of their faces' normals.
fn fill_missing_normals(vertices: &mut [Vertex], triangles: &[[u32; 3]]) {
    if vertices.iter().all(|v| v.normal != Vector3::zeros()) {
        return;
    }

    let mut accum = vec![Vector3::<f32>::zeros(); vertices.len()];
    for tri in triangles {
        let [a, b, c] = tri.map(|i| i as usize);
        let (Some(va), Some(vb), Some(vc)) = (vertices.get(a), vertices.get(b), vertices.get(c))
        else {
            continue;
        };
        let face = (vb.position - va.position).cross(&(vc.position - va.position));
        accum[a] += face;
        accum[b] += face;
        accum[c] += face;
    }

    for (vertex, n) in vertices.iter_mut().zip(accum) {
        if vertex.normal == Vector3::zeros() {
            vertex.normal = n.try_normalize(1e-8).unwrap_or_else(Vector3::y);
        }
    }
}
