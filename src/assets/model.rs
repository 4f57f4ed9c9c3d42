//! glTF model import flattened into one indexed triangle mesh.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use std::path::Path;

use crate::error::AssetError;

/// Spacecraft mesh vertex (position, normal, texture coordinate)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Flattened model in its own coordinate space
#[derive(Debug, Clone, Default)]
pub struct ModelData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl ModelData {
    /// Triangle count
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append a primitive, offsetting its indices past existing vertices
    fn append(&mut self, vertices: Vec<MeshVertex>, indices: impl IntoIterator<Item = u32>) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(vertices);
        self.indices.extend(indices.into_iter().map(|i| i + base));
    }
}

/// Import a glTF file, baking node transforms into vertex positions.
///
/// Normals in the file are ignored and recomputed from the triangles. Only
/// triangle-list primitives with readable positions are kept; a document with
/// none (e.g. Draco-compressed geometry) is an error.
pub fn load_gltf(path: impl AsRef<Path>) -> Result<ModelData, AssetError> {
    let path = path.as_ref();
    let (document, buffers, _images) = gltf::import(path)?;

    let mut model = ModelData::default();

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next());
    match scene {
        Some(scene) => {
            for node in scene.nodes() {
                flatten_node(&node, Mat4::IDENTITY, &buffers, &mut model);
            }
        }
        None => {
            // No scene graph: take meshes as authored
            for mesh in document.meshes() {
                flatten_mesh(&mesh, Mat4::IDENTITY, &buffers, &mut model);
            }
        }
    }

    if model.indices.is_empty() {
        return Err(AssetError::EmptyModel(path.display().to_string()));
    }

    compute_normals(&mut model.vertices, &model.indices);

    log::info!(
        "Model {}: {} vertices, {} triangles",
        path.display(),
        model.vertices.len(),
        model.triangle_count()
    );

    Ok(model)
}

fn flatten_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    model: &mut ModelData,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        flatten_mesh(&mesh, world, buffers, model);
    }
    for child in node.children() {
        flatten_node(&child, world, buffers, model);
    }
}

fn flatten_mesh(
    mesh: &gltf::Mesh,
    transform: Mat4,
    buffers: &[gltf::buffer::Data],
    model: &mut ModelData,
) {
    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::debug!("Skipping non-triangle primitive in mesh {:?}", mesh.name());
            continue;
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|b| &b.0[..]));

        let Some(positions) = reader.read_positions() else {
            log::warn!("Primitive without readable positions in mesh {:?}", mesh.name());
            continue;
        };

        let mut vertices: Vec<MeshVertex> = positions
            .map(|p| MeshVertex {
                position: transform.transform_point3(Vec3::from_array(p)).to_array(),
                ..MeshVertex::default()
            })
            .collect();

        if let Some(uvs) = reader.read_tex_coords(0) {
            for (vertex, uv) in vertices.iter_mut().zip(uvs.into_f32()) {
                vertex.uv = uv;
            }
        }

        let count = vertices.len() as u32;
        match reader.read_indices() {
            Some(indices) => model.append(vertices, indices.into_u32()),
            None => model.append(vertices, 0..count),
        }
    }
}

/// Recompute smooth vertex normals from indexed triangles.
///
/// Face normals are accumulated unnormalized (so larger faces weigh more) and
/// then normalized per vertex. Vertices touched by no triangle get a zero
/// normal.
pub fn compute_normals(vertices: &mut [MeshVertex], indices: &[u32]) {
    let mut accumulated = vec![Vec3::ZERO; vertices.len()];

    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        if a >= vertices.len() || b >= vertices.len() || c >= vertices.len() {
            continue;
        }

        let pa = Vec3::from_array(vertices[a].position);
        let pb = Vec3::from_array(vertices[b].position);
        let pc = Vec3::from_array(vertices[c].position);
        let face = (pc - pb).cross(pa - pb);

        accumulated[a] += face;
        accumulated[b] += face;
        accumulated[c] += face;
    }

    for (vertex, normal) in vertices.iter_mut().zip(accumulated) {
        vertex.normal = normal.normalize_or_zero().to_array();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32, y: f32, z: f32) -> MeshVertex {
        MeshVertex {
            position: [x, y, z],
            ..MeshVertex::default()
        }
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 32);
    }

    #[test]
    fn test_counter_clockwise_triangle_faces_up() {
        // Counter-clockwise seen from +Y
        let mut vertices = vec![
            vertex(0.0, 0.0, 0.0),
            vertex(0.0, 0.0, 1.0),
            vertex(1.0, 0.0, 0.0),
        ];
        compute_normals(&mut vertices, &[0, 1, 2]);

        for v in &vertices {
            assert!((Vec3::from_array(v.normal) - Vec3::Y).length() < 1e-6);
        }
    }

    #[test]
    fn test_shared_vertex_averages_faces() {
        // Two faces folded along the z axis: one facing +Y, one facing +X
        let mut vertices = vec![
            vertex(0.0, 0.0, 0.0),
            vertex(0.0, 0.0, 1.0),
            vertex(1.0, 0.0, 0.0),
            vertex(0.0, 1.0, 0.0),
        ];
        compute_normals(&mut vertices, &[0, 1, 2, 0, 3, 1]);

        let shared = Vec3::from_array(vertices[0].normal);
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((shared - expected).length() < 1e-6);
        assert!((shared.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_unused_vertex_and_bad_indices() {
        let mut vertices = vec![
            vertex(0.0, 0.0, 0.0),
            vertex(0.0, 0.0, 1.0),
            vertex(1.0, 0.0, 0.0),
            vertex(5.0, 5.0, 5.0),
        ];
        // Out-of-range triangle is skipped
        compute_normals(&mut vertices, &[0, 1, 2, 0, 1, 99]);

        assert_eq!(vertices[3].normal, [0.0, 0.0, 0.0]);
        assert!((Vec3::from_array(vertices[0].normal) - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_append_offsets_indices() {
        let mut model = ModelData::default();
        model.append(vec![MeshVertex::default(); 3], [0, 1, 2]);
        model.append(vec![MeshVertex::default(); 3], [0, 2, 1]);

        assert_eq!(model.indices, vec![0, 1, 2, 3, 5, 4]);
        assert_eq!(model.triangle_count(), 2);
    }

    #[test]
    fn test_missing_model_is_error() {
        assert!(matches!(load_gltf("does/not/exist.gltf"), Err(AssetError::Gltf(_))));
    }
}
