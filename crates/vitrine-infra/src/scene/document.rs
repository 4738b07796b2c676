// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Turns a parsed glTF document into flat, world-space scene meshes.

use base64::Engine;
use gltf::Buffer;
use vitrine_core::math::{LinearRgba, Mat4, Vec3};
use vitrine_core::scene::{SceneContent, SceneMesh};

const DATA_URI_PREFIXES: [&str; 2] = [
    "data:application/octet-stream;base64,",
    "data:application/gltf-buffer;base64,",
];

/// Where the bytes of one glTF buffer come from.
#[derive(Debug)]
pub(crate) enum BufferSource {
    /// Embedded in the GLB binary chunk or a data URI.
    Ready(Vec<u8>),
    /// A URI relative to the document, fetched by the caller.
    External(String),
}

/// Decodes a base64 buffer data URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, String> {
    let payload = DATA_URI_PREFIXES
        .iter()
        .find_map(|prefix| uri.strip_prefix(prefix))
        .ok_or_else(|| format!("Unsupported data URI format: {}", truncate(uri)))?;
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| format!("Invalid base64 buffer: {e}"))
}

fn truncate(uri: &str) -> &str {
    uri.get(..48).unwrap_or(uri)
}

/// Resolves embedded buffers and lists the external ones in document order.
pub(crate) fn buffer_sources(gltf: &gltf::Gltf) -> Result<Vec<BufferSource>, String> {
    gltf.buffers()
        .map(|buffer| match buffer.source() {
            gltf::buffer::Source::Bin => gltf
                .blob
                .as_deref()
                .map(|blob| BufferSource::Ready(blob.to_vec()))
                .ok_or_else(|| "GLB file references binary chunk but it is missing".to_string()),
            gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => {
                decode_data_uri(uri).map(BufferSource::Ready)
            }
            gltf::buffer::Source::Uri(uri) => Ok(BufferSource::External(uri.to_string())),
        })
        .collect()
}

/// Walks the default scene (or the first one) and bakes every triangle
/// primitive into world space.
///
/// Documents without scenes contribute each mesh once with an identity
/// transform. Non-triangle primitives are skipped.
pub fn build_content(gltf: &gltf::Document, buffers: &[Vec<u8>]) -> Result<SceneContent, String> {
    let mut meshes = Vec::new();
    match gltf.default_scene().or_else(|| gltf.scenes().next()) {
        Some(scene) => {
            for node in scene.nodes() {
                visit_node(&node, &Mat4::IDENTITY, buffers, &mut meshes)?;
            }
        }
        None => {
            for mesh in gltf.meshes() {
                append_mesh(&mesh, &Mat4::IDENTITY, buffers, &mut meshes)?;
            }
        }
    }
    Ok(SceneContent::from_meshes(meshes))
}

fn visit_node(
    node: &gltf::Node<'_>,
    parent: &Mat4,
    buffers: &[Vec<u8>],
    out: &mut Vec<SceneMesh>,
) -> Result<(), String> {
    let world = *parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        append_mesh(&mesh, &world, buffers, out)?;
    }
    for child in node.children() {
        visit_node(&child, &world, buffers, out)?;
    }
    Ok(())
}

fn append_mesh(
    mesh: &gltf::Mesh<'_>,
    world: &Mat4,
    buffers: &[Vec<u8>],
    out: &mut Vec<SceneMesh>,
) -> Result<(), String> {
    let label = mesh.name().unwrap_or("<unnamed>");
    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::debug!(
                "Skipping {:?} primitive of mesh '{label}'",
                primitive.mode()
            );
            continue;
        }

        let reader =
            primitive.reader(|buffer: Buffer<'_>| buffers.get(buffer.index()).map(Vec::as_slice));
        let positions: Vec<Vec3> = reader
            .read_positions()
            .ok_or_else(|| format!("Mesh '{label}' has a primitive without positions"))?
            .map(|[x, y, z]| world.transform_point(Vec3::new(x, y, z)))
            .collect();
        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(format!("Mesh '{label}' index {bad} is out of range"));
        }
        let normals = match reader.read_normals() {
            Some(normals) => normals
                .map(|[x, y, z]| world.transform_vector(Vec3::new(x, y, z)).normalize())
                .collect(),
            None => smooth_normals(&positions, &indices),
        };
        let [r, g, b, a] = primitive
            .material()
            .pbr_metallic_roughness()
            .base_color_factor();

        out.push(SceneMesh {
            positions,
            normals,
            indices,
            base_color: LinearRgba::new(r, g, b, a),
        });
    }
    Ok(())
}

/// Area-weighted vertex normals for meshes that ship without them.
fn smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        for i in [a, b, c] {
            normals[i] = normals[i] + face;
        }
    }
    normals
        .into_iter()
        .map(|n| if n.length_squared() > 0.0 { n.normalize() } else { Vec3::Z })
        .collect()
}
