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

use vitrine_core::math::Vec3;
use vitrine_core::scene::{SceneContent, SceneMesh};
use wgpu::util::DeviceExt;

/// Interleaved vertex layout consumed by `scene.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub(super) struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Builds the interleaved vertices of one mesh. Missing normals default to +Z.
pub(super) fn interleave(mesh: &SceneMesh) -> Vec<Vertex> {
    let color = [
        mesh.base_color.r,
        mesh.base_color.g,
        mesh.base_color.b,
        mesh.base_color.a,
    ];
    mesh.positions
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let n = mesh.normals.get(i).copied().unwrap_or(Vec3::Z);
            Vertex {
                position: [p.x, p.y, p.z],
                normal: [n.x, n.y, n.z],
                color,
            }
        })
        .collect()
}

/// One mesh uploaded to the GPU.
#[derive(Debug)]
pub(super) struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, label: &str, mesh: &SceneMesh) -> Option<Self> {
        if mesh.positions.is_empty() || mesh.indices.is_empty() {
            return None;
        }
        let vertices = interleave(mesh);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} vertices")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} indices")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Some(Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        })
    }
}

/// Uploads every drawable mesh of a scene.
pub(super) fn upload_scene(device: &wgpu::Device, label: &str, content: &SceneContent) -> Vec<GpuMesh> {
    let meshes: Vec<GpuMesh> = content
        .meshes
        .iter()
        .filter_map(|mesh| GpuMesh::upload(device, label, mesh))
        .collect();
    log::debug!("Uploaded {} meshes for scene '{label}'", meshes.len());
    meshes
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::math::LinearRgba;

    #[test]
    fn interleave_fills_missing_normals_and_copies_color() {
        let mesh = SceneMesh {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            normals: vec![Vec3::Y],
            indices: vec![0, 1, 2],
            base_color: LinearRgba::rgb(0.5, 0.25, 1.0),
        };
        let vertices = interleave(&mesh);
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[0].normal, [0.0, 1.0, 0.0]);
        assert_eq!(vertices[2].normal, [0.0, 0.0, 1.0]);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[1].color, [0.5, 0.25, 1.0, 1.0]);
    }

    #[test]
    fn vertex_stride_matches_shader_layout() {
        assert_eq!(Vertex::layout().array_stride, 40);
    }
}
