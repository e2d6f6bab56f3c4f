//! GPU mesh upload.

use std::sync::Arc;

use roomview_rhi::RhiResult;
use roomview_rhi::buffer::{Buffer, BufferUsage};
use roomview_rhi::device::Device;
use roomview_rhi::vertex::Vertex;
use roomview_scene::MeshData;

/// Vertex and index buffers for one mesh.
pub struct GpuMesh {
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    index_count: u32,
}

impl GpuMesh {
    /// Interleaves the mesh arrays into [`Vertex`] layout and uploads both
    /// buffers.
    pub fn upload(device: Arc<Device>, mesh: &MeshData) -> RhiResult<Self> {
        let vertices = interleave(mesh);

        let vertex_buffer = Buffer::new_with_data(
            device.clone(),
            BufferUsage::Vertex,
            bytemuck::cast_slice(&vertices),
        )?;

        let index_buffer = Buffer::new_with_data(
            device,
            BufferUsage::Index,
            bytemuck::cast_slice(&mesh.indices),
        )?;

        Ok(Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        })
    }

    /// Vertex buffer.
    #[inline]
    pub fn vertex_buffer(&self) -> &Buffer {
        &self.vertex_buffer
    }

    /// Index buffer.
    #[inline]
    pub fn index_buffer(&self) -> &Buffer {
        &self.index_buffer
    }

    /// Number of indices to draw.
    #[inline]
    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

/// Combines the per-attribute arrays into the interleaved vertex layout the
/// pipelines consume.
pub fn interleave(mesh: &MeshData) -> Vec<Vertex> {
    (0..mesh.positions.len())
        .map(|i| Vertex::new(mesh.positions[i], mesh.normals[i], mesh.tex_coords[i]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomview_scene::primitive::cuboid;

    #[test]
    fn test_interleave_preserves_attributes() {
        let mesh = cuboid(2.0, 1.0, 0.5);
        let vertices = interleave(&mesh);

        assert_eq!(vertices.len(), mesh.positions.len());
        for (vertex, i) in vertices.iter().zip(0..) {
            assert_eq!(vertex.position, mesh.positions[i]);
            assert_eq!(vertex.normal, mesh.normals[i]);
            assert_eq!(vertex.tex_coord, mesh.tex_coords[i]);
        }
    }
}
