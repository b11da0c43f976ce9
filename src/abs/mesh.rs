//! Mesh management module.
//!
//! This module defines the [`Mesh`] struct for managing mesh data on the GPU side.
//! Vertices should implement the [`Vertex`] trait.

use std::sync::Arc;

use super::Gpu;

/// Trait that defines the necessary methods for a vertex.
pub trait Vertex {
    /// Sets up the vertex attribute pointers for the vertex.
    fn vertex_attribs<G: Gpu>(gl: &G);
}

/// Represents a static indexed mesh stored on the GPU side.
pub struct Mesh<G: Gpu> {
    gl: Arc<G>,
    draw_mode: u32,
    vao: G::VertexArray,
    vbo: G::Buffer,
    ebo: G::Buffer,
    index_count: usize,
}

impl<G: Gpu> Mesh<G> {
    /// Creates a new mesh from the given vertex and index data.
    pub fn new<V: Vertex>(
        gl: &Arc<G>,
        vertices: &[V],
        indices: &[u32],
        draw_mode: u32,
    ) -> Result<Self, String> {
        let vao = gl.create_vertex_array()?;
        let vbo = match gl.create_buffer() {
            Ok(vbo) => vbo,
            Err(e) => {
                gl.delete_vertex_array(vao);
                return Err(e);
            }
        };
        let ebo = match gl.create_buffer() {
            Ok(ebo) => ebo,
            Err(e) => {
                gl.delete_buffer(vbo);
                gl.delete_vertex_array(vao);
                return Err(e);
            }
        };

        gl.bind_vertex_array(Some(vao));
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        // SAFETY: vertex types are plain `#[repr(C)]` data, read only for the duration of the upload.
        let vertex_bytes = unsafe {
            std::slice::from_raw_parts(
                vertices.as_ptr() as *const u8,
                std::mem::size_of_val(vertices),
            )
        };
        gl.buffer_data(glow::ARRAY_BUFFER, vertex_bytes, glow::STATIC_DRAW);

        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
        let index_bytes: Vec<u8> = indices.iter().flat_map(|i| i.to_ne_bytes()).collect();
        gl.buffer_data(glow::ELEMENT_ARRAY_BUFFER, &index_bytes, glow::STATIC_DRAW);

        V::vertex_attribs(gl.as_ref());

        gl.bind_vertex_array(None);
        gl.bind_buffer(glow::ARRAY_BUFFER, None);
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

        log::debug!(
            "uploaded mesh: {} vertices, {} indices",
            vertices.len(),
            indices.len()
        );

        Ok(Self {
            gl: Arc::clone(gl),
            draw_mode,
            vao,
            vbo,
            ebo,
            index_count: indices.len(),
        })
    }

    /// Draws the mesh with whatever program is currently bound.
    pub fn draw(&self) {
        self.gl.bind_vertex_array(Some(self.vao));
        self.gl
            .draw_elements_u32(self.draw_mode, self.index_count as i32);
        self.gl.bind_vertex_array(None);
    }

    // Returns the amount of of indices used in the mesh
    pub fn index_count(&self) -> usize {
        self.index_count
    }
}

impl<G: Gpu> Drop for Mesh<G> {
    fn drop(&mut self) {
        self.gl.delete_buffer(self.vbo);
        self.gl.delete_buffer(self.ebo);
        self.gl.delete_vertex_array(self.vao);
    }
}
