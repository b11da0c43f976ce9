//! The draw-submission interface.
//!
//! Everything the renderer asks of the graphics API goes through the [`Gpu`] trait. The real
//! implementation forwards to [`glow::Context`]; tests use the recording backend in `fake`.

use glam::Vec4;
use glow::HasContext;

use super::shader::ShaderStage;

/// The subset of OpenGL used by shaders, meshes and the scene.
///
/// Method names follow their `glow` counterparts. Compile and link failures return the driver's
/// info log as the error.
pub trait Gpu {
    type Shader: Copy + std::fmt::Debug;
    type Program: Copy + PartialEq + std::fmt::Debug;
    type UniformLocation;
    type Buffer: Copy + std::fmt::Debug;
    type VertexArray: Copy + std::fmt::Debug;

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<Self::Shader, String>;
    fn delete_shader(&self, shader: Self::Shader);
    /// Links the given stages into a program. The stages are detached afterwards but not deleted.
    fn link_program(&self, shaders: &[Self::Shader]) -> Result<Self::Program, String>;
    fn delete_program(&self, program: Self::Program);
    fn use_program(&self, program: Option<Self::Program>);

    fn get_uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation>;
    fn uniform_1_i32(&self, location: &Self::UniformLocation, x: i32);
    fn uniform_1_f32(&self, location: &Self::UniformLocation, x: f32);
    fn uniform_3_f32(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32);
    fn uniform_matrix_4_f32(&self, location: &Self::UniformLocation, matrix: &[f32; 16]);

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    fn delete_vertex_array(&self, vao: Self::VertexArray);
    fn bind_vertex_array(&self, vao: Option<Self::VertexArray>);
    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn delete_buffer(&self, buffer: Self::Buffer);
    fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>);
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);
    /// Describes and enables a float vertex attribute on the bound vertex array.
    fn vertex_attrib_f32(&self, index: u32, size: i32, stride: i32, offset: i32);
    fn draw_elements_u32(&self, mode: u32, count: i32);

    /// Clears the colour and depth buffers.
    fn clear(&self, color: Vec4);
    fn enable_depth_test(&self);
    fn viewport(&self, width: i32, height: i32);
}

impl Gpu for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type UniformLocation = glow::UniformLocation;
    type Buffer = glow::Buffer;
    type VertexArray = glow::VertexArray;

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<Self::Shader, String> {
        unsafe {
            let shader = self.create_shader(stage.gl_enum())?;
            self.shader_source(shader, source);
            HasContext::compile_shader(self, shader);

            if !self.get_shader_compile_status(shader) {
                let log = self.get_shader_info_log(shader);
                HasContext::delete_shader(self, shader);
                return Err(log);
            }

            Ok(shader)
        }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe {
            HasContext::delete_shader(self, shader);
        }
    }

    fn link_program(&self, shaders: &[Self::Shader]) -> Result<Self::Program, String> {
        unsafe {
            let program = self.create_program()?;

            for shader in shaders {
                self.attach_shader(program, *shader);
            }

            HasContext::link_program(self, program);

            if !self.get_program_link_status(program) {
                let log = self.get_program_info_log(program);
                HasContext::delete_program(self, program);
                return Err(log);
            }

            for shader in shaders {
                self.detach_shader(program, *shader);
            }

            Ok(program)
        }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe {
            HasContext::delete_program(self, program);
        }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe {
            HasContext::use_program(self, program);
        }
    }

    fn get_uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { HasContext::get_uniform_location(self, program, name) }
    }

    fn uniform_1_i32(&self, location: &Self::UniformLocation, x: i32) {
        unsafe {
            HasContext::uniform_1_i32(self, Some(location), x);
        }
    }

    fn uniform_1_f32(&self, location: &Self::UniformLocation, x: f32) {
        unsafe {
            HasContext::uniform_1_f32(self, Some(location), x);
        }
    }

    fn uniform_3_f32(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32) {
        unsafe {
            HasContext::uniform_3_f32(self, Some(location), x, y, z);
        }
    }

    fn uniform_matrix_4_f32(&self, location: &Self::UniformLocation, matrix: &[f32; 16]) {
        unsafe {
            self.uniform_matrix_4_f32_slice(Some(location), false, matrix);
        }
    }

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String> {
        unsafe { HasContext::create_vertex_array(self) }
    }

    fn delete_vertex_array(&self, vao: Self::VertexArray) {
        unsafe {
            HasContext::delete_vertex_array(self, vao);
        }
    }

    fn bind_vertex_array(&self, vao: Option<Self::VertexArray>) {
        unsafe {
            HasContext::bind_vertex_array(self, vao);
        }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { HasContext::create_buffer(self) }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe {
            HasContext::delete_buffer(self, buffer);
        }
    }

    fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>) {
        unsafe {
            HasContext::bind_buffer(self, target, buffer);
        }
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        unsafe {
            self.buffer_data_u8_slice(target, data, usage);
        }
    }

    fn vertex_attrib_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        unsafe {
            self.vertex_attrib_pointer_f32(index, size, glow::FLOAT, false, stride, offset);
            self.enable_vertex_attrib_array(index);
        }
    }

    fn draw_elements_u32(&self, mode: u32, count: i32) {
        unsafe {
            self.draw_elements(mode, count, glow::UNSIGNED_INT, 0);
        }
    }

    fn clear(&self, color: Vec4) {
        unsafe {
            self.clear_color(color.x, color.y, color.z, color.w);
            HasContext::clear(self, glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn enable_depth_test(&self) {
        unsafe {
            self.enable(glow::DEPTH_TEST);
        }
    }

    fn viewport(&self, width: i32, height: i32) {
        unsafe {
            HasContext::viewport(self, 0, 0, width, height);
        }
    }
}
