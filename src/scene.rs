//! The cube scene.
//!
//! [`CubeScene`] owns everything the frame loop draws: the camera, the shader program and the cube
//! mesh. The window layer feeds it input and asks it to render once per frame.

use std::sync::Arc;

use glam::Mat4;

use crate::{
    abs::{Gpu, Mesh, ShaderProgram, Vertex},
    camera::Camera,
    config::{CameraConfig, Config, RenderConfig},
    input::{CursorControl, InputSample},
};

/// Position-only vertex. Attribute 0 is a `vec3`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubeVertex {
    pub position: [f32; 3],
}

impl Vertex for CubeVertex {
    fn vertex_attribs<G: Gpu>(gl: &G) {
        gl.vertex_attrib_f32(0, 3, std::mem::size_of::<CubeVertex>() as i32, 0);
    }
}

const fn v(x: f32, y: f32, z: f32) -> CubeVertex {
    CubeVertex {
        position: [x, y, z],
    }
}

/// Unit cube centred on the origin.
pub const CUBE_VERTICES: [CubeVertex; 8] = [
    // front
    v(-0.5, -0.5, 0.5),
    v(0.5, -0.5, 0.5),
    v(0.5, 0.5, 0.5),
    v(-0.5, 0.5, 0.5),
    // back
    v(-0.5, -0.5, -0.5),
    v(0.5, -0.5, -0.5),
    v(0.5, 0.5, -0.5),
    v(-0.5, 0.5, -0.5),
];

#[rustfmt::skip]
pub const CUBE_INDICES: [u32; 36] = [
    0, 1, 2, 2, 3, 0, // front
    4, 5, 6, 6, 7, 4, // back
    4, 0, 3, 3, 7, 4, // left
    1, 5, 6, 6, 2, 1, // right
    3, 2, 6, 6, 7, 3, // top
    4, 5, 1, 1, 0, 4, // bottom
];

pub struct CubeScene<G: Gpu> {
    gl: Arc<G>,
    pub camera: Camera,
    shader: ShaderProgram<G>,
    cube: Mesh<G>,
    lens: CameraConfig,
    render: RenderConfig,
}

impl<G: Gpu> CubeScene<G> {
    /// Builds the scene for a viewport of `width` x `height`.
    ///
    /// A shader that fails to load is logged and left unloaded; the scene still renders, just
    /// without a program bound. Only mesh creation failures are returned.
    pub fn new(gl: &Arc<G>, config: &Config, width: u32, height: u32) -> Result<Self, String> {
        let camera = Camera::with_settings(
            width,
            height,
            config.camera.start_position,
            config.camera.controls,
        );

        let mut shader = ShaderProgram::new(gl);
        let render = &config.render;
        match shader.load_from_file(
            &render.vertex_shader,
            &render.fragment_shader,
            render.geometry_shader.as_deref(),
        ) {
            Ok(()) => log::info!("loaded shaders from {:?}", render.vertex_shader.parent()),
            Err(e) => log::error!("{e}"),
        }

        let cube = Mesh::new(gl, &CUBE_VERTICES, &CUBE_INDICES, glow::TRIANGLES)?;

        Ok(Self {
            gl: Arc::clone(gl),
            camera,
            shader,
            cube,
            lens: config.camera.clone(),
            render: config.render.clone(),
        })
    }

    pub fn shader(&self) -> &ShaderProgram<G> {
        &self.shader
    }

    pub fn shader_mut(&mut self) -> &mut ShaderProgram<G> {
        &mut self.shader
    }

    /// Feeds one frame of input to the camera.
    pub fn update(&mut self, input: &InputSample) -> CursorControl {
        let control = self.camera.apply_input(input);
        log::trace!(
            "camera at ({:.3}, {:.3}, {:.3})",
            self.camera.position.x,
            self.camera.position.y,
            self.camera.position.z
        );
        control
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.gl.viewport(width as i32, height as i32);
        self.camera.set_viewport(width, height);
    }

    pub fn model(&self) -> Mat4 {
        Mat4::from_translation(self.render.cube_position)
    }

    pub fn camera_matrix(&self) -> Mat4 {
        self.camera
            .view_projection(self.lens.fov, self.lens.near, self.lens.far)
    }

    pub fn render(&self) {
        self.gl.clear(self.render.clear_color);

        self.shader.bind();
        self.shader.set_mat4("model", &self.model());
        self.shader.set_vec3("color", self.render.cube_color);
        self.shader.set_mat4("camMatrix", &self.camera_matrix());

        self.cube.draw();
    }
}
