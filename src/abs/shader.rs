//! OpenGL Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for managing shaders on any
//! [`Gpu`] backend. This module also provides the [`Uniform`] trait for setting uniform variables
//! in shader programs.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use glam::{Mat4, Vec3};

use super::Gpu;

/// The pipeline stage a shader is compiled for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
}

impl ShaderStage {
    /// The OpenGL enum for this stage.
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
            ShaderStage::Geometry => glow::GEOMETRY_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Geometry => "geometry",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read shader source {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("shader program failed to link: {0}")]
    Link(String),
}

/// Represents an individual compiled shader stage. The stage object is deleted when dropped.
pub struct Shader<G: Gpu> {
    gl: Arc<G>,
    id: G::Shader,
    stage: ShaderStage,
}

impl<G: Gpu> Shader<G> {
    /// Compiles a new shader from the given source code.
    pub fn new(gl: &Arc<G>, stage: ShaderStage, source: &str) -> Result<Self, ShaderError> {
        let id = gl
            .compile_shader(stage, source)
            .map_err(|log| ShaderError::Compile { stage, log })?;

        Ok(Self {
            gl: Arc::clone(gl),
            id,
            stage,
        })
    }
}

impl<G: Gpu> Drop for Shader<G> {
    fn drop(&mut self) {
        log::trace!("deleting {} shader {:?}", self.stage, self.id);
        self.gl.delete_shader(self.id);
    }
}

/// Represents a uniform variable in a shader program.
pub trait Uniform {
    /// Uploads the value to the given uniform location of the bound program.
    fn set_uniform<G: Gpu>(&self, gl: &G, location: &G::UniformLocation);
}

impl Uniform for bool {
    fn set_uniform<G: Gpu>(&self, gl: &G, location: &G::UniformLocation) {
        gl.uniform_1_i32(location, *self as i32);
    }
}

impl Uniform for i32 {
    fn set_uniform<G: Gpu>(&self, gl: &G, location: &G::UniformLocation) {
        gl.uniform_1_i32(location, *self);
    }
}

impl Uniform for f32 {
    fn set_uniform<G: Gpu>(&self, gl: &G, location: &G::UniformLocation) {
        gl.uniform_1_f32(location, *self);
    }
}

impl Uniform for Vec3 {
    fn set_uniform<G: Gpu>(&self, gl: &G, location: &G::UniformLocation) {
        gl.uniform_3_f32(location, self.x, self.y, self.z);
    }
}

impl Uniform for Mat4 {
    fn set_uniform<G: Gpu>(&self, gl: &G, location: &G::UniformLocation) {
        gl.uniform_matrix_4_f32(location, &self.to_cols_array());
    }
}

impl<T: Uniform> Uniform for &T {
    fn set_uniform<G: Gpu>(&self, gl: &G, location: &G::UniformLocation) {
        (*self).set_uniform(gl, location);
    }
}

/// Represents a linked shader program.
///
/// A program starts out unloaded. It is (re)loaded with [`ShaderProgram::load_from_source`] or
/// [`ShaderProgram::load_from_file`] and released with [`ShaderProgram::clear`] or on drop.
/// Uniform setters on an unloaded program, or for names the program does not have, do nothing.
pub struct ShaderProgram<G: Gpu> {
    gl: Arc<G>,
    id: Option<G::Program>,
}

impl<G: Gpu> ShaderProgram<G> {
    /// Creates an unloaded shader program.
    pub fn new(gl: &Arc<G>) -> Self {
        Self {
            gl: Arc::clone(gl),
            id: None,
        }
    }

    /// Compiles and links a program from vertex, fragment and optional geometry source.
    ///
    /// Any previously loaded program is released first, so on failure the program is left
    /// unloaded.
    pub fn load_from_source(
        &mut self,
        vertex: &str,
        fragment: &str,
        geometry: Option<&str>,
    ) -> Result<(), ShaderError> {
        self.clear();

        let mut shaders = vec![
            Shader::new(&self.gl, ShaderStage::Vertex, vertex)?,
            Shader::new(&self.gl, ShaderStage::Fragment, fragment)?,
        ];
        if let Some(geometry) = geometry {
            shaders.push(Shader::new(&self.gl, ShaderStage::Geometry, geometry)?);
        }

        let ids: Vec<G::Shader> = shaders.iter().map(|shader| shader.id).collect();
        let program = self.gl.link_program(&ids).map_err(ShaderError::Link)?;
        log::debug!(
            "linked shader program {:?} from {} stages",
            program,
            shaders.len()
        );

        self.id = Some(program);
        Ok(())
    }

    /// Reads each stage from disk and loads the program with [`ShaderProgram::load_from_source`].
    pub fn load_from_file(
        &mut self,
        vertex: impl AsRef<Path>,
        fragment: impl AsRef<Path>,
        geometry: Option<&Path>,
    ) -> Result<(), ShaderError> {
        self.clear();

        let vertex = read_source(vertex.as_ref())?;
        let fragment = read_source(fragment.as_ref())?;
        let geometry = geometry.map(read_source).transpose()?;

        self.load_from_source(&vertex, &fragment, geometry.as_deref())
    }

    /// Binds the shader program for use. Unbinds any program if this one is not loaded.
    pub fn bind(&self) {
        self.gl.use_program(self.id);
    }

    /// Releases the program. Safe to call on an unloaded program.
    pub fn clear(&mut self) {
        if let Some(id) = self.id.take() {
            self.gl.delete_program(id);
            log::debug!("deleted shader program {:?}", id);
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.id.is_some()
    }

    /// The linked program, or `None` while unloaded.
    pub fn handle(&self) -> Option<G::Program> {
        self.id
    }

    /// Looks up a uniform location. `None` if the program is unloaded or the uniform is inactive.
    pub fn uniform_location(&self, name: &str) -> Option<G::UniformLocation> {
        self.gl.get_uniform_location(self.id?, name)
    }

    /// Sets a uniform variable in the shader program.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        if let Some(location) = self.uniform_location(name) {
            value.set_uniform(self.gl.as_ref(), &location);
        }
    }

    pub fn set_bool(&self, name: &str, value: bool) {
        self.set_uniform(name, value);
    }

    pub fn set_int(&self, name: &str, value: i32) {
        self.set_uniform(name, value);
    }

    pub fn set_float(&self, name: &str, value: f32) {
        self.set_uniform(name, value);
    }

    pub fn set_vec3(&self, name: &str, value: Vec3) {
        self.set_uniform(name, value);
    }

    pub fn set_mat4(&self, name: &str, value: &Mat4) {
        self.set_uniform(name, value);
    }
}

impl<G: Gpu> Drop for ShaderProgram<G> {
    fn drop(&mut self) {
        self.clear();
    }
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abs::backend::fake::{FakeGpu, FakeUniform};

    const VERTEX: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
uniform mat4 model;
uniform mat4 camMatrix;
void main() {
    gl_Position = camMatrix * model * vec4(aPos, 1.0);
}
";

    const FRAGMENT: &str = "#version 330 core
out vec4 FragColor;
uniform vec3 color;
uniform float brightness;
uniform int mode;
uniform bool wireframe;
void main() {
    FragColor = vec4(color * brightness, 1.0);
}
";

    fn loaded(gl: &Arc<FakeGpu>) -> ShaderProgram<FakeGpu> {
        let mut program = ShaderProgram::new(gl);
        program.load_from_source(VERTEX, FRAGMENT, None).unwrap();
        program
    }

    #[test]
    fn test_load_links_and_frees_stages() {
        let gl = Arc::new(FakeGpu::default());
        let program = loaded(&gl);
        assert!(program.is_loaded());
        let state = gl.state();
        assert_eq!(state.programs.len(), 1);
        assert!(state.shaders.is_empty());
    }

    #[test]
    fn test_invalid_source_leaves_program_unloaded() {
        let gl = Arc::new(FakeGpu::default());
        let mut program = ShaderProgram::new(&gl);
        let err = program
            .load_from_source("this is not glsl", FRAGMENT, None)
            .unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Compile {
                stage: ShaderStage::Vertex,
                ..
            }
        ));
        assert!(err.to_string().contains("main"));
        assert!(!program.is_loaded());
        assert_eq!(program.handle(), None);
        assert!(gl.state().shaders.is_empty());
    }

    #[test]
    fn test_link_failure_reports_log() {
        let gl = Arc::new(FakeGpu::default());
        let mut program = ShaderProgram::new(&gl);
        let clashing = FRAGMENT.replace("uniform float brightness;", "uniform vec3 model;");
        let err = program
            .load_from_source(VERTEX, &clashing, None)
            .unwrap_err();
        match err {
            ShaderError::Link(log) => assert!(log.contains("model")),
            other => panic!("expected link error, got {other}"),
        }
        assert_eq!(program.handle(), None);
    }

    #[test]
    fn test_geometry_stage_is_compiled() {
        let gl = Arc::new(FakeGpu::default());
        let mut program = ShaderProgram::new(&gl);
        let err = program
            .load_from_source(VERTEX, FRAGMENT, Some("layout(points) in;"))
            .unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Compile {
                stage: ShaderStage::Geometry,
                ..
            }
        ));
    }

    #[test]
    fn test_reload_releases_previous_program() {
        let gl = Arc::new(FakeGpu::default());
        let mut program = loaded(&gl);
        let first = program.handle().unwrap();
        program.load_from_source(VERTEX, FRAGMENT, None).unwrap();
        let state = gl.state();
        assert_eq!(state.deleted_programs, vec![first]);
        assert_eq!(state.programs.len(), 1);
        assert_ne!(program.handle(), Some(first));
    }

    #[test]
    fn test_clear_twice() {
        let gl = Arc::new(FakeGpu::default());
        let mut program = loaded(&gl);
        program.clear();
        assert_eq!(program.handle(), None);
        program.clear();
        assert_eq!(program.handle(), None);
        assert_eq!(gl.state().deleted_programs.len(), 1);
    }

    #[test]
    fn test_drop_releases_program() {
        let gl = Arc::new(FakeGpu::default());
        let program = loaded(&gl);
        drop(program);
        assert!(gl.state().programs.is_empty());
        assert_eq!(gl.state().deleted_programs.len(), 1);
    }

    #[test]
    fn test_bind() {
        let gl = Arc::new(FakeGpu::default());
        let program = loaded(&gl);
        program.bind();
        assert_eq!(gl.state().bound_program, program.handle());
    }

    #[test]
    fn test_typed_setters() {
        let gl = Arc::new(FakeGpu::default());
        let program = loaded(&gl);
        program.set_bool("wireframe", true);
        program.set_int("mode", 3);
        program.set_float("brightness", 0.5);
        program.set_vec3("color", Vec3::new(1.0, 0.0, 0.0));
        program.set_mat4("model", &Mat4::IDENTITY);

        let state = gl.state();
        assert_eq!(state.last_upload("wireframe"), Some(&FakeUniform::Int(1)));
        assert_eq!(state.last_upload("mode"), Some(&FakeUniform::Int(3)));
        assert_eq!(state.last_upload("brightness"), Some(&FakeUniform::Float(0.5)));
        assert_eq!(
            state.last_upload("color"),
            Some(&FakeUniform::Vec3([1.0, 0.0, 0.0]))
        );
        assert_eq!(
            state.last_upload("model"),
            Some(&FakeUniform::Mat4(Mat4::IDENTITY.to_cols_array()))
        );
    }

    #[test]
    fn test_missing_uniform_is_ignored() {
        let gl = Arc::new(FakeGpu::default());
        let program = loaded(&gl);
        assert!(program.uniform_location("doesNotExist").is_none());
        program.set_float("doesNotExist", 1.0);
        assert!(gl.state().uploads.is_empty());
    }

    #[test]
    fn test_unloaded_program_ignores_uniforms() {
        let gl = Arc::new(FakeGpu::default());
        let program = ShaderProgram::new(&gl);
        assert!(program.uniform_location("model").is_none());
        program.set_mat4("model", &Mat4::IDENTITY);
        assert!(gl.state().uploads.is_empty());
    }

    #[test]
    fn test_load_from_missing_file() {
        let gl = Arc::new(FakeGpu::default());
        let mut program = loaded(&gl);
        let err = program
            .load_from_file("/nonexistent/vertex.vert", "/nonexistent/fragment.frag", None)
            .unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
        assert_eq!(program.handle(), None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("cubeview3d-shader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let vert = dir.join("vertex.vert");
        let frag = dir.join("fragment.frag");
        std::fs::write(&vert, VERTEX).unwrap();
        std::fs::write(&frag, FRAGMENT).unwrap();

        let gl = Arc::new(FakeGpu::default());
        let mut program = ShaderProgram::new(&gl);
        program.load_from_file(&vert, &frag, None).unwrap();
        assert!(program.is_loaded());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
