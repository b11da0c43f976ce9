//! This module contains the renderer building blocks: the draw-submission backend,
//! shader management and mesh handling.

pub mod backend;
pub mod mesh;
pub mod shader;

pub use backend::*;
pub use mesh::*;
pub use shader::*;
