//! CubeView3D: a small OpenGL viewer that flies a camera around a cube.
//!
//! The library holds everything that does not need a window: the draw-submission backend and the
//! shader and mesh wrappers built on it (`abs`), the free-fly [`camera::Camera`], per-frame
//! [`input`], [`config`] loading and the [`scene::CubeScene`] that ties them together.

pub mod abs;
pub mod camera;
pub mod config;
pub mod input;
pub mod scene;
