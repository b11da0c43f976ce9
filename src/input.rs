//! Per-frame input state consumed by the camera.
//!
//! The window layer samples the device once per frame and fills an [`InputSample`]. Everything
//! here is level-triggered: a field says whether a key or button is held right now.

use glam::Vec2;

/// Held state of the camera controls for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSample {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub ascend: bool,
    pub descend: bool,
    /// Modifier that switches the camera to its fast speed.
    pub sprint: bool,
    /// Mouse-look button.
    pub look: bool,
    /// Cursor position in window coordinates.
    pub cursor: Vec2,
}

/// What the window layer should do with the cursor after an input update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CursorControl {
    /// Show the cursor and leave it where it is.
    Free,
    /// Hide the cursor and move it to `warp_to`.
    Grab { warp_to: Vec2 },
}
