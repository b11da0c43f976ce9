//! Free-fly camera.
//!
//! The camera keeps a position and a unit forward vector and turns them into a view-projection
//! matrix. [`Camera::apply_input`] moves it with the keyboard and turns it while the look button is
//! held, refusing pitch changes that would bring the view within 5 degrees of straight up or down.

use glam::{Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::input::{CursorControl, InputSample};

/// Closest the view may get to `up` (or its opposite), in degrees.
const POLE_MARGIN_DEG: f32 = 5.0;

/// Movement and look tuning. Speeds are in world units per frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub base_speed: f32,
    pub fast_speed: f32,
    /// Degrees turned when the cursor moves a full viewport away from the centre.
    pub sensitivity: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            base_speed: 0.005,
            fast_speed: 0.01,
            sensitivity: 20.0,
        }
    }
}

pub struct Camera {
    pub position: Vec3,
    orientation: Vec3,
    up: Vec3,
    width: u32,
    height: u32,
    speed: f32,
    settings: CameraSettings,
    first_look_sample: bool,
}

impl Camera {
    /// Creates a camera looking down -Z with +Y up.
    pub fn new(width: u32, height: u32, position: Vec3) -> Self {
        Self::with_settings(width, height, position, CameraSettings::default())
    }

    pub fn with_settings(width: u32, height: u32, position: Vec3, settings: CameraSettings) -> Self {
        Self {
            position,
            orientation: Vec3::NEG_Z,
            up: Vec3::Y,
            width,
            height,
            speed: settings.base_speed,
            settings,
            first_look_sample: true,
        }
    }

    pub fn orientation(&self) -> Vec3 {
        self.orientation
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Points the camera along `direction`. Zero-length directions are ignored.
    pub fn look_in(&mut self, direction: Vec3) {
        if let Some(direction) = direction.try_normalize() {
            self.orientation = direction;
        }
    }

    /// The current movement speed, either the base or the fast speed.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_first_look_sample(&self) -> bool {
        self.first_look_sample
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Updates the viewport size. Zero sizes (a minimised window) are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("ignoring empty viewport {width}x{height}");
            return;
        }
        self.width = width;
        self.height = height;
    }

    pub fn viewport_center(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) / 2.0
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.orientation, self.up)
    }

    pub fn projection(&self, fov_deg: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh_gl(fov_deg.to_radians(), self.aspect_ratio(), near, far)
    }

    /// Projection times view for the current state.
    pub fn view_projection(&self, fov_deg: f32, near: f32, far: f32) -> Mat4 {
        self.projection(fov_deg, near, far) * self.view()
    }

    /// Moves and turns the camera from one frame of input.
    pub fn apply_input(&mut self, input: &InputSample) -> CursorControl {
        self.speed = if input.sprint {
            self.settings.fast_speed
        } else {
            self.settings.base_speed
        };

        self.translate(input);

        if !input.look {
            self.first_look_sample = true;
            return CursorControl::Free;
        }

        let center = self.viewport_center();
        if self.first_look_sample {
            // The cursor is wherever the click happened; recentre before measuring anything.
            self.first_look_sample = false;
        } else {
            self.rotate(input.cursor - center);
        }

        CursorControl::Grab { warp_to: center }
    }

    fn translate(&mut self, input: &InputSample) {
        let half = self.speed / 2.0;
        let right = self.orientation.cross(self.up).try_normalize();

        if input.forward {
            self.position += self.speed * self.orientation;
        }
        if input.backward {
            self.position -= self.speed * self.orientation;
        }
        if let Some(right) = right {
            if input.left {
                self.position -= half * right;
            }
            if input.right {
                self.position += half * right;
            }
        }
        if input.ascend {
            self.position += half * self.up;
        }
        if input.descend {
            self.position -= half * self.up;
        }
    }

    /// Turns by a cursor offset from the viewport centre.
    fn rotate(&mut self, offset: Vec2) {
        let rot_x = self.settings.sensitivity * offset.y / self.height as f32;
        let rot_y = self.settings.sensitivity * offset.x / self.width as f32;

        if let Some(axis) = self.orientation.cross(self.up).try_normalize() {
            let pitched = Quat::from_axis_angle(axis, (-rot_x).to_radians()) * self.orientation;
            if within_pole_margin(pitched, self.up) {
                self.orientation = pitched;
            }
        }

        let yawed = Quat::from_axis_angle(self.up, (-rot_y).to_radians()) * self.orientation;
        self.orientation = yawed.normalize();
    }
}

/// Whether `direction` stays more than [`POLE_MARGIN_DEG`] away from both `up` and `-up`.
pub fn within_pole_margin(direction: Vec3, up: Vec3) -> bool {
    let angle = direction.angle_between(up);
    (angle - 90f32.to_radians()).abs() <= (90.0 - POLE_MARGIN_DEG).to_radians()
}
