use std::collections::HashSet;

use glam::Vec2;
use sdl2::{event::Event, keyboard::Keycode, mouse::MouseButton};

use cubeview3d::input::InputSample;

/// The current state of the keyboard.
#[derive(Default)]
pub struct KeyboardState {
    pub down: HashSet<Keycode>,
}

/// The current state of the mouse.
#[derive(Default)]
pub struct MouseState {
    pub position: Vec2,
    pub down: HashSet<MouseButton>,
}

impl KeyboardState {
    fn held(&self, key: Keycode) -> bool {
        self.down.contains(&key)
    }
}

/// Tracks held keys and buttons from SDL events.
#[derive(Default)]
pub struct DeviceState {
    pub keyboard: KeyboardState,
    pub mouse: MouseState,
}

impl DeviceState {
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::MouseMotion { x, y, .. } => {
                self.mouse.position = Vec2::new(*x as f32, *y as f32);
            }
            Event::MouseButtonDown { mouse_btn, .. } => {
                self.mouse.down.insert(*mouse_btn);
            }
            Event::MouseButtonUp { mouse_btn, .. } => {
                self.mouse.down.remove(mouse_btn);
            }
            Event::KeyDown {
                keycode: Some(keycode),
                repeat: false,
                ..
            } => {
                self.keyboard.down.insert(*keycode);
            }
            Event::KeyUp {
                keycode: Some(keycode),
                repeat: false,
                ..
            } => {
                self.keyboard.down.remove(keycode);
            }
            // Keys released while unfocused never send KeyUp.
            Event::Window {
                win_event: sdl2::event::WindowEvent::FocusLost,
                ..
            } => {
                self.keyboard.down.clear();
                self.mouse.down.clear();
            }
            _ => {}
        }
    }

    /// Maps the held state onto the camera controls.
    pub fn input_sample(&self) -> InputSample {
        let keyboard = &self.keyboard;
        InputSample {
            forward: keyboard.held(Keycode::W),
            backward: keyboard.held(Keycode::S),
            left: keyboard.held(Keycode::A),
            right: keyboard.held(Keycode::D),
            ascend: keyboard.held(Keycode::Space),
            descend: keyboard.held(Keycode::LCtrl),
            sprint: keyboard.held(Keycode::LShift),
            look: self.mouse.down.contains(&MouseButton::Left),
            cursor: self.mouse.position,
        }
    }
}
