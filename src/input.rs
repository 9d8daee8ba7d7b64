use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keyboard and pointer state, snapshotted per frame.
///
/// The frame closure reads held keys for movement and the pointer delta
/// for camera rotation; per-frame sets are cleared by
/// [`begin_frame`](Self::begin_frame) after each frame completes.
#[derive(Default)]
pub struct Input {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    pointer_position: Option<Vec2>,
    pointer_delta: Vec2,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the per-frame state. Called after each frame has been drawn.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.pointer_delta = Vec2::ZERO;
    }

    /// Folds a window event into the current state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => {
                            if !self.keys_down.contains(&key) {
                                self.keys_pressed.insert(key);
                            }
                            self.keys_down.insert(key);
                        }
                        ElementState::Released => {
                            self.keys_down.remove(&key);
                            self.keys_released.insert(key);
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            _ => {}
        }
    }

    // The first event only seeds the position: until then there is no
    // previous point to measure from, and treating the absolute coordinates
    // as a delta would whip the camera on pointer entry.
    fn pointer_moved(&mut self, new_pos: Vec2) {
        if let Some(last) = self.pointer_position {
            self.pointer_delta += new_pos - last;
        }
        self.pointer_position = Some(new_pos);
    }

    /// Returns true if the key is currently held down.
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns true if the key was pressed this frame.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns true if the key was released this frame.
    pub fn key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Position of the last pointer event, or `None` before any arrived.
    pub fn pointer_position(&self) -> Option<Vec2> {
        self.pointer_position
    }

    /// Pointer movement this frame, current-minus-previous position.
    ///
    /// Negate it to get the previous-minus-current convention
    /// [`Camera::add_rotation`](crate::Camera::add_rotation) expects.
    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_pointer_motion_reports_no_delta() {
        let mut input = Input::new();
        input.pointer_moved(Vec2::new(400.0, 300.0));

        assert_eq!(input.pointer_delta(), Vec2::ZERO);
        assert_eq!(input.pointer_position(), Some(Vec2::new(400.0, 300.0)));
    }

    #[test]
    fn pointer_deltas_accumulate_from_the_seeded_position() {
        let mut input = Input::new();
        input.pointer_moved(Vec2::new(10.0, 10.0));
        input.pointer_moved(Vec2::new(14.0, 7.0));
        input.pointer_moved(Vec2::new(15.0, 9.0));

        assert_eq!(input.pointer_delta(), Vec2::new(5.0, -1.0));
    }

    #[test]
    fn begin_frame_clears_the_delta_but_keeps_the_position() {
        let mut input = Input::new();
        input.pointer_moved(Vec2::new(100.0, 50.0));
        input.pointer_moved(Vec2::new(110.0, 50.0));
        input.begin_frame();

        assert_eq!(input.pointer_delta(), Vec2::ZERO);

        // The next motion measures from the retained position, not from a
        // fresh seed.
        input.pointer_moved(Vec2::new(113.0, 54.0));
        assert_eq!(input.pointer_delta(), Vec2::new(3.0, 4.0));
    }
}
