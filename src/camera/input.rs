use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use super::orbit::OrbitControls;

/// Pixel-delta wheel events are scaled to roughly one notch per 100 px.
const PIXELS_PER_NOTCH: f32 = 100.0;

/// Translates window pointer events into orbit-control input.
///
/// Left drag orbits, right drag (or shift + left drag) pans, the wheel
/// zooms.
#[derive(Debug, Default)]
pub struct InputHandler {
    last_mouse_pos: Option<Vec2>,
    rotating: bool,
    panning: bool,
    shift_pressed: bool,
}

impl InputHandler {
    /// Handler with no buttons held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the event was consumed by the camera
    pub fn handle_event(
        &mut self,
        controls: &mut OrbitControls,
        event: &WindowEvent,
    ) -> bool {
        match event {
            WindowEvent::MouseInput { button, state, .. } => {
                let pressed = *state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.rotating = pressed,
                    MouseButton::Right => self.panning = pressed,
                    _ => return false,
                }
                true
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift_pressed = modifiers.state().shift_key();
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                let current = Vec2::new(position.x as f32, position.y as f32);
                let delta = self
                    .last_mouse_pos
                    .map_or(Vec2::ZERO, |last| current - last);
                self.last_mouse_pos = Some(current);

                if self.panning || (self.rotating && self.shift_pressed) {
                    controls.pan(delta);
                } else if self.rotating {
                    controls.rotate(delta);
                }
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.last_mouse_pos = None;
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let notches = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => {
                        pos.y as f32 / PIXELS_PER_NOTCH
                    }
                };
                controls.zoom(notches);
                true
            }
            _ => false,
        }
    }
}
