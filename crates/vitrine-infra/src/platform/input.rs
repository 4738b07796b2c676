// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Translation from `winit` window events to container-local pointer events.

use vitrine_core::interaction::{PointerEvent, PointerPhase};
use vitrine_core::math::Vec2;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};

/// Converts raw window input into [`PointerEvent`]s in logical pixels.
///
/// `winit` reports button presses without a position, so the translator
/// remembers the last cursor location.
#[derive(Debug, Clone)]
pub struct PointerTranslator {
    scale_factor: f64,
    cursor: Vec2,
}

impl PointerTranslator {
    /// Creates a translator for a window with the given scale factor.
    pub fn new(scale_factor: f64) -> Self {
        Self {
            scale_factor,
            cursor: Vec2::ZERO,
        }
    }

    /// Updates the scale factor after the window moved between displays.
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    fn logical(&self, position: PhysicalPosition<f64>) -> Vec2 {
        let logical = position.to_logical::<f64>(self.scale_factor);
        Vec2::new(logical.x as f32, logical.y as f32)
    }

    /// Translates one event. Returns `None` for non-pointer input.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = self.logical(*position);
                Some(PointerEvent::mouse(
                    PointerPhase::Move,
                    self.cursor.x,
                    self.cursor.y,
                ))
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let phase = match state {
                    ElementState::Pressed => PointerPhase::Down,
                    ElementState::Released => PointerPhase::Up,
                };
                Some(PointerEvent::mouse(phase, self.cursor.x, self.cursor.y))
            }
            WindowEvent::CursorLeft { .. } => Some(PointerEvent::mouse(
                PointerPhase::Cancel,
                self.cursor.x,
                self.cursor.y,
            )),
            WindowEvent::Touch(touch) => {
                let phase = match touch.phase {
                    TouchPhase::Started => PointerPhase::Down,
                    TouchPhase::Moved => PointerPhase::Move,
                    TouchPhase::Ended => PointerPhase::Up,
                    TouchPhase::Cancelled => PointerPhase::Cancel,
                };
                let position = self.logical(touch.location);
                Some(PointerEvent::touch(touch.id, phase, position.x, position.y))
            }
            _ => None,
        }
    }
}
