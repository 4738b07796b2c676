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

use crate::math::Vec2;

/// The device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// A mouse or trackpad.
    Mouse,
    /// A finger on a touch screen.
    Touch,
}

/// The stage of a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// Button pressed or finger placed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released or finger lifted.
    Up,
    /// The gesture was interrupted by the host.
    Cancel,
}

/// A pointer event in container-local logical pixels (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Identifies the pointer across a gesture (touch id, or 0 for the mouse).
    pub id: u64,
    /// The producing device.
    pub kind: PointerKind,
    /// The gesture stage.
    pub phase: PointerPhase,
    /// Position relative to the container.
    pub position: Vec2,
}

impl PointerEvent {
    /// A mouse event at `(x, y)`.
    pub fn mouse(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            id: 0,
            kind: PointerKind::Mouse,
            phase,
            position: Vec2::new(x, y),
        }
    }

    /// A touch event for finger `id` at `(x, y)`.
    pub fn touch(id: u64, phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            id,
            kind: PointerKind::Touch,
            phase,
            position: Vec2::new(x, y),
        }
    }
}
