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

//! A two-part cursor follower: a ring that trails the pointer and a dot inside it.

use crate::math::Vec2;

/// Fraction of the remaining distance covered per frame.
pub const FOLLOW_FACTOR: f32 = 0.18;
/// Ring diameter in pixels.
pub const RING_SIZE: f32 = 30.0;
/// Dot diameter in pixels.
pub const DOT_SIZE: f32 = 8.0;
/// Offset from the ring's top-left corner to the dot's top-left corner.
pub const DOT_OFFSET: f32 = 11.0;

/// Top-left positions of the two glow elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowPlacement {
    /// The outer ring.
    pub ring: Vec2,
    /// The inner dot.
    pub dot: Vec2,
}

/// Eases a ring toward the pointer, one step per frame.
#[derive(Debug, Clone, Default)]
pub struct CursorGlow {
    position: Vec2,
    target: Vec2,
}

impl CursorGlow {
    /// Starts at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pointer position in viewport pixels.
    pub fn pointer_moved(&mut self, pointer: Vec2) {
        let half = RING_SIZE / 2.0;
        self.target = Vec2::new(pointer.x - half, pointer.y - half);
    }

    /// Advances one frame and returns the new placement.
    pub fn step(&mut self) -> GlowPlacement {
        self.position = Vec2::lerp(self.position, self.target, FOLLOW_FACTOR);
        self.placement()
    }

    /// The current placement without advancing.
    pub fn placement(&self) -> GlowPlacement {
        GlowPlacement {
            ring: self.position,
            dot: Vec2::new(self.position.x + DOT_OFFSET, self.position.y + DOT_OFFSET),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ring_moves_a_fixed_fraction_toward_the_pointer() {
        let mut glow = CursorGlow::new();
        glow.pointer_moved(Vec2::new(115.0, 65.0));
        let placement = glow.step();
        assert_relative_eq!(placement.ring.x, 100.0 * FOLLOW_FACTOR);
        assert_relative_eq!(placement.ring.y, 50.0 * FOLLOW_FACTOR);
        assert_relative_eq!(placement.dot.x, placement.ring.x + 11.0);
    }

    #[test]
    fn ring_converges_centred_on_the_pointer() {
        let mut glow = CursorGlow::new();
        glow.pointer_moved(Vec2::new(400.0, 300.0));
        for _ in 0..200 {
            glow.step();
        }
        let placement = glow.placement();
        assert_relative_eq!(placement.ring.x + RING_SIZE / 2.0, 400.0, epsilon = 1e-3);
        assert_relative_eq!(placement.dot.y + DOT_SIZE / 2.0, 300.0, epsilon = 1e-3);
    }
}
