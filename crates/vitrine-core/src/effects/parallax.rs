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

//! The scroll-driven product grid: three rows sliding in opposite directions
//! while the whole grid tilts flat and fades in.

use super::spring::{Spring, SpringConfig};
use crate::math::remap_clamped;

/// Products per row.
pub const ROW_LENGTH: usize = 5;
/// Rows in the grid.
pub const ROW_COUNT: usize = 3;
/// Scroll progress over which the grid tilts flat and fades in.
const INTRO_RANGE: (f32, f32) = (0.0, 0.2);
const FULL_RANGE: (f32, f32) = (0.0, 1.0);

/// A row of the grid, borrowing its products.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxRow<'a, T> {
    /// The products in this row.
    pub items: &'a [T],
    /// Horizontal offset in pixels.
    pub translate_x: f32,
}

/// Grid-wide transform at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxPose {
    /// Offset for rows one and three.
    pub translate_x: f32,
    /// Offset for row two.
    pub translate_x_reverse: f32,
    /// Tilt around X in degrees.
    pub rotate_x: f32,
    /// Tilt around Z in degrees.
    pub rotate_z: f32,
    /// Vertical offset in pixels.
    pub translate_y: f32,
    /// Grid opacity.
    pub opacity: f32,
}

/// Spring-smoothed mapping from scroll progress to grid transforms.
#[derive(Debug, Clone)]
pub struct ParallaxGrid {
    translate_x: Spring,
    translate_x_reverse: Spring,
    rotate_x: Spring,
    rotate_z: Spring,
    translate_y: Spring,
    opacity: Spring,
}

impl ParallaxGrid {
    /// Creates the grid at scroll progress zero.
    pub fn new(config: SpringConfig) -> Self {
        let targets = Self::targets(0.0);
        Self {
            translate_x: Spring::new(targets.translate_x, config),
            translate_x_reverse: Spring::new(targets.translate_x_reverse, config),
            rotate_x: Spring::new(targets.rotate_x, config),
            rotate_z: Spring::new(targets.rotate_z, config),
            translate_y: Spring::new(targets.translate_y, config),
            opacity: Spring::new(targets.opacity, config),
        }
    }

    /// The unsmoothed transform for scroll `progress`.
    pub fn targets(progress: f32) -> ParallaxPose {
        ParallaxPose {
            translate_x: remap_clamped(progress, FULL_RANGE, (0.0, 1000.0)),
            translate_x_reverse: remap_clamped(progress, FULL_RANGE, (0.0, -1000.0)),
            rotate_x: remap_clamped(progress, INTRO_RANGE, (15.0, 0.0)),
            rotate_z: remap_clamped(progress, INTRO_RANGE, (20.0, 0.0)),
            translate_y: remap_clamped(progress, INTRO_RANGE, (-700.0, 500.0)),
            opacity: remap_clamped(progress, INTRO_RANGE, (0.2, 1.0)),
        }
    }

    /// Records the latest scroll progress.
    pub fn set_progress(&mut self, progress: f32) {
        let targets = Self::targets(progress);
        self.translate_x.set_target(targets.translate_x);
        self.translate_x_reverse.set_target(targets.translate_x_reverse);
        self.rotate_x.set_target(targets.rotate_x);
        self.rotate_z.set_target(targets.rotate_z);
        self.translate_y.set_target(targets.translate_y);
        self.opacity.set_target(targets.opacity);
    }

    /// Advances the springs by `dt` seconds.
    pub fn step(&mut self, dt: f32) -> ParallaxPose {
        ParallaxPose {
            translate_x: self.translate_x.step(dt),
            translate_x_reverse: self.translate_x_reverse.step(dt),
            rotate_x: self.rotate_x.step(dt),
            rotate_z: self.rotate_z.step(dt),
            translate_y: self.translate_y.step(dt),
            opacity: self.opacity.step(dt),
        }
    }

    /// Splits `products` into rows and pairs each with its offset.
    ///
    /// Rows one and three slide with `translate_x`, row two against it.
    /// Products beyond the fifteenth are not shown.
    pub fn rows<'a, T>(&self, products: &'a [T]) -> Vec<ParallaxRow<'a, T>> {
        products
            .chunks(ROW_LENGTH)
            .take(ROW_COUNT)
            .enumerate()
            .map(|(index, items)| ParallaxRow {
                items,
                translate_x: if index == 1 {
                    self.translate_x_reverse.value()
                } else {
                    self.translate_x.value()
                },
            })
            .collect()
    }
}

impl Default for ParallaxGrid {
    fn default() -> Self {
        Self::new(SpringConfig::default())
    }
}
