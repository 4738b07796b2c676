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

//! Provides the small set of math primitives the scene runtime needs.
//!
//! All angular functions in this module operate in **radians** unless
//! explicitly specified otherwise (e.g., `degrees_to_radians`).

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

pub use std::f32::consts::{FRAC_PI_2, FRAC_PI_6, PI, TAU};

/// The factor to convert degrees to radians (PI / 180.0).
pub const DEG_TO_RAD: f32 = PI / 180.0;

pub mod color;
pub mod geometry;
pub mod matrix;
pub mod vector;

pub use self::color::LinearRgba;
pub use self::geometry::Aabb;
pub use self::matrix::Mat4;
pub use self::vector::{Vec2, Vec3, Vec4};

/// Converts an angle from degrees to radians.
///
/// # Examples
///
/// ```
/// use vitrine_core::math::{degrees_to_radians, PI};
/// assert_eq!(degrees_to_radians(180.0), PI);
/// ```
#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * DEG_TO_RAD
}

/// Linearly remaps `value` from `input` to `output`, clamping to the output range.
///
/// A degenerate input range returns the start of the output range.
#[inline]
pub fn remap_clamped(value: f32, input: (f32, f32), output: (f32, f32)) -> f32 {
    let span = input.1 - input.0;
    if span.abs() < EPSILON {
        return output.0;
    }
    let t = ((value - input.0) / span).clamp(0.0, 1.0);
    output.0 + (output.1 - output.0) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remap_clamps_outside_input() {
        assert_eq!(remap_clamped(0.1, (0.0, 0.2), (15.0, 0.0)), 7.5);
        assert_eq!(remap_clamped(0.9, (0.0, 0.2), (15.0, 0.0)), 0.0);
        assert_eq!(remap_clamped(-1.0, (0.0, 1.0), (0.0, 1000.0)), 0.0);
        assert_eq!(remap_clamped(0.5, (1.0, 1.0), (3.0, 4.0)), 3.0);
    }
}
