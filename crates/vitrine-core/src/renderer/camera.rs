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

//! The scene camera and its initial pose.

use super::surface::Projection;
use crate::math::{degrees_to_radians, Aabb, Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Where the camera starts, in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    /// Eye position.
    pub position: Vec3,
    /// Point the camera looks at (the orbit pivot).
    pub target: Vec3,
}

impl CameraPose {
    /// Creates a pose at `position` looking at `target`.
    pub const fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }
}

/// Frames the loaded scene by moving the camera back along +Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitToScene {
    /// The camera never gets closer to the scene center than this.
    pub min_distance: f32,
}

/// A camera with a world-space pose and a resolved projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye position.
    pub position: Vec3,
    /// Look-at target.
    pub target: Vec3,
    /// Up direction.
    pub up: Vec3,
    /// Current projection.
    pub projection: Projection,
}

impl Camera {
    /// Creates a camera at `pose` with Y-up.
    pub fn new(pose: CameraPose, projection: Projection) -> Self {
        Self {
            position: pose.position,
            target: pose.target,
            up: Vec3::Y,
            projection,
        }
    }

    /// The view matrix, falling back to identity for a degenerate pose.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up).unwrap_or_else(|| {
            log::warn!("Degenerate camera pose at {:?}, using identity view", self.position);
            Mat4::IDENTITY
        })
    }

    /// Projection times view.
    pub fn view_projection(&self) -> Mat4 {
        self.projection.matrix() * self.view_matrix()
    }

    /// Centers the camera on `bounds` and backs off far enough to see it whole.
    ///
    /// Only perspective cameras are framed. Returns whether the pose changed.
    pub fn frame_bounds(&mut self, bounds: &Aabb, fit: &FitToScene) -> bool {
        let Projection::Perspective { fov_degrees, .. } = self.projection else {
            return false;
        };
        if !bounds.is_valid() {
            return false;
        }
        let center = bounds.center();
        let max_dim = bounds.size().max_element();
        let half_fov = degrees_to_radians(fov_degrees) / 2.0;
        let distance = (max_dim / 2.0 / half_fov.tan()).abs().max(fit.min_distance);
        self.target = center;
        self.position = Vec3::new(center.x, center.y, center.z + distance);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn perspective() -> Projection {
        Projection::Perspective {
            fov_degrees: 90.0,
            aspect: 1.0,
            near: 0.1,
            far: 5000.0,
        }
    }

    #[test]
    fn framing_respects_min_distance() {
        let mut camera = Camera::new(CameraPose::new(Vec3::new(0.0, 0.0, 500.0), Vec3::ZERO), perspective());
        let bounds = Aabb::from_min_max(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        assert!(camera.frame_bounds(&bounds, &FitToScene { min_distance: 500.0 }));
        assert_relative_eq!(camera.position.z, 500.0);
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn framing_backs_off_for_large_scenes() {
        let mut camera = Camera::new(CameraPose::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO), perspective());
        let bounds = Aabb::from_min_max(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2000.0, 100.0, 100.0));
        assert!(camera.frame_bounds(&bounds, &FitToScene { min_distance: 500.0 }));
        // tan(45deg) == 1, so the distance is half the largest dimension.
        assert_relative_eq!(camera.position.z, 50.0 + 1000.0, epsilon = 1e-2);
        assert_relative_eq!(camera.target.x, 1000.0);
    }

    #[test]
    fn orthographic_cameras_keep_their_pose() {
        let projection = Projection::Orthographic {
            width: 700.0,
            height: 350.0,
            near: -100_000.0,
            far: 100_000.0,
        };
        let pose = CameraPose::new(Vec3::new(980.99, 179.96, 196.84), Vec3::ZERO);
        let mut camera = Camera::new(pose, projection);
        let bounds = Aabb::from_min_max(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0));
        assert!(!camera.frame_bounds(&bounds, &FitToScene { min_distance: 1.0 }));
        assert_eq!(camera.position, pose.position);
    }
}
