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

//! The render surface seam between the lifecycle core and a graphics backend.

use super::error::SurfaceError;
use super::surface::{Projection, SurfaceConfig, SurfaceExtent};
use crate::math::{LinearRgba, Mat4, Vec3};
use crate::scene::{SceneHandle, SceneId};

/// Everything a surface needs to draw one frame.
pub struct RenderFrame<'a> {
    /// Combined projection and view matrix.
    pub view_projection: Mat4,
    /// Eye position, used for lighting.
    pub camera_position: Vec3,
    /// Background clear color.
    pub clear_color: LinearRgba,
    /// Scene content to draw, or `None` for a background-only frame.
    pub scene: Option<&'a dyn SceneHandle>,
}

impl RenderFrame<'_> {
    /// Whether this frame draws scene content.
    pub fn has_content(&self) -> bool {
        self.scene.is_some()
    }
}

/// A drawable area bound to a host container.
///
/// Calls after [`RenderSurface::dispose`] are misuse: implementations
/// `debug_assert!` and otherwise ignore them.
pub trait RenderSurface {
    /// The current drawable extent.
    fn extent(&self) -> SurfaceExtent;

    /// Resizes the drawable buffer and applies the new projection.
    fn resize(&mut self, extent: SurfaceExtent, projection: &Projection);

    /// Draws one frame.
    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), SurfaceError>;

    /// Drops any GPU copies of a scene's content ahead of the scene being disposed.
    fn release_scene(&mut self, scene: SceneId);

    /// Releases every GPU resource held by the surface.
    fn dispose(&mut self);

    /// Whether [`RenderSurface::dispose`] has run.
    fn is_disposed(&self) -> bool;
}

/// Creates render surfaces for a container.
pub trait SurfaceFactory {
    /// Creates a surface with the given extent and quality configuration.
    fn create(
        &mut self,
        extent: SurfaceExtent,
        config: &SurfaceConfig,
    ) -> Result<Box<dyn RenderSurface>, SurfaceError>;
}
