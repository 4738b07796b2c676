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

//! Provides the backend-agnostic render surface contracts.
//!
//! This module defines the 'what' of drawing a scene into a host container:
//! the device-adaptive [`SurfaceConfig`], the [`Projection`] and [`Camera`]
//! threaded through every frame, and the [`RenderSurface`] / [`SurfaceFactory`]
//! traits. The 'how' lives in `vitrine-infra` (a `wgpu` backend).

pub mod camera;
pub mod error;
pub mod surface;
pub mod traits;

pub use self::camera::{Camera, CameraPose, FitToScene};
pub use self::error::SurfaceError;
pub use self::surface::{
    ContainerSize, Projection, ProjectionKind, QualitySettings, SurfaceConfig, SurfaceExtent,
    DESKTOP_ORTHOGRAPHIC_SCALE, MOBILE_ORTHOGRAPHIC_SCALE,
};
pub use self::traits::{RenderFrame, RenderSurface, SurfaceFactory};
