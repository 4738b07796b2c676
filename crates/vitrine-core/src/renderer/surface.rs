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

//! Device-adaptive surface configuration and projection derivation.

use crate::math::{degrees_to_radians, Mat4};
use crate::platform::{CapabilityProfile, Tier};
use serde::{Deserialize, Serialize};

/// Orthographic extents are shrunk by this factor on desktop to reduce render cost.
pub const DESKTOP_ORTHOGRAPHIC_SCALE: f32 = 0.7;
/// Orthographic extents are used as-is on mobile.
pub const MOBILE_ORTHOGRAPHIC_SCALE: f32 = 1.0;

/// The content-box dimensions of the host container, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContainerSize {
    /// Width in logical pixels.
    pub width: u32,
    /// Height in logical pixels.
    pub height: u32,
}

impl ContainerSize {
    /// Creates a new container size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, treating a zero height as one pixel.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// The drawable buffer size: the container size times the effective pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceExtent {
    /// The container the surface tracks.
    pub container: ContainerSize,
    /// Device pixels per logical pixel, already capped by the tier.
    pub pixel_ratio: f32,
}

impl SurfaceExtent {
    /// Creates an extent for `container` at `pixel_ratio`.
    pub fn new(container: ContainerSize, pixel_ratio: f32) -> Self {
        Self {
            container,
            pixel_ratio,
        }
    }

    /// Physical (device pixel) width, never zero.
    pub fn physical_width(&self) -> u32 {
        ((self.container.width as f32 * self.pixel_ratio).round() as u32).max(1)
    }

    /// Physical (device pixel) height, never zero.
    pub fn physical_height(&self) -> u32 {
        ((self.container.height as f32 * self.pixel_ratio).round() as u32).max(1)
    }
}

/// The projection a scene variant asks for, before container dimensions are known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProjectionKind {
    /// A perspective camera with a vertical field of view.
    Perspective {
        /// Vertical field of view in degrees.
        fov_degrees: f32,
        /// Near clipping distance.
        near: f32,
        /// Far clipping distance.
        far: f32,
    },
    /// An orthographic camera whose extents follow the container.
    Orthographic {
        /// Near clipping plane (may be negative).
        near: f32,
        /// Far clipping plane.
        far: f32,
    },
}

/// A fully resolved projection for the current container dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Perspective projection.
    Perspective {
        /// Vertical field of view in degrees.
        fov_degrees: f32,
        /// Width over height of the viewport.
        aspect: f32,
        /// Near clipping distance.
        near: f32,
        /// Far clipping distance.
        far: f32,
    },
    /// Orthographic projection centred on the view axis.
    Orthographic {
        /// Total visible width in world units.
        width: f32,
        /// Total visible height in world units.
        height: f32,
        /// Near clipping plane.
        near: f32,
        /// Far clipping plane.
        far: f32,
    },
}

impl Projection {
    /// Resolves `kind` against the container.
    ///
    /// Orthographic extents are scaled by [`DESKTOP_ORTHOGRAPHIC_SCALE`] unless
    /// the device is mobile.
    pub fn resolve(kind: &ProjectionKind, container: ContainerSize, is_mobile: bool) -> Self {
        match *kind {
            ProjectionKind::Perspective {
                fov_degrees,
                near,
                far,
            } => Projection::Perspective {
                fov_degrees,
                aspect: container.aspect_ratio(),
                near,
                far,
            },
            ProjectionKind::Orthographic { near, far } => {
                let scale = if is_mobile {
                    MOBILE_ORTHOGRAPHIC_SCALE
                } else {
                    DESKTOP_ORTHOGRAPHIC_SCALE
                };
                Projection::Orthographic {
                    width: container.width as f32 * scale,
                    height: container.height as f32 * scale,
                    near,
                    far,
                }
            }
        }
    }

    /// Builds the projection matrix.
    pub fn matrix(&self) -> Mat4 {
        match *self {
            Projection::Perspective {
                fov_degrees,
                aspect,
                near,
                far,
            } => Mat4::perspective_rh_zo(degrees_to_radians(fov_degrees), aspect, near, far),
            Projection::Orthographic {
                width,
                height,
                near,
                far,
            } => {
                let half_w = (width / 2.0).max(0.5);
                let half_h = (height / 2.0).max(0.5);
                Mat4::orthographic_rh_zo(-half_w, half_w, -half_h, half_h, near, far)
            }
        }
    }
}

/// Per-variant render quality limits applied on top of the device tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualitySettings {
    /// Pixel ratio ceiling for high-tier devices.
    pub max_pixel_ratio: f32,
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self {
            max_pixel_ratio: 1.5,
        }
    }
}

/// The render-quality configuration of a surface, derived once per mount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceConfig {
    /// Upper bound on device pixels per logical pixel.
    pub pixel_ratio_cap: f32,
    /// Whether multisample antialiasing is enabled.
    pub antialias: bool,
    /// The resolved projection.
    pub projection: Projection,
}

impl SurfaceConfig {
    /// Derives the configuration from the device profile, variant limits and container.
    ///
    /// Low-tier devices get a pixel ratio cap of 1 and no antialiasing.
    pub fn derive(
        profile: &CapabilityProfile,
        quality: &QualitySettings,
        kind: &ProjectionKind,
        container: ContainerSize,
    ) -> Self {
        let (pixel_ratio_cap, antialias) = match profile.tier() {
            Tier::Low => (1.0, false),
            Tier::High => (quality.max_pixel_ratio.max(1.0), true),
        };
        Self {
            pixel_ratio_cap,
            antialias,
            projection: Projection::resolve(kind, container, profile.is_mobile),
        }
    }

    /// The pixel ratio actually used for a display reporting `device_pixel_ratio`.
    pub fn effective_pixel_ratio(&self, device_pixel_ratio: f32) -> f32 {
        if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(self.pixel_ratio_cap)
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ORTHO: ProjectionKind = ProjectionKind::Orthographic {
        near: -100_000.0,
        far: 100_000.0,
    };
    const PERSPECTIVE: ProjectionKind = ProjectionKind::Perspective {
        fov_degrees: 75.0,
        near: 0.1,
        far: 5000.0,
    };

    #[test]
    fn low_tier_caps_ratio_and_disables_antialias() {
        let profile = CapabilityProfile::new(false, 2.0, 8);
        let config = SurfaceConfig::derive(
            &profile,
            &QualitySettings { max_pixel_ratio: 2.0 },
            &PERSPECTIVE,
            ContainerSize::new(800, 600),
        );
        assert_eq!(config.pixel_ratio_cap, 1.0);
        assert!(!config.antialias);
        assert_eq!(config.effective_pixel_ratio(3.0), 1.0);
    }

    #[test]
    fn high_tier_uses_variant_ceiling() {
        let profile = CapabilityProfile::new(false, 8.0, 8);
        let config = SurfaceConfig::derive(
            &profile,
            &QualitySettings { max_pixel_ratio: 1.5 },
            &PERSPECTIVE,
            ContainerSize::new(800, 600),
        );
        assert!(config.antialias);
        assert_eq!(config.effective_pixel_ratio(2.0), 1.5);
        assert_eq!(config.effective_pixel_ratio(1.0), 1.0);
        assert_eq!(config.effective_pixel_ratio(f32::NAN), 1.0);
    }

    #[test]
    fn orthographic_shrinks_on_desktop_only() {
        let container = ContainerSize::new(1000, 500);
        match Projection::resolve(&ORTHO, container, false) {
            Projection::Orthographic { width, height, .. } => {
                assert_relative_eq!(width, 700.0);
                assert_relative_eq!(height, 350.0);
            }
            other => panic!("unexpected projection {other:?}"),
        }
        match Projection::resolve(&ORTHO, container, true) {
            Projection::Orthographic { width, height, .. } => {
                assert_relative_eq!(width, 1000.0);
                assert_relative_eq!(height, 500.0);
            }
            other => panic!("unexpected projection {other:?}"),
        }
    }

    #[test]
    fn perspective_tracks_aspect_and_survives_zero_height() {
        match Projection::resolve(&PERSPECTIVE, ContainerSize::new(1600, 900), false) {
            Projection::Perspective { aspect, .. } => assert_relative_eq!(aspect, 16.0 / 9.0),
            other => panic!("unexpected projection {other:?}"),
        }
        match Projection::resolve(&PERSPECTIVE, ContainerSize::new(300, 0), false) {
            Projection::Perspective { aspect, .. } => assert_relative_eq!(aspect, 300.0),
            other => panic!("unexpected projection {other:?}"),
        }
    }

    #[test]
    fn extent_rounds_and_never_collapses() {
        let extent = SurfaceExtent::new(ContainerSize::new(101, 0), 1.5);
        assert_eq!(extent.physical_width(), 152);
        assert_eq!(extent.physical_height(), 1);
    }
}
