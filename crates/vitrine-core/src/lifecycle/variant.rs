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

//! Scene variants: one parametrised description per page placement.

use crate::interaction::{AngleRange, OrbitConfig, TouchZone};
use crate::math::{LinearRgba, Vec3, FRAC_PI_6, PI};
use crate::renderer::{CameraPose, FitToScene, ProjectionKind, QualitySettings};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delay before loading when the host has no idle scheduling.
pub const DEFAULT_IDLE_FALLBACK_MS: u64 = 200;

fn default_background() -> LinearRgba {
    LinearRgba::TRANSPARENT
}

fn default_idle_fallback_ms() -> u64 {
    DEFAULT_IDLE_FALLBACK_MS
}

/// Everything that distinguishes one embedded scene from another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneVariant {
    /// Name used in logs and to select the variant from a site file.
    pub name: String,
    /// Asset location handed to the scene loader.
    pub asset_url: String,
    /// Camera projection.
    pub projection: ProjectionKind,
    /// Initial camera pose.
    pub camera: CameraPose,
    /// Reframe the camera around the scene once it loads.
    #[serde(default)]
    pub fit_to_scene: Option<FitToScene>,
    /// Orbit limits.
    #[serde(default)]
    pub orbit: OrbitConfig,
    /// Quality ceiling for high-tier devices.
    #[serde(default)]
    pub quality: QualitySettings,
    /// Clear color behind the scene.
    #[serde(default = "default_background")]
    pub background: LinearRgba,
    /// Load delay when idle scheduling is unavailable, in milliseconds.
    #[serde(default = "default_idle_fallback_ms")]
    pub idle_fallback_ms: u64,
    /// Text shown while the scene loads.
    #[serde(default)]
    pub placeholder: Option<String>,
}

impl SceneVariant {
    /// Starts a builder for a variant named `name` loading `asset_url`.
    pub fn builder(name: impl Into<String>, asset_url: impl Into<String>) -> SceneVariantBuilder {
        SceneVariantBuilder::new(name, asset_url)
    }

    /// The landing page hero: a perspective scene framed after load.
    pub fn hero() -> Self {
        Self::builder("hero", "assets/hero.gltf")
            .projection(ProjectionKind::Perspective {
                fov_degrees: 75.0,
                near: 0.1,
                far: 5000.0,
            })
            .camera(CameraPose::new(Vec3::new(0.0, 0.0, 500.0), Vec3::ZERO))
            .fit_to_scene(FitToScene {
                min_distance: 500.0,
            })
            .orbit(OrbitConfig {
                damping_factor: 0.05,
                polar_range: AngleRange::new(0.2 * PI, 0.8 * PI),
                azimuth_range: AngleRange::new(-FRAC_PI_6, FRAC_PI_6),
                ..OrbitConfig::default()
            })
            .max_pixel_ratio(1.5)
            .background(LinearRgba::TRANSPARENT)
            .placeholder("Preparing experience...")
            .build()
    }

    /// The services card: a fixed orthographic view with a touch zone on mobile.
    pub fn service() -> Self {
        Self::builder("service", "assets/service.gltf")
            .projection(ProjectionKind::Orthographic {
                near: -100_000.0,
                far: 100_000.0,
            })
            .camera(CameraPose::new(
                Vec3::new(980.99, 179.96, 196.84),
                Vec3::ZERO,
            ))
            .orbit(OrbitConfig {
                damping_factor: 0.1,
                polar_range: AngleRange::new(0.2 * PI, 0.8 * PI),
                azimuth_range: AngleRange::new(-FRAC_PI_6, FRAC_PI_6),
                touch_zone: Some(TouchZone::default()),
                ..OrbitConfig::default()
            })
            .max_pixel_ratio(2.0)
            .background(LinearRgba::BLACK)
            .build()
    }

    /// The idle fallback as a [`Duration`].
    pub fn idle_fallback(&self) -> Duration {
        Duration::from_millis(self.idle_fallback_ms)
    }
}

/// Builds a [`SceneVariant`] programmatically.
#[derive(Debug, Clone)]
pub struct SceneVariantBuilder {
    variant: SceneVariant,
}

impl SceneVariantBuilder {
    /// A perspective variant looking down -Z from `(0, 0, 500)` with default limits.
    pub fn new(name: impl Into<String>, asset_url: impl Into<String>) -> Self {
        Self {
            variant: SceneVariant {
                name: name.into(),
                asset_url: asset_url.into(),
                projection: ProjectionKind::Perspective {
                    fov_degrees: 75.0,
                    near: 0.1,
                    far: 5000.0,
                },
                camera: CameraPose::new(Vec3::new(0.0, 0.0, 500.0), Vec3::ZERO),
                fit_to_scene: None,
                orbit: OrbitConfig::default(),
                quality: QualitySettings::default(),
                background: default_background(),
                idle_fallback_ms: DEFAULT_IDLE_FALLBACK_MS,
                placeholder: None,
            },
        }
    }

    /// Sets the projection.
    pub fn projection(mut self, projection: ProjectionKind) -> Self {
        self.variant.projection = projection;
        self
    }

    /// Sets the initial camera pose.
    pub fn camera(mut self, pose: CameraPose) -> Self {
        self.variant.camera = pose;
        self
    }

    /// Reframes the camera after load.
    pub fn fit_to_scene(mut self, fit: FitToScene) -> Self {
        self.variant.fit_to_scene = Some(fit);
        self
    }

    /// Sets the orbit limits.
    pub fn orbit(mut self, orbit: OrbitConfig) -> Self {
        self.variant.orbit = orbit;
        self
    }

    /// Sets the high-tier pixel ratio ceiling.
    pub fn max_pixel_ratio(mut self, ratio: f32) -> Self {
        self.variant.quality.max_pixel_ratio = ratio;
        self
    }

    /// Sets the clear color.
    pub fn background(mut self, color: LinearRgba) -> Self {
        self.variant.background = color;
        self
    }

    /// Sets the idle fallback delay.
    pub fn idle_fallback(mut self, delay: Duration) -> Self {
        self.variant.idle_fallback_ms = delay.as_millis() as u64;
        self
    }

    /// Sets the loading placeholder text.
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.variant.placeholder = Some(text.into());
        self
    }

    /// Finishes the variant.
    pub fn build(self) -> SceneVariant {
        self.variant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_carry_their_limits() {
        let hero = SceneVariant::hero();
        assert!(matches!(hero.projection, ProjectionKind::Perspective { fov_degrees, .. } if fov_degrees == 75.0));
        assert_eq!(hero.placeholder.as_deref(), Some("Preparing experience..."));
        assert_eq!(hero.idle_fallback(), Duration::from_millis(200));
        assert!(hero.orbit.touch_zone.is_none());

        let service = SceneVariant::service();
        assert!(matches!(service.projection, ProjectionKind::Orthographic { .. }));
        assert_eq!(service.orbit.touch_zone, Some(TouchZone { lower_fraction: 0.6 }));
        assert_eq!(service.quality.max_pixel_ratio, 2.0);
        assert!(service.fit_to_scene.is_none());
        assert!(!service.orbit.enable_zoom && !service.orbit.enable_pan);
    }

    #[test]
    fn builder_overrides_defaults() {
        let variant = SceneVariant::builder("custom", "https://example.com/a.glb")
            .idle_fallback(Duration::from_millis(50))
            .background(LinearRgba::WHITE)
            .build();
        assert_eq!(variant.idle_fallback_ms, 50);
        assert_eq!(variant.background, LinearRgba::WHITE);
        assert_eq!(variant.asset_url, "https://example.com/a.glb");
    }
}
