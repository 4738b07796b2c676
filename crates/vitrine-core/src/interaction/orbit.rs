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

//! A damped orbit controller constrained to rotation.
//!
//! The camera orbits a target on a sphere parametrised by `phi` (polar angle
//! measured from +Y) and `theta` (azimuth around Y, measured from +Z).
//! Dragging accumulates angular deltas; each [`OrbitController::update`]
//! applies a `damping_factor` fraction of the pending delta, clamps the
//! result to the configured ranges, then decays the remainder. An azimuth
//! range covering a full turn wraps instead of clamping. Zoom and pan are
//! never applied.

use super::pointer::{PointerEvent, PointerKind, PointerPhase};
use crate::host::{Host, ListenerToken};
use crate::math::{Vec2, Vec3, EPSILON, PI, TAU};
use crate::renderer::{Camera, SurfaceExtent};
use serde::{Deserialize, Serialize};

/// Keeps `phi` away from the poles, where the view basis degenerates.
const POLE_EPSILON: f32 = 1e-6;

/// Wraps `angle` into `[-PI, PI)`.
fn wrap_angle(angle: f32) -> f32 {
    angle - TAU * ((angle + PI) / TAU).floor()
}

/// An inclusive angle interval in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleRange {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl AngleRange {
    /// The full polar range, pole to pole.
    pub const FULL_POLAR: Self = Self::new(0.0, PI);
    /// The full azimuth range. Azimuth ranges spanning a full turn are unlimited.
    pub const FULL_AZIMUTH: Self = Self::new(-PI, PI);

    /// Creates a range.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamps `angle` into the range.
    pub fn clamp(&self, angle: f32) -> f32 {
        angle.max(self.min).min(self.max)
    }

    /// Whether the range covers a full turn, so nothing needs clamping.
    pub fn is_full_turn(&self) -> bool {
        self.max - self.min >= TAU - EPSILON
    }

    /// Whether `angle` lies inside the range.
    pub fn contains(&self, angle: f32) -> bool {
        angle >= self.min && angle <= self.max
    }
}

/// Restricts touch rotation to the lower part of the surface on mobile.
///
/// Touches that start above the zone are left to the page, so vertical
/// scrolling keeps working over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchZone {
    /// Fraction of the surface height, measured from the bottom, that accepts rotation.
    pub lower_fraction: f32,
}

impl Default for TouchZone {
    fn default() -> Self {
        Self {
            lower_fraction: 0.6,
        }
    }
}

/// Static orbit limits for a scene variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// Fraction of the pending rotation applied per update. Zero disables damping.
    pub damping_factor: f32,
    /// Multiplier on drag-to-rotation.
    pub rotate_speed: f32,
    /// Whether dragging rotates the camera.
    pub enable_rotate: bool,
    /// Ignored: zoom is never applied.
    pub enable_zoom: bool,
    /// Ignored: pan is never applied.
    pub enable_pan: bool,
    /// Allowed polar angles.
    pub polar_range: AngleRange,
    /// Allowed azimuth angles.
    pub azimuth_range: AngleRange,
    /// Optional mobile touch restriction.
    pub touch_zone: Option<TouchZone>,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.05,
            rotate_speed: 1.0,
            enable_rotate: true,
            enable_zoom: false,
            enable_pan: false,
            polar_range: AngleRange::FULL_POLAR,
            azimuth_range: AngleRange::FULL_AZIMUTH,
            touch_zone: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    phi: f32,
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius < EPSILON {
            return Self {
                radius: 0.0,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            theta: offset.x.atan2(offset.z),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    pointer: u64,
    last: Vec2,
}

/// Rotates a [`Camera`] around its target in response to pointer drags.
#[derive(Debug)]
pub struct OrbitController {
    config: OrbitConfig,
    is_mobile: bool,
    listener: ListenerToken,
    extent: SurfaceExtent,
    target: Vec3,
    spherical: Spherical,
    delta_phi: f32,
    delta_theta: f32,
    drag: Option<Drag>,
    disposed: bool,
}

impl OrbitController {
    /// Creates a controller orbiting `camera.target` from the camera's current position.
    ///
    /// `listener` is the host pointer registration, released by [`Self::dispose`].
    pub fn new(
        camera: &Camera,
        extent: SurfaceExtent,
        config: OrbitConfig,
        is_mobile: bool,
        listener: ListenerToken,
    ) -> Self {
        if config.enable_zoom || config.enable_pan {
            log::warn!("Orbit zoom and pan are not supported and will be ignored");
        }
        let mut controller = Self {
            config,
            is_mobile,
            listener,
            extent,
            target: camera.target,
            spherical: Spherical::from_offset(Vec3::ZERO),
            delta_phi: 0.0,
            delta_theta: 0.0,
            drag: None,
            disposed: false,
        };
        controller.sync_from_camera(camera);
        controller
    }

    /// Re-derives the orbit from the camera pose and drops any pending rotation.
    pub fn sync_from_camera(&mut self, camera: &Camera) {
        self.target = camera.target;
        self.spherical = Spherical::from_offset(camera.position - camera.target);
        self.delta_phi = 0.0;
        self.delta_theta = 0.0;
    }

    /// Tracks the surface size used to normalise drags and the touch zone.
    pub fn set_extent(&mut self, extent: SurfaceExtent) {
        self.extent = extent;
    }

    /// The host pointer registration this controller listens on.
    pub fn listener(&self) -> ListenerToken {
        self.listener
    }

    /// Current polar angle in radians.
    pub fn polar_angle(&self) -> f32 {
        self.spherical.phi
    }

    /// Current azimuth angle in radians.
    pub fn azimuth_angle(&self) -> f32 {
        self.spherical.theta
    }

    /// Whether a drag gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Feeds a pointer event. Returns `true` when the controller consumed it.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        if self.disposed {
            crate::report_misuse("OrbitController::handle_pointer after dispose");
            return false;
        }
        if !self.config.enable_rotate {
            return false;
        }
        match event.phase {
            PointerPhase::Down => {
                if self.drag.is_some() || !self.accepts_drag_start(event) {
                    return false;
                }
                self.drag = Some(Drag {
                    pointer: event.id,
                    last: event.position,
                });
                true
            }
            PointerPhase::Move => match self.drag.as_mut() {
                Some(drag) if drag.pointer == event.id => {
                    let moved = event.position - drag.last;
                    drag.last = event.position;
                    self.rotate_by(moved);
                    true
                }
                _ => false,
            },
            PointerPhase::Up | PointerPhase::Cancel => match self.drag {
                Some(drag) if drag.pointer == event.id => {
                    self.drag = None;
                    true
                }
                _ => false,
            },
        }
    }

    fn accepts_drag_start(&self, event: &PointerEvent) -> bool {
        match self.config.touch_zone {
            Some(zone) if self.is_mobile && event.kind == PointerKind::Touch => {
                let height = self.extent.container.height as f32;
                event.position.y >= height * (1.0 - zone.lower_fraction)
            }
            _ => true,
        }
    }

    fn rotate_by(&mut self, moved: Vec2) {
        let height = self.extent.container.height.max(1) as f32;
        self.delta_theta -= TAU * moved.x / height * self.config.rotate_speed;
        self.delta_phi -= TAU * moved.y / height * self.config.rotate_speed;
    }

    /// Applies one step of damped rotation to `camera`. Returns whether it moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        if self.disposed {
            crate::report_misuse("OrbitController::update after dispose");
            return false;
        }
        let factor = if self.config.damping_factor > 0.0 {
            self.config.damping_factor.min(1.0)
        } else {
            1.0
        };

        let mut spherical = self.spherical;
        let theta = spherical.theta + self.delta_theta * factor;
        spherical.theta = if self.config.azimuth_range.is_full_turn() {
            wrap_angle(theta)
        } else {
            self.config.azimuth_range.clamp(theta)
        };
        spherical.phi = self
            .config
            .polar_range
            .clamp(spherical.phi + self.delta_phi * factor)
            .clamp(POLE_EPSILON, PI - POLE_EPSILON);
        self.spherical = spherical;
        self.delta_theta *= 1.0 - factor;
        self.delta_phi *= 1.0 - factor;

        let position = self.target + spherical.to_offset();
        let moved = (position - camera.position).length_squared() > EPSILON * EPSILON
            || camera.target != self.target;
        camera.position = position;
        camera.target = self.target;
        moved
    }

    /// Detaches pointer handling from the host.
    pub fn dispose(&mut self, host: &mut dyn Host) {
        if self.disposed {
            crate::report_misuse("OrbitController::dispose called twice");
            return;
        }
        host.detach_pointer(self.listener);
        self.drag = None;
        self.disposed = true;
    }

    /// Whether [`Self::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
