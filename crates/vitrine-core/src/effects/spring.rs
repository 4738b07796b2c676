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

//! A damped spring that smooths a value toward a moving target.

use serde::{Deserialize, Serialize};

/// Integration step; longer frames are split into steps of at most this size.
const MAX_STEP_SECONDS: f32 = 1.0 / 240.0;

/// Spring physics parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    /// Restoring force per unit displacement.
    pub stiffness: f32,
    /// Opposing force per unit velocity.
    pub damping: f32,
    /// Mass being moved.
    pub mass: f32,
    /// Below this speed, and within `rest_delta` of the target, the spring snaps to rest.
    pub rest_speed: f32,
    /// Distance to the target considered at rest.
    pub rest_delta: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 300.0,
            damping: 30.0,
            mass: 1.0,
            rest_speed: 0.01,
            rest_delta: 0.01,
        }
    }
}

/// A one-dimensional spring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    /// A spring resting at `value`.
    pub fn new(value: f32, config: SpringConfig) -> Self {
        Self {
            config,
            value,
            velocity: 0.0,
            target: value,
        }
    }

    /// Moves the target.
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Current value.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Current target.
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Whether the spring has settled on its target.
    pub fn is_at_rest(&self) -> bool {
        self.velocity == 0.0 && self.value == self.target
    }

    /// Advances by `dt` seconds and returns the new value.
    pub fn step(&mut self, dt: f32) -> f32 {
        if self.is_at_rest() || dt <= 0.0 {
            return self.value;
        }
        let mass = self.config.mass.max(f32::EPSILON);
        let mut remaining = dt;
        while remaining > 0.0 {
            let h = remaining.min(MAX_STEP_SECONDS);
            let force = -self.config.stiffness * (self.value - self.target)
                - self.config.damping * self.velocity;
            self.velocity += force / mass * h;
            self.value += self.velocity * h;
            remaining -= h;
        }
        if self.velocity.abs() < self.config.rest_speed
            && (self.value - self.target).abs() < self.config.rest_delta
        {
            self.value = self.target;
            self.velocity = 0.0;
        }
        self.value
    }
}
