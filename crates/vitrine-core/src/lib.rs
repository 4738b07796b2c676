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

//! # Vitrine Core
//!
//! Backend-agnostic lifecycle management for embedded 3D scenes: probe the
//! device, mount a render surface in a host container, load the scene at
//! idle time, animate it with a damped orbit camera, and tear everything
//! down exactly once.

#![warn(missing_docs)]

pub mod config;
pub mod effects;
pub mod host;
pub mod interaction;
pub mod lifecycle;
pub mod math;
pub mod platform;
pub mod renderer;
pub mod scene;

pub use config::{ConfigError, SiteConfig};
pub use lifecycle::{CoordinatorDeps, LifecycleState, SceneCoordinator, SceneVariant};

/// Reports an operation on a torn-down or misused component.
///
/// Panics in debug builds; logs and carries on in release builds. Backends
/// implementing the core seams use it for the same contract.
#[doc(hidden)]
#[track_caller]
pub fn report_misuse(what: &str) {
    debug_assert!(false, "misuse: {what}");
    log::warn!("Ignoring misuse: {what}");
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "misuse: render on a disposed surface")]
    fn misuse_panics_in_debug_builds() {
        super::report_misuse("render on a disposed surface");
    }
}
