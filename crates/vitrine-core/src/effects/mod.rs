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

//! Page decoration effects.
//!
//! These are pure state machines: they take pointer, scroll or time input
//! and produce positions and transforms for a presentation layer to apply.
//! [`CursorGlow`] is owned by each mounted scene and stepped on its frame
//! clock (see `SceneCoordinator::cursor_glow`). The floating field and the
//! parallax grid are standalone: the page that hosts them samples them.

pub mod cursor_glow;
pub mod easing;
pub mod floating;
pub mod parallax;
pub mod spring;

pub use self::cursor_glow::{CursorGlow, GlowPlacement};
pub use self::easing::Easing;
pub use self::floating::{ElementKind, ElementPose, FloatingElement, FloatingField, Keyframes, Track};
pub use self::parallax::{ParallaxGrid, ParallaxPose, ParallaxRow};
pub use self::spring::{Spring, SpringConfig};
