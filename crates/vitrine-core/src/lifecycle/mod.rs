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

//! Scene instance lifecycle: states, variants, the frame driver and the coordinator.

pub mod coordinator;
pub mod driver;
pub mod state;
pub mod variant;

pub use self::coordinator::{CoordinatorDeps, SceneCoordinator};
pub use self::driver::{AnimationDriver, FramePass, FrameStats};
pub use self::state::LifecycleState;
pub use self::variant::{SceneVariant, SceneVariantBuilder, DEFAULT_IDLE_FALLBACK_MS};
