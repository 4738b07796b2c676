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

use std::fmt;

/// The lifecycle of one mounted scene instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Constructed, not yet mounted.
    Initializing,
    /// Mounted; waiting for the device capability profile.
    AwaitingCapability,
    /// Surface, camera and controller exist; the background frame loop runs.
    Mounted,
    /// The scene asset is being fetched.
    SceneLoading,
    /// The scene is loaded and drawn every frame.
    Ready,
    /// Torn down. Terminal.
    Disposed,
}

impl LifecycleState {
    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Initializing, AwaitingCapability)
                | (AwaitingCapability, Mounted)
                | (Mounted, SceneLoading)
                | (SceneLoading, Ready)
                | (SceneLoading, Mounted)
        ) || (self != Disposed && next == Disposed)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Initializing => "initializing",
            LifecycleState::AwaitingCapability => "awaiting-capability",
            LifecycleState::Mounted => "mounted",
            LifecycleState::SceneLoading => "scene-loading",
            LifecycleState::Ready => "ready",
            LifecycleState::Disposed => "disposed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::LifecycleState::*;

    #[test]
    fn forward_path_is_legal() {
        assert!(Initializing.can_transition_to(AwaitingCapability));
        assert!(AwaitingCapability.can_transition_to(Mounted));
        assert!(Mounted.can_transition_to(SceneLoading));
        assert!(SceneLoading.can_transition_to(Ready));
        assert!(SceneLoading.can_transition_to(Mounted));
    }

    #[test]
    fn disposed_is_terminal_and_reachable_from_anywhere() {
        for state in [Initializing, AwaitingCapability, Mounted, SceneLoading, Ready] {
            assert!(state.can_transition_to(Disposed));
            assert!(!Disposed.can_transition_to(state));
        }
        assert!(!Disposed.can_transition_to(Disposed));
    }

    #[test]
    fn shortcuts_are_rejected() {
        assert!(!Initializing.can_transition_to(Mounted));
        assert!(!Mounted.can_transition_to(Ready));
        assert!(!Ready.can_transition_to(SceneLoading));
    }
}
