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

//! The per-frame animation driver.

use super::state::LifecycleState;
use crate::host::{FrameToken, Host};
use std::time::Duration;

/// What a frame draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePass {
    /// Clear color only; the scene is not ready.
    Background,
    /// Scene content.
    Content,
}

impl FramePass {
    /// The pass for `state`, or `None` when nothing should be drawn.
    pub fn for_state(state: LifecycleState) -> Option<Self> {
        match state {
            LifecycleState::Ready => Some(FramePass::Content),
            LifecycleState::Mounted | LifecycleState::SceneLoading => Some(FramePass::Background),
            _ => None,
        }
    }
}

/// Counters kept by the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame callbacks requested from the host.
    pub scheduled: u64,
    /// Background-only frames rendered.
    pub background: u64,
    /// Frames that drew scene content.
    pub content: u64,
    /// Frames the surface failed to render.
    pub render_errors: u64,
}

impl FrameStats {
    /// All frames handed to the surface.
    pub fn rendered(&self) -> u64 {
        self.background + self.content
    }
}

/// Owns the single frame registration of an instance.
#[derive(Debug, Default)]
pub struct AnimationDriver {
    registration: Option<FrameToken>,
    last_timestamp: Option<Duration>,
    stats: FrameStats,
}

impl AnimationDriver {
    /// Creates an idle driver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the next frame unless one is already pending.
    pub fn schedule(&mut self, host: &mut dyn Host) {
        if self.registration.is_none() {
            self.registration = Some(host.request_frame());
            self.stats.scheduled += 1;
        }
    }

    /// Claims the pending registration if `token` matches it.
    ///
    /// Returns `false` for stale or unknown tokens.
    pub fn accept(&mut self, token: FrameToken, timestamp: Duration) -> bool {
        if self.registration != Some(token) {
            return false;
        }
        self.registration = None;
        self.last_timestamp = Some(timestamp);
        true
    }

    /// Takes and cancels the pending registration.
    pub fn stop(&mut self, host: &mut dyn Host) {
        if let Some(token) = self.registration.take() {
            host.cancel_frame(token);
        }
    }

    /// Records a rendered frame.
    pub fn record(&mut self, pass: FramePass) {
        match pass {
            FramePass::Background => self.stats.background += 1,
            FramePass::Content => self.stats.content += 1,
        }
    }

    /// Records a failed frame.
    pub fn record_error(&mut self) {
        self.stats.render_errors += 1;
    }

    /// Whether a frame callback is pending.
    pub fn is_scheduled(&self) -> bool {
        self.registration.is_some()
    }

    /// Host time of the last accepted frame.
    pub fn last_timestamp(&self) -> Option<Duration> {
        self.last_timestamp
    }

    /// Counters so far.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ManualHost;

    #[test]
    fn pass_follows_state() {
        assert_eq!(FramePass::for_state(LifecycleState::AwaitingCapability), None);
        assert_eq!(
            FramePass::for_state(LifecycleState::SceneLoading),
            Some(FramePass::Background)
        );
        assert_eq!(FramePass::for_state(LifecycleState::Ready), Some(FramePass::Content));
        assert_eq!(FramePass::for_state(LifecycleState::Disposed), None);
    }

    #[test]
    fn only_the_current_token_is_accepted() {
        let mut host = ManualHost::new(None);
        let mut driver = AnimationDriver::new();
        driver.schedule(&mut host);
        driver.schedule(&mut host);
        assert_eq!(host.pending_frames(), 1);

        let stale = FrameToken(u64::MAX);
        assert!(!driver.accept(stale, Duration::ZERO));
        let token = match host.advance_frame().as_slice() {
            [crate::host::HostEvent::Frame { token, .. }] => *token,
            other => panic!("unexpected events {other:?}"),
        };
        assert!(driver.accept(token, Duration::from_millis(16)));
        assert!(!driver.accept(token, Duration::from_millis(16)));
    }

    #[test]
    fn stop_cancels_the_host_registration() {
        let mut host = ManualHost::new(None);
        let mut driver = AnimationDriver::new();
        driver.schedule(&mut host);
        driver.stop(&mut host);
        assert!(!driver.is_scheduled());
        assert_eq!(host.pending_frames(), 0);
        assert!(host.advance_frame().is_empty());
    }
}
