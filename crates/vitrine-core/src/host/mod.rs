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

//! The host scheduling seam.
//!
//! A [`Host`] owns the outside world: frame pacing, idle callbacks, container
//! resize observation and pointer delivery. Every registration returns a
//! token; callbacks come back as [`HostEvent`]s carrying that token, so a
//! coordinator can recognise and ignore stale deliveries after cancellation.

pub mod manual;

pub use self::manual::ManualHost;

use crate::interaction::PointerEvent;
use crate::renderer::ContainerSize;
use std::time::Duration;

/// A pending frame callback registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

/// A pending idle callback registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdleToken(pub u64);

/// A container resize observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverToken(pub u64);

/// A pointer listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerToken(pub u64);

/// A callback delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// The frame registered under `token` is due.
    Frame {
        /// The registration being honoured.
        token: FrameToken,
        /// Host time at the start of the frame.
        timestamp: Duration,
    },
    /// The idle callback registered under `token` is due.
    Idle {
        /// The registration being honoured.
        token: IdleToken,
    },
    /// The observed container changed size.
    Resize {
        /// The observation that fired.
        token: ObserverToken,
        /// The new content-box size.
        size: ContainerSize,
    },
    /// A pointer event for a listener.
    Pointer {
        /// The listener receiving it.
        token: ListenerToken,
        /// The event.
        event: PointerEvent,
    },
}

/// Scheduling primitives and ambient queries provided by the embedding page or window.
pub trait Host {
    /// The container's content-box size, or `None` when no container is attached.
    fn container_size(&self) -> Option<ContainerSize>;

    /// Device pixels per logical pixel.
    fn device_pixel_ratio(&self) -> f32;

    /// Requests a callback for the next frame.
    fn request_frame(&mut self) -> FrameToken;

    /// Cancels a frame request. Unknown tokens are ignored.
    fn cancel_frame(&mut self, token: FrameToken);

    /// Requests a callback at the next idle opportunity, or after `fallback`
    /// when the host has no idle scheduling.
    fn request_idle(&mut self, fallback: Duration) -> IdleToken;

    /// Cancels an idle request. Unknown tokens are ignored.
    fn cancel_idle(&mut self, token: IdleToken);

    /// Starts observing container resizes.
    fn observe_resize(&mut self) -> ObserverToken;

    /// Stops a resize observation.
    fn unobserve_resize(&mut self, token: ObserverToken);

    /// Starts delivering pointer events over the container.
    fn attach_pointer(&mut self) -> ListenerToken;

    /// Stops delivering pointer events to a listener.
    fn detach_pointer(&mut self, token: ListenerToken);
}

/// Something that consumes host callbacks.
pub trait HostEventSink {
    /// Handles one callback.
    fn handle_event(&mut self, event: HostEvent);
}
