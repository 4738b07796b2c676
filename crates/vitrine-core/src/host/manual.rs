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

//! A deterministic, windowless [`Host`] with a virtual clock.
//!
//! Each call to [`ManualHost::advance_frame`] moves the clock forward one
//! frame interval and releases, in order: queued resize and pointer events,
//! every due frame callback, then due idle callbacks. Handles are cheap
//! clones sharing one state, so a test can keep one while the coordinator
//! owns another.

use super::{
    FrameToken, Host, HostEvent, HostEventSink, IdleToken, ListenerToken, ObserverToken,
};
use crate::interaction::PointerEvent;
use crate::renderer::ContainerSize;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

/// The default virtual frame interval.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug)]
struct ManualHostState {
    clock: Duration,
    frame_interval: Duration,
    container: Option<ContainerSize>,
    device_pixel_ratio: f32,
    idle_supported: bool,
    next_token: u64,
    frames: Vec<FrameToken>,
    idles: Vec<(IdleToken, Duration)>,
    observers: Vec<ObserverToken>,
    listeners: Vec<ListenerToken>,
    queued: VecDeque<HostEvent>,
    frames_requested: u64,
    frames_cancelled: u64,
    idles_requested: u64,
}

impl ManualHostState {
    fn next_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }
}

/// A shared handle to a virtual host.
#[derive(Debug, Clone)]
pub struct ManualHost {
    state: Rc<RefCell<ManualHostState>>,
}

impl ManualHost {
    /// Creates a host with the given container, pixel ratio 1 and idle support.
    pub fn new(container: Option<ContainerSize>) -> Self {
        Self {
            state: Rc::new(RefCell::new(ManualHostState {
                clock: Duration::ZERO,
                frame_interval: DEFAULT_FRAME_INTERVAL,
                container,
                device_pixel_ratio: 1.0,
                idle_supported: true,
                next_token: 0,
                frames: Vec::new(),
                idles: Vec::new(),
                observers: Vec::new(),
                listeners: Vec::new(),
                queued: VecDeque::new(),
                frames_requested: 0,
                frames_cancelled: 0,
                idles_requested: 0,
            })),
        }
    }

    /// Sets the reported device pixel ratio.
    pub fn with_device_pixel_ratio(self, ratio: f32) -> Self {
        self.state.borrow_mut().device_pixel_ratio = ratio;
        self
    }

    /// Disables idle scheduling, so idle requests wait for their fallback delay.
    pub fn without_idle_support(self) -> Self {
        self.state.borrow_mut().idle_supported = false;
        self
    }

    /// Overrides the frame interval.
    pub fn with_frame_interval(self, interval: Duration) -> Self {
        self.state.borrow_mut().frame_interval = interval;
        self
    }

    /// The virtual clock.
    pub fn now(&self) -> Duration {
        self.state.borrow().clock
    }

    /// Frame callbacks currently registered.
    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    /// Idle callbacks currently registered.
    pub fn pending_idles(&self) -> usize {
        self.state.borrow().idles.len()
    }

    /// Active resize observations.
    pub fn observer_count(&self) -> usize {
        self.state.borrow().observers.len()
    }

    /// Active pointer listeners.
    pub fn pointer_listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// Total frame requests ever made.
    pub fn frames_requested(&self) -> u64 {
        self.state.borrow().frames_requested
    }

    /// Total frame requests cancelled.
    pub fn frames_cancelled(&self) -> u64 {
        self.state.borrow().frames_cancelled
    }

    /// Total idle requests ever made.
    pub fn idles_requested(&self) -> u64 {
        self.state.borrow().idles_requested
    }

    /// Detaches the container, as if the element left the page.
    pub fn detach_container(&self) {
        self.state.borrow_mut().container = None;
    }

    /// Resizes the container and queues a resize event for every observer.
    pub fn resize_container(&self, size: ContainerSize) {
        let mut state = self.state.borrow_mut();
        state.container = Some(size);
        let events: Vec<HostEvent> = state
            .observers
            .iter()
            .map(|&token| HostEvent::Resize { token, size })
            .collect();
        state.queued.extend(events);
    }

    /// Queues `event` for every pointer listener.
    pub fn send_pointer(&self, event: PointerEvent) {
        let mut state = self.state.borrow_mut();
        let events: Vec<HostEvent> = state
            .listeners
            .iter()
            .map(|&token| HostEvent::Pointer { token, event })
            .collect();
        state.queued.extend(events);
    }

    /// Queues an arbitrary event, including stale ones, for the next frame.
    pub fn inject(&self, event: HostEvent) {
        self.state.borrow_mut().queued.push_back(event);
    }

    /// Advances the clock one frame interval and returns the events now due.
    ///
    /// Frame registrations are consumed; callers re-request as a browser would.
    pub fn advance_frame(&self) -> Vec<HostEvent> {
        let mut state = self.state.borrow_mut();
        let interval = state.frame_interval;
        state.clock += interval;
        let now = state.clock;

        let mut events: Vec<HostEvent> = state.queued.drain(..).collect();
        events.extend(
            state
                .frames
                .drain(..)
                .map(|token| HostEvent::Frame { token, timestamp: now }),
        );

        let idle_supported = state.idle_supported;
        let (due, pending): (Vec<_>, Vec<_>) = state
            .idles
            .drain(..)
            .partition(|&(_, deadline)| idle_supported || deadline <= now);
        state.idles = pending;
        events.extend(due.into_iter().map(|(token, _)| HostEvent::Idle { token }));
        events
    }

    /// Advances one frame and dispatches its events to `sink`.
    pub fn step(&self, sink: &mut dyn HostEventSink) {
        for event in self.advance_frame() {
            sink.handle_event(event);
        }
    }

    /// Steps frames until at least `duration` of virtual time has passed.
    pub fn run_for(&self, sink: &mut dyn HostEventSink, duration: Duration) {
        let deadline = self.now() + duration;
        while self.now() < deadline {
            self.step(sink);
        }
    }
}

impl Host for ManualHost {
    fn container_size(&self) -> Option<ContainerSize> {
        self.state.borrow().container
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.state.borrow().device_pixel_ratio
    }

    fn request_frame(&mut self) -> FrameToken {
        let mut state = self.state.borrow_mut();
        let token = FrameToken(state.next_token());
        state.frames.push(token);
        state.frames_requested += 1;
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        let mut state = self.state.borrow_mut();
        let before = state.frames.len();
        state.frames.retain(|&pending| pending != token);
        if state.frames.len() != before {
            state.frames_cancelled += 1;
        }
    }

    fn request_idle(&mut self, fallback: Duration) -> IdleToken {
        let mut state = self.state.borrow_mut();
        let token = IdleToken(state.next_token());
        let deadline = state.clock + fallback;
        state.idles.push((token, deadline));
        state.idles_requested += 1;
        token
    }

    fn cancel_idle(&mut self, token: IdleToken) {
        self.state
            .borrow_mut()
            .idles
            .retain(|&(pending, _)| pending != token);
    }

    fn observe_resize(&mut self) -> ObserverToken {
        let mut state = self.state.borrow_mut();
        let token = ObserverToken(state.next_token());
        state.observers.push(token);
        token
    }

    fn unobserve_resize(&mut self, token: ObserverToken) {
        self.state
            .borrow_mut()
            .observers
            .retain(|&observer| observer != token);
    }

    fn attach_pointer(&mut self) -> ListenerToken {
        let mut state = self.state.borrow_mut();
        let token = ListenerToken(state.next_token());
        state.listeners.push(token);
        token
    }

    fn detach_pointer(&mut self, token: ListenerToken) {
        self.state
            .borrow_mut()
            .listeners
            .retain(|&listener| listener != token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<HostEvent>);

    impl HostEventSink for Recorder {
        fn handle_event(&mut self, event: HostEvent) {
            self.0.push(event);
        }
    }

    #[test]
    fn frames_fire_once_per_request() {
        let mut host = ManualHost::new(Some(ContainerSize::new(100, 100)));
        let token = host.request_frame();
        let events = host.advance_frame();
        assert_eq!(
            events,
            vec![HostEvent::Frame {
                token,
                timestamp: DEFAULT_FRAME_INTERVAL
            }]
        );
        assert!(host.advance_frame().is_empty());
    }

    #[test]
    fn cancelled_frames_never_fire() {
        let mut host = ManualHost::new(None);
        let token = host.request_frame();
        host.cancel_frame(token);
        assert!(host.advance_frame().is_empty());
        assert_eq!(host.frames_cancelled(), 1);
    }

    #[test]
    fn idle_falls_back_to_delay_without_support() {
        let mut host = ManualHost::new(None).without_idle_support();
        let token = host.request_idle(Duration::from_millis(200));
        let mut recorder = Recorder::default();
        host.run_for(&mut recorder, Duration::from_millis(192));
        assert!(recorder.0.is_empty());
        host.step(&mut recorder);
        assert_eq!(recorder.0, vec![HostEvent::Idle { token }]);
    }

    #[test]
    fn idle_fires_after_the_next_frame_when_supported() {
        let mut host = ManualHost::new(None);
        let frame = host.request_frame();
        let idle = host.request_idle(Duration::from_millis(200));
        let events = host.advance_frame();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], HostEvent::Frame { token, .. } if token == frame));
        assert_eq!(events[1], HostEvent::Idle { token: idle });
    }

    #[test]
    fn resize_reaches_only_current_observers() {
        let mut host = ManualHost::new(Some(ContainerSize::new(100, 100)));
        let kept = host.observe_resize();
        let removed = host.observe_resize();
        host.unobserve_resize(removed);
        let size = ContainerSize::new(300, 200);
        host.resize_container(size);
        assert_eq!(host.container_size(), Some(size));
        assert_eq!(
            host.advance_frame(),
            vec![HostEvent::Resize { token: kept, size }]
        );
    }
}
