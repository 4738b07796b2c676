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

//! A [`Host`] backed by a `winit` window.
//!
//! `winit` has no callback registry, so the host keeps the registrations and
//! the application's event handler asks it which callbacks are due:
//! redraws honour frame requests, `about_to_wait` is the idle opportunity,
//! and window resizes and pointer input fan out to their observers.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use vitrine_core::host::{
    FrameToken, Host, HostEvent, IdleToken, ListenerToken, ObserverToken,
};
use vitrine_core::interaction::PointerEvent;
use vitrine_core::renderer::ContainerSize;
use winit::dpi::PhysicalSize;
use winit::window::Window;

#[derive(Debug)]
struct WinitHostState {
    window: Arc<Window>,
    started: Instant,
    next_token: u64,
    frames: Vec<FrameToken>,
    idles: Vec<IdleToken>,
    observers: Vec<ObserverToken>,
    listeners: Vec<ListenerToken>,
}

impl WinitHostState {
    fn next_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }
}

/// A cheaply cloneable handle to the window's callback registrations.
#[derive(Debug, Clone)]
pub struct WinitHost {
    state: Rc<RefCell<WinitHostState>>,
}

impl WinitHost {
    /// Wraps `window`.
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            state: Rc::new(RefCell::new(WinitHostState {
                window,
                started: Instant::now(),
                next_token: 0,
                frames: Vec::new(),
                idles: Vec::new(),
                observers: Vec::new(),
                listeners: Vec::new(),
            })),
        }
    }

    /// Frame callbacks due on `RedrawRequested`.
    pub fn frame_events(&self) -> Vec<HostEvent> {
        let mut state = self.state.borrow_mut();
        let timestamp = state.started.elapsed();
        state
            .frames
            .drain(..)
            .map(|token| HostEvent::Frame { token, timestamp })
            .collect()
    }

    /// Idle callbacks due when the event loop is about to wait.
    pub fn idle_events(&self) -> Vec<HostEvent> {
        self.state
            .borrow_mut()
            .idles
            .drain(..)
            .map(|token| HostEvent::Idle { token })
            .collect()
    }

    /// Resize notifications for a new physical window size.
    pub fn resize_events(&self, size: PhysicalSize<u32>) -> Vec<HostEvent> {
        let state = self.state.borrow();
        let logical = size.to_logical::<u32>(state.window.scale_factor());
        let size = ContainerSize::new(logical.width, logical.height);
        state
            .observers
            .iter()
            .map(|&token| HostEvent::Resize { token, size })
            .collect()
    }

    /// Pointer deliveries for every listener.
    pub fn pointer_events(&self, event: PointerEvent) -> Vec<HostEvent> {
        self.state
            .borrow()
            .listeners
            .iter()
            .map(|&token| HostEvent::Pointer { token, event })
            .collect()
    }
}

impl Host for WinitHost {
    fn container_size(&self) -> Option<ContainerSize> {
        let state = self.state.borrow();
        let size = state.window.inner_size();
        if size.width == 0 || size.height == 0 {
            // Minimised windows report zero; there is nothing to attach to.
            return None;
        }
        let logical = size.to_logical::<u32>(state.window.scale_factor());
        Some(ContainerSize::new(logical.width, logical.height))
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.state.borrow().window.scale_factor() as f32
    }

    fn request_frame(&mut self) -> FrameToken {
        let mut state = self.state.borrow_mut();
        let token = FrameToken(state.next_token());
        state.frames.push(token);
        state.window.request_redraw();
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.state
            .borrow_mut()
            .frames
            .retain(|&pending| pending != token);
    }

    fn request_idle(&mut self, _fallback: Duration) -> IdleToken {
        // The event loop always reaches `about_to_wait`, so no fallback timer is needed.
        let mut state = self.state.borrow_mut();
        let token = IdleToken(state.next_token());
        state.idles.push(token);
        token
    }

    fn cancel_idle(&mut self, token: IdleToken) {
        self.state
            .borrow_mut()
            .idles
            .retain(|&pending| pending != token);
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
