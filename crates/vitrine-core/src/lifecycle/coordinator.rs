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

//! The lifecycle coordinator: one per embedded scene instance.
//!
//! The coordinator is the single owner of everything an instance acquires
//! from its host and backend. Composition happens once, when the capability
//! profile arrives; teardown happens once, from [`SceneCoordinator::unmount`]
//! or `Drop`, and releases resources in a fixed order:
//!
//! 1. frame scheduling (and any pending idle callback),
//! 2. the loaded scene,
//! 3. the orbit controller's pointer listener,
//! 4. the render surface,
//! 5. the resize observer.
//!
//! The async scene load never touches coordinator state directly. Its outcome
//! lands on a one-slot channel that the coordinator drains at the top of each
//! frame, so the `Ready` gate flips between frames and never mid-render.

use super::driver::{AnimationDriver, FramePass, FrameStats};
use super::state::LifecycleState;
use super::variant::SceneVariant;
use crate::effects::{CursorGlow, GlowPlacement};
use crate::host::{FrameToken, Host, HostEvent, HostEventSink, IdleToken, ListenerToken, ObserverToken};
use crate::interaction::{OrbitController, PointerEvent};
use crate::platform::{probe, CapabilityProfile, EnvironmentSignals};
use crate::renderer::{
    Camera, ContainerSize, Projection, RenderFrame, RenderSurface, SurfaceConfig, SurfaceExtent,
    SurfaceFactory,
};
use crate::scene::{LoadCompletion, LoadOutcome, LoadRequest, SceneError, SceneHandle, SceneLoader};
use std::time::Duration;

/// The collaborators a coordinator drives.
pub struct CoordinatorDeps {
    /// Scheduling, container and pointer access.
    pub host: Box<dyn Host>,
    /// Creates the render surface at composition.
    pub surfaces: Box<dyn SurfaceFactory>,
    /// Fetches the scene asset.
    pub loader: Box<dyn SceneLoader>,
}

/// Resources that exist only while a surface is mounted.
struct MountedScene {
    config: SurfaceConfig,
    surface: Box<dyn RenderSurface>,
    camera: Camera,
    controller: OrbitController,
    glow: CursorGlow,
    observer: Option<ObserverToken>,
    scene: Option<Box<dyn SceneHandle>>,
}

/// Drives one scene instance from mount to teardown.
pub struct SceneCoordinator {
    variant: SceneVariant,
    host: Box<dyn Host>,
    surfaces: Box<dyn SurfaceFactory>,
    loader: Box<dyn SceneLoader>,
    state: LifecycleState,
    transitions: Vec<LifecycleState>,
    profile: Option<CapabilityProfile>,
    mounted: Option<MountedScene>,
    driver: AnimationDriver,
    idle: Option<IdleToken>,
    pending_load: Option<flume::Receiver<LoadOutcome>>,
    load_attempts: u32,
    load_failed: bool,
}

impl SceneCoordinator {
    /// Creates an unmounted coordinator for `variant`.
    pub fn new(variant: SceneVariant, deps: CoordinatorDeps) -> Self {
        Self {
            variant,
            host: deps.host,
            surfaces: deps.surfaces,
            loader: deps.loader,
            state: LifecycleState::Initializing,
            transitions: vec![LifecycleState::Initializing],
            profile: None,
            mounted: None,
            driver: AnimationDriver::new(),
            idle: None,
            pending_load: None,
            load_attempts: 0,
            load_failed: false,
        }
    }

    /// Marks the instance mounted; composition waits for [`Self::resolve_capability`].
    pub fn mount(&mut self) {
        if self.state != LifecycleState::Initializing {
            crate::report_misuse("SceneCoordinator::mount called more than once");
            return;
        }
        log::info!("Mounting scene '{}'", self.variant.name);
        self.transition(LifecycleState::AwaitingCapability);
    }

    /// Mounts and resolves the capability profile from `signals` in one step.
    pub fn mount_with(&mut self, signals: &dyn EnvironmentSignals) {
        self.mount();
        self.resolve_capability(probe(signals));
    }

    /// Composes the surface, camera and controller for `profile`.
    ///
    /// Only the first resolution while awaiting capability has any effect.
    /// Without a container nothing is started, and composition is not retried.
    pub fn resolve_capability(&mut self, profile: CapabilityProfile) {
        if self.state != LifecycleState::AwaitingCapability || self.profile.is_some() {
            log::debug!(
                "Scene '{}': ignoring capability resolution in state {}",
                self.variant.name,
                self.state
            );
            return;
        }
        self.profile = Some(profile);

        let Some(container) = self.host.container_size() else {
            log::warn!(
                "Scene '{}': no container attached, nothing will be rendered",
                self.variant.name
            );
            return;
        };

        let config = SurfaceConfig::derive(
            &profile,
            &self.variant.quality,
            &self.variant.projection,
            container,
        );
        let extent = SurfaceExtent::new(
            container,
            config.effective_pixel_ratio(self.host.device_pixel_ratio()),
        );
        let surface = match self.surfaces.create(extent, &config) {
            Ok(surface) => surface,
            Err(error) => {
                log::error!(
                    "Scene '{}': render surface creation failed: {error}",
                    self.variant.name
                );
                self.unmount();
                return;
            }
        };
        log::info!(
            "Scene '{}': surface {}x{} (ratio {:.2}, antialias {}, tier {:?})",
            self.variant.name,
            extent.physical_width(),
            extent.physical_height(),
            extent.pixel_ratio,
            config.antialias,
            profile.tier()
        );

        let camera = Camera::new(self.variant.camera, config.projection);
        let listener = self.host.attach_pointer();
        let controller = OrbitController::new(
            &camera,
            extent,
            self.variant.orbit.clone(),
            profile.is_mobile,
            listener,
        );
        let observer = self.host.observe_resize();
        self.mounted = Some(MountedScene {
            config,
            surface,
            camera,
            controller,
            glow: CursorGlow::new(),
            observer: Some(observer),
            scene: None,
        });
        self.transition(LifecycleState::Mounted);

        self.driver.schedule(self.host.as_mut());
        self.idle = Some(self.host.request_idle(self.variant.idle_fallback()));
    }

    /// Dispatches a host callback.
    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::Frame { token, timestamp } => self.on_frame(token, timestamp),
            HostEvent::Idle { token } => self.on_idle(token),
            HostEvent::Resize { token, size } => self.on_resize(token, size),
            HostEvent::Pointer { token, event } => self.on_pointer(token, &event),
        }
    }

    fn on_frame(&mut self, token: FrameToken, timestamp: Duration) {
        if self.state == LifecycleState::Disposed || !self.driver.accept(token, timestamp) {
            log::debug!("Scene '{}': ignoring stale frame {token:?}", self.variant.name);
            return;
        }
        self.poll_load();

        if let (Some(pass), Some(mounted)) =
            (FramePass::for_state(self.state), self.mounted.as_mut())
        {
            mounted.controller.update(&mut mounted.camera);
            mounted.glow.step();
            let frame = RenderFrame {
                view_projection: mounted.camera.view_projection(),
                camera_position: mounted.camera.position,
                clear_color: self.variant.background,
                scene: match pass {
                    FramePass::Content => mounted.scene.as_deref(),
                    FramePass::Background => None,
                },
            };
            match mounted.surface.render(&frame) {
                Ok(()) => self.driver.record(pass),
                Err(error) => {
                    log::warn!("Scene '{}': frame failed: {error}", self.variant.name);
                    self.driver.record_error();
                }
            }
        }
        self.driver.schedule(self.host.as_mut());
    }

    fn on_idle(&mut self, token: IdleToken) {
        if self.idle != Some(token) {
            log::debug!("Scene '{}': ignoring stale idle {token:?}", self.variant.name);
            return;
        }
        self.idle = None;
        if self.state != LifecycleState::Mounted || self.load_attempts > 0 {
            return;
        }
        self.begin_load();
    }

    fn begin_load(&mut self) {
        let url = self.variant.asset_url.clone();
        log::info!("Scene '{}': loading '{url}'", self.variant.name);
        let (completion, receiver) = LoadCompletion::channel(url.clone());
        self.pending_load = Some(receiver);
        self.load_attempts += 1;
        self.transition(LifecycleState::SceneLoading);
        self.loader.load(LoadRequest { url, completion });
    }

    /// Observes the load outcome if it has arrived. Called at the top of every frame.
    pub fn poll_load(&mut self) {
        if self.state != LifecycleState::SceneLoading {
            return;
        }
        let Some(receiver) = self.pending_load.as_ref() else {
            return;
        };
        let outcome = match receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(flume::TryRecvError::Empty) => return,
            Err(flume::TryRecvError::Disconnected) => Err(SceneError::Abandoned {
                url: self.variant.asset_url.clone(),
            }),
        };
        self.pending_load = None;

        match outcome {
            Ok(scene) => self.install_scene(scene),
            Err(error) => {
                log::error!("Scene '{}': {error}", self.variant.name);
                self.load_failed = true;
                self.transition(LifecycleState::Mounted);
            }
        }
    }

    fn install_scene(&mut self, mut scene: Box<dyn SceneHandle>) {
        let Some(mounted) = self.mounted.as_mut() else {
            scene.dispose();
            return;
        };
        if let (Some(fit), Some(bounds)) = (self.variant.fit_to_scene, scene.bounds()) {
            if mounted.camera.frame_bounds(&bounds, &fit) {
                mounted.controller.sync_from_camera(&mounted.camera);
            }
        }
        log::info!(
            "Scene '{}': '{}' ready ({} meshes, {} triangles)",
            self.variant.name,
            scene.label(),
            scene.content().meshes.len(),
            scene
                .content()
                .meshes
                .iter()
                .map(|mesh| mesh.triangle_count())
                .sum::<usize>()
        );
        mounted.scene = Some(scene);
        self.transition(LifecycleState::Ready);
    }

    fn on_resize(&mut self, token: ObserverToken, size: ContainerSize) {
        if self.state == LifecycleState::Disposed {
            return;
        }
        let Some(mounted) = self.mounted.as_mut() else {
            return;
        };
        if mounted.observer != Some(token) {
            log::debug!("Scene '{}': ignoring foreign resize {token:?}", self.variant.name);
            return;
        }
        let is_mobile = self.profile.is_some_and(|profile| profile.is_mobile);
        let projection = Projection::resolve(&self.variant.projection, size, is_mobile);
        let extent = SurfaceExtent::new(
            size,
            mounted
                .config
                .effective_pixel_ratio(self.host.device_pixel_ratio()),
        );
        mounted.config.projection = projection;
        mounted.camera.projection = projection;
        mounted.surface.resize(extent, &projection);
        mounted.controller.set_extent(extent);
        log::debug!(
            "Scene '{}': resized to {}x{}",
            self.variant.name,
            size.width,
            size.height
        );
    }

    fn on_pointer(&mut self, token: ListenerToken, event: &PointerEvent) {
        if let Some(mounted) = self.mounted.as_mut() {
            if mounted.controller.listener() == token {
                mounted.controller.handle_pointer(event);
                mounted.glow.pointer_moved(event.position);
            }
        }
    }

    /// Tears the instance down. Safe to call any number of times.
    pub fn unmount(&mut self) {
        if self.state == LifecycleState::Disposed {
            return;
        }
        self.transition(LifecycleState::Disposed);

        self.driver.stop(self.host.as_mut());
        if let Some(idle) = self.idle.take() {
            self.host.cancel_idle(idle);
        }
        // Late completions dispose their own scene once the receiver is gone.
        self.pending_load = None;

        if let Some(mut mounted) = self.mounted.take() {
            if let Some(mut scene) = mounted.scene.take() {
                mounted.surface.release_scene(scene.id());
                scene.dispose();
            }
            mounted.controller.dispose(self.host.as_mut());
            mounted.surface.dispose();
            if let Some(observer) = mounted.observer.take() {
                self.host.unobserve_resize(observer);
            }
        }

        let stats = self.driver.stats();
        log::info!(
            "Scene '{}' disposed after {} frames ({} with content, {} failed)",
            self.variant.name,
            stats.rendered(),
            stats.content,
            stats.render_errors
        );
    }

    fn transition(&mut self, next: LifecycleState) {
        if !self.state.can_transition_to(next) {
            crate::report_misuse("illegal lifecycle transition");
            log::warn!("Scene '{}': rejected {} -> {next}", self.variant.name, self.state);
            return;
        }
        log::debug!("Scene '{}': {} -> {next}", self.variant.name, self.state);
        self.state = next;
        self.transitions.push(next);
    }

    /// Current state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Every state entered so far, starting with `Initializing`.
    pub fn transitions(&self) -> &[LifecycleState] {
        &self.transitions
    }

    /// The variant this instance renders.
    pub fn variant(&self) -> &SceneVariant {
        &self.variant
    }

    /// The profile composition used, once resolved.
    pub fn profile(&self) -> Option<CapabilityProfile> {
        self.profile
    }

    /// The surface configuration while mounted.
    pub fn surface_config(&self) -> Option<&SurfaceConfig> {
        self.mounted.as_ref().map(|mounted| &mounted.config)
    }

    /// The camera while mounted.
    pub fn camera(&self) -> Option<&Camera> {
        self.mounted.as_ref().map(|mounted| &mounted.camera)
    }

    /// The loaded scene while ready.
    pub fn scene(&self) -> Option<&dyn SceneHandle> {
        self.mounted.as_ref().and_then(|mounted| mounted.scene.as_deref())
    }

    /// Where the cursor glow sits after the most recent frame.
    pub fn cursor_glow(&self) -> Option<GlowPlacement> {
        self.mounted.as_ref().map(|mounted| mounted.glow.placement())
    }

    /// Driver counters.
    pub fn frame_stats(&self) -> FrameStats {
        self.driver.stats()
    }

    /// How many loads were started. Never more than one.
    pub fn load_attempts(&self) -> u32 {
        self.load_attempts
    }

    /// Whether the load failed.
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    /// The loading text to show, while the scene is still on its way.
    pub fn placeholder(&self) -> Option<&str> {
        match self.state {
            LifecycleState::AwaitingCapability
            | LifecycleState::Mounted
            | LifecycleState::SceneLoading
                if !self.load_failed =>
            {
                self.variant.placeholder.as_deref()
            }
            _ => None,
        }
    }
}

impl HostEventSink for SceneCoordinator {
    fn handle_event(&mut self, event: HostEvent) {
        SceneCoordinator::handle_event(self, event);
    }
}

impl Drop for SceneCoordinator {
    fn drop(&mut self) {
        self.unmount();
    }
}
