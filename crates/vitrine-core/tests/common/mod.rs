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

//! Recording doubles for the surface and loader seams.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use vitrine_core::host::{FrameToken, Host, IdleToken, ListenerToken, ManualHost, ObserverToken};
use vitrine_core::math::{LinearRgba, Mat4, Vec3};
use vitrine_core::platform::CapabilityProfile;
use vitrine_core::renderer::{
    ContainerSize, Projection, RenderFrame, RenderSurface, SurfaceConfig, SurfaceError, SurfaceExtent,
    SurfaceFactory,
};
use vitrine_core::scene::{
    LoadCompletion, LoadRequest, LoadedScene, SceneContent, SceneError, SceneHandle, SceneId,
    SceneLoader, SceneMesh,
};
use vitrine_core::{CoordinatorDeps, SceneCoordinator, SceneVariant};

pub const DESKTOP: CapabilityProfile = CapabilityProfile::new(false, 8.0, 8);
pub const MOBILE: CapabilityProfile = CapabilityProfile::new(true, 8.0, 8);

/// What happened, in order, across surfaces and scenes.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Created(SurfaceExtent, SurfaceConfig),
    Rendered {
        content: bool,
        view_projection: Mat4,
    },
    Resized(SurfaceExtent, Projection),
    Released(SceneId),
    SurfaceDisposed,
    SceneDisposed(SceneId),
    FrameCancelled,
    PointerDetached,
    ResizeUnobserved,
}

#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Entry>>>);

impl Journal {
    fn lock(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.0.lock().expect("journal poisoned")
    }

    pub fn push(&self, entry: Entry) {
        self.lock().push(entry);
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn count(&self, predicate: impl Fn(&Entry) -> bool) -> usize {
        self.lock().iter().filter(|entry| predicate(entry)).count()
    }

    pub fn content_frames(&self) -> usize {
        self.count(|entry| matches!(entry, Entry::Rendered { content: true, .. }))
    }

    pub fn background_frames(&self) -> usize {
        self.count(|entry| matches!(entry, Entry::Rendered { content: false, .. }))
    }

    pub fn renders(&self) -> usize {
        self.count(|entry| matches!(entry, Entry::Rendered { .. }))
    }

    pub fn position(&self, predicate: impl Fn(&Entry) -> bool) -> Option<usize> {
        self.lock().iter().position(predicate)
    }
}

/// Forwards to a [`ManualHost`] and journals the teardown-side calls.
pub struct JournaledHost {
    inner: ManualHost,
    journal: Journal,
}

impl Host for JournaledHost {
    fn container_size(&self) -> Option<ContainerSize> {
        self.inner.container_size()
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.inner.device_pixel_ratio()
    }

    fn request_frame(&mut self) -> FrameToken {
        self.inner.request_frame()
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.journal.push(Entry::FrameCancelled);
        self.inner.cancel_frame(token);
    }

    fn request_idle(&mut self, fallback: Duration) -> IdleToken {
        self.inner.request_idle(fallback)
    }

    fn cancel_idle(&mut self, token: IdleToken) {
        self.inner.cancel_idle(token);
    }

    fn observe_resize(&mut self) -> ObserverToken {
        self.inner.observe_resize()
    }

    fn unobserve_resize(&mut self, token: ObserverToken) {
        self.journal.push(Entry::ResizeUnobserved);
        self.inner.unobserve_resize(token);
    }

    fn attach_pointer(&mut self) -> ListenerToken {
        self.inner.attach_pointer()
    }

    fn detach_pointer(&mut self, token: ListenerToken) {
        self.journal.push(Entry::PointerDetached);
        self.inner.detach_pointer(token);
    }
}

thread_local! {
    static LOG_RECORDS: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Records log output per test thread.
struct ThreadLogger;

impl log::Log for ThreadLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        LOG_RECORDS.with(|records| {
            records
                .borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

static LOGGER: ThreadLogger = ThreadLogger;

/// Starts capturing this thread's log records, dropping earlier ones.
pub fn capture_logs() {
    // Only the first test to get here installs the logger.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(log::LevelFilter::Trace);
    LOG_RECORDS.with(|records| records.borrow_mut().clear());
}

/// Messages logged on this thread at exactly `level` since [`capture_logs`].
pub fn captured(level: log::Level) -> Vec<String> {
    LOG_RECORDS.with(|records| {
        records
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    })
}

pub struct RecordingSurface {
    journal: Journal,
    extent: SurfaceExtent,
    disposed: bool,
}

impl RenderSurface for RecordingSurface {
    fn extent(&self) -> SurfaceExtent {
        self.extent
    }

    fn resize(&mut self, extent: SurfaceExtent, projection: &Projection) {
        assert!(!self.disposed, "resize after dispose");
        self.extent = extent;
        self.journal.push(Entry::Resized(extent, *projection));
    }

    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), SurfaceError> {
        assert!(!self.disposed, "render after dispose");
        self.journal.push(Entry::Rendered {
            content: frame.has_content(),
            view_projection: frame.view_projection,
        });
        Ok(())
    }

    fn release_scene(&mut self, scene: SceneId) {
        self.journal.push(Entry::Released(scene));
    }

    fn dispose(&mut self) {
        assert!(!self.disposed, "surface disposed twice");
        self.disposed = true;
        self.journal.push(Entry::SurfaceDisposed);
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

pub struct RecordingFactory {
    pub journal: Journal,
    pub fail: bool,
}

impl SurfaceFactory for RecordingFactory {
    fn create(
        &mut self,
        extent: SurfaceExtent,
        config: &SurfaceConfig,
    ) -> Result<Box<dyn RenderSurface>, SurfaceError> {
        if self.fail {
            return Err(SurfaceError::Creation("no adapter".into()));
        }
        self.journal.push(Entry::Created(extent, *config));
        Ok(Box::new(RecordingSurface {
            journal: self.journal.clone(),
            extent,
            disposed: false,
        }))
    }
}

/// A scene that journals its disposal.
pub struct TrackedScene {
    inner: LoadedScene,
    journal: Journal,
}

impl SceneHandle for TrackedScene {
    fn id(&self) -> SceneId {
        self.inner.id()
    }

    fn label(&self) -> &str {
        self.inner.label()
    }

    fn content(&self) -> &SceneContent {
        self.inner.content()
    }

    fn dispose(&mut self) {
        let id = self.inner.id();
        self.inner.dispose();
        self.journal.push(Entry::SceneDisposed(id));
    }

    fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }
}

pub fn cube_scene(journal: &Journal) -> Box<dyn SceneHandle> {
    let positions = vec![
        Vec3::new(-50.0, -50.0, -50.0),
        Vec3::new(50.0, -50.0, -50.0),
        Vec3::new(50.0, 50.0, 50.0),
    ];
    let mesh = SceneMesh {
        normals: vec![Vec3::Z; positions.len()],
        positions,
        indices: vec![0, 1, 2],
        base_color: LinearRgba::WHITE,
    };
    Box::new(TrackedScene {
        inner: LoadedScene::new("cube", SceneContent::from_meshes(vec![mesh])),
        journal: journal.clone(),
    })
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Behaviour {
    /// Resolve with a scene once this much virtual time has passed.
    SucceedAfter(Duration),
    /// Resolve with an error immediately.
    Fail,
    /// Never resolve.
    Hang,
}

#[derive(Default)]
struct LoaderState {
    requests: Vec<String>,
    pending: Option<(LoadCompletion, Duration)>,
}

/// A loader driven by the virtual clock; call [`ScriptedLoader::pump`] after each step.
#[derive(Clone)]
pub struct ScriptedLoader {
    host: ManualHost,
    journal: Journal,
    behaviour: Behaviour,
    state: Rc<RefCell<LoaderState>>,
}

impl ScriptedLoader {
    pub fn new(host: &ManualHost, journal: &Journal, behaviour: Behaviour) -> Self {
        Self {
            host: host.clone(),
            journal: journal.clone(),
            behaviour,
            state: Rc::new(RefCell::new(LoaderState::default())),
        }
    }

    pub fn requests(&self) -> usize {
        self.state.borrow().requests.len()
    }

    pub fn requested_at(&self) -> Option<Duration> {
        self.state.borrow().pending.as_ref().map(|(_, at)| *at)
    }

    /// Resolves the pending load if its delay has elapsed.
    pub fn pump(&self) {
        let Behaviour::SucceedAfter(delay) = self.behaviour else {
            return;
        };
        let due = match &self.state.borrow().pending {
            Some((_, at)) => self.host.now() >= *at + delay,
            None => false,
        };
        if due {
            self.resolve_now();
        }
    }

    /// Resolves the pending load with a scene regardless of the clock.
    pub fn resolve_now(&self) {
        let pending = self.state.borrow_mut().pending.take();
        if let Some((completion, _)) = pending {
            completion.resolve(Ok(cube_scene(&self.journal)));
        }
    }
}

impl SceneLoader for ScriptedLoader {
    fn load(&mut self, request: LoadRequest) {
        let mut state = self.state.borrow_mut();
        state.requests.push(request.url.clone());
        match self.behaviour {
            Behaviour::Fail => request.completion.resolve(Err(SceneError::Fetch {
                url: request.url,
                reason: "404".into(),
            })),
            Behaviour::SucceedAfter(_) | Behaviour::Hang => {
                state.pending = Some((request.completion, self.host.now()));
            }
        }
    }
}

pub struct Harness {
    pub host: ManualHost,
    pub journal: Journal,
    pub loader: ScriptedLoader,
    pub coordinator: SceneCoordinator,
}

impl Harness {
    pub fn new(variant: SceneVariant, host: ManualHost, behaviour: Behaviour) -> Self {
        Self::with_factory(variant, host, behaviour, false)
    }

    pub fn with_factory(
        variant: SceneVariant,
        host: ManualHost,
        behaviour: Behaviour,
        fail_surface: bool,
    ) -> Self {
        let journal = Journal::default();
        let loader = ScriptedLoader::new(&host, &journal, behaviour);
        let coordinator = SceneCoordinator::new(
            variant,
            CoordinatorDeps {
                host: Box::new(JournaledHost {
                    inner: host.clone(),
                    journal: journal.clone(),
                }),
                surfaces: Box::new(RecordingFactory {
                    journal: journal.clone(),
                    fail: fail_surface,
                }),
                loader: Box::new(loader.clone()),
            },
        );
        Self {
            host,
            journal,
            loader,
            coordinator,
        }
    }

    /// One virtual frame, then lets the loader resolve if due.
    pub fn step(&mut self) {
        self.host.step(&mut self.coordinator);
        self.loader.pump();
    }

    pub fn run_for(&mut self, duration: Duration) {
        let deadline = self.host.now() + duration;
        while self.host.now() < deadline {
            self.step();
        }
    }

    pub fn run_until(&mut self, limit: Duration, done: impl Fn(&SceneCoordinator) -> bool) {
        let deadline = self.host.now() + limit;
        while !done(&self.coordinator) && self.host.now() < deadline {
            self.step();
        }
    }
}
