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

//! # Vitrine Runtime
//!
//! Opens a window standing in for a page container and mounts one scene
//! variant into it. The window's redraws, idle turns, resizes and pointer
//! input are routed to the coordinator through a [`WinitHost`].

mod args;

use anyhow::Result;
use args::Args;
use clap::Parser;
use std::path::PathBuf;
use tokio::runtime::Handle;
use vitrine_core::host::HostEvent;
use vitrine_core::platform::{
    capability::{LOW_TIER_CORES, LOW_TIER_MEMORY_GB},
    probe, CapabilityProfile, StaticSignals, Tier,
};
use vitrine_core::{CoordinatorDeps, LifecycleState, SceneCoordinator, SceneVariant, SiteConfig};
use vitrine_infra::{
    GltfSceneLoader, PointerTranslator, SysinfoSignals, WgpuSurfaceFactory, WinitHost,
    WinitWindowBuilder,
};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

/// Everything that exists once the window does.
struct Mounted {
    host: WinitHost,
    translator: PointerTranslator,
    coordinator: SceneCoordinator,
}

impl Mounted {
    fn dispatch(&mut self, events: Vec<HostEvent>) {
        for event in events {
            self.coordinator.handle_event(event);
        }
    }
}

struct Viewer {
    variant: SceneVariant,
    signals: Option<StaticSignals>,
    tier: Option<Tier>,
    runtime: Handle,
    asset_root: PathBuf,
    mounted: Option<Mounted>,
}

impl Viewer {
    fn profile(&self) -> CapabilityProfile {
        match (self.tier, &self.signals) {
            (Some(Tier::Low), _) => {
                CapabilityProfile::new(false, LOW_TIER_MEMORY_GB, LOW_TIER_CORES)
            }
            (Some(Tier::High), _) => CapabilityProfile::new(false, 8.0, 8),
            (None, Some(signals)) => probe(signals),
            (None, None) => probe(&SysinfoSignals::new()),
        }
    }

    fn mount(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let transparent = self.variant.background.a < 1.0;
        let window = WinitWindowBuilder::new()
            .with_title(format!("Vitrine: {}", self.variant.name))
            .with_transparency(transparent)
            .build(event_loop)?;

        let host = WinitHost::new(window.clone());
        let translator = PointerTranslator::new(window.scale_factor());
        let deps = CoordinatorDeps {
            host: Box::new(host.clone()),
            surfaces: Box::new(WgpuSurfaceFactory::new(window).with_transparency(transparent)),
            loader: Box::new(GltfSceneLoader::new(
                self.runtime.clone(),
                self.asset_root.clone(),
            )),
        };

        let mut coordinator = SceneCoordinator::new(self.variant.clone(), deps);
        coordinator.mount();
        let profile = self.profile();
        log::info!("Capability profile: {profile:?} (tier {:?})", profile.tier());
        coordinator.resolve_capability(profile);

        self.mounted = Some(Mounted {
            host,
            translator,
            coordinator,
        });
        Ok(())
    }
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.mounted.is_some() {
            return;
        }
        if let Err(e) = self.mount(event_loop) {
            log::error!("Failed to open the viewer window: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(mounted) = self.mounted.as_mut() else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Shutdown requested, exiting event loop...");
                mounted.coordinator.unmount();
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let events = mounted.host.frame_events();
                mounted.dispatch(events);
            }
            WindowEvent::Resized(size) => {
                let events = mounted.host.resize_events(size);
                mounted.dispatch(events);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                mounted.translator.set_scale_factor(scale_factor);
            }
            other => {
                if let Some(pointer) = mounted.translator.translate(&other) {
                    let events = mounted.host.pointer_events(pointer);
                    mounted.dispatch(events);
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(mounted) = self.mounted.as_mut() else {
            return;
        };
        let events = mounted.host.idle_events();
        mounted.dispatch(events);

        if mounted.coordinator.state() == LifecycleState::Disposed {
            log::info!("Scene disposed, exiting event loop...");
            event_loop.exit();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut mounted) = self.mounted.take() {
            mounted.coordinator.unmount();
            let stats = mounted.coordinator.frame_stats();
            log::info!(
                "Rendered {} frames ({} background, {} content, {} failed)",
                stats.rendered(),
                stats.background,
                stats.content,
                stats.render_errors
            );
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let site = match &args.config {
        Some(path) => SiteConfig::load(path)?,
        None => SiteConfig::default(),
    };
    let variant = site.select(args.variant.as_deref())?.clone();
    log::info!("Vitrine: starting with scene '{}'", variant.name);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("vitrine-loader")
        .enable_all()
        .build()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut viewer = Viewer {
        variant,
        signals: site.signals.clone(),
        tier: args.tier.map(Tier::from),
        runtime: runtime.handle().clone(),
        asset_root: std::env::current_dir()?,
        mounted: None,
    };
    event_loop.run_app(&mut viewer)?;
    Ok(())
}
