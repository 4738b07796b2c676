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

//! # Vitrine Infra
//!
//! Concrete implementations of the `vitrine-core` seams: `sysinfo` device
//! signals, a `winit` window host, a `wgpu` render surface and a glTF scene
//! loader that fetches over `reqwest` or from disk.

#![warn(missing_docs)]

#[cfg(feature = "graphics")]
pub mod graphics;
#[cfg(feature = "platform")]
pub mod platform;
pub mod scene;

#[cfg(feature = "graphics")]
pub use graphics::wgpu::{WgpuSurface, WgpuSurfaceFactory};
#[cfg(feature = "platform")]
pub use platform::{
    PointerTranslator, SysinfoSignals, WinitHost, WinitWindowBuilder,
};
pub use scene::GltfSceneLoader;
