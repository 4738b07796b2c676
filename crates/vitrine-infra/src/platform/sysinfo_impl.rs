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

//! sysinfo-based implementation of the `EnvironmentSignals` trait.

use sysinfo::System;
use vitrine_core::platform::EnvironmentSignals;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Device signals read from the operating system via `sysinfo`.
///
/// Values are sampled once at construction; the profile is immutable for the
/// lifetime of a mount anyway.
#[derive(Debug, Clone)]
pub struct SysinfoSignals {
    memory_gb: Option<f32>,
    logical_cores: Option<u32>,
}

impl SysinfoSignals {
    /// Samples memory and processor count.
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_memory();
        system.refresh_cpu_all();

        let total = system.total_memory();
        let memory_gb = (total > 0).then(|| (total as f64 / BYTES_PER_GB) as f32);
        let cores = system.cpus().len();
        let logical_cores = (cores > 0).then_some(cores as u32);
        log::debug!("sysinfo reports {memory_gb:?} GB and {logical_cores:?} logical cores");
        Self {
            memory_gb,
            logical_cores,
        }
    }
}

impl Default for SysinfoSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentSignals for SysinfoSignals {
    fn device_memory_gb(&self) -> Option<f32> {
        self.memory_gb
    }

    fn logical_cores(&self) -> Option<u32> {
        self.logical_cores
    }

    fn user_agent(&self) -> Option<String> {
        None
    }

    fn touch_primary(&self) -> Option<bool> {
        Some(cfg!(any(target_os = "android", target_os = "ios")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::platform::probe;

    #[test]
    fn probe_accepts_real_signals() {
        let signals = SysinfoSignals::new();
        let profile = probe(&signals);
        assert!(profile.approx_memory_gb > 0.0);
        assert!(profile.logical_cores > 0);
    }
}
