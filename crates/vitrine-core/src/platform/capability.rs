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

//! Device capability probing and the coarse performance tier derived from it.

use serde::{Deserialize, Serialize};

/// Memory assumed when the platform does not report it, in gigabytes.
pub const DEFAULT_MEMORY_GB: f32 = 4.0;
/// Logical core count assumed when the platform does not report it.
pub const DEFAULT_LOGICAL_CORES: u32 = 4;

/// At or below this much memory (GB) a device is classified as [`Tier::Low`].
pub const LOW_TIER_MEMORY_GB: f32 = 2.0;
/// At or below this many logical cores a device is classified as [`Tier::Low`].
pub const LOW_TIER_CORES: u32 = 2;

/// Read-only queries for the ambient device signals.
///
/// Every signal is optional: a `None` means the platform does not expose it,
/// which is not an error. [`probe`] substitutes mid-range defaults.
pub trait EnvironmentSignals {
    /// Approximate device memory in gigabytes.
    fn device_memory_gb(&self) -> Option<f32>;
    /// Number of logical processors.
    fn logical_cores(&self) -> Option<u32>;
    /// The user agent string, if the host has one.
    fn user_agent(&self) -> Option<String>;
    /// Whether the primary pointer is a touch screen.
    fn touch_primary(&self) -> Option<bool>;
}

/// Coarse device-performance classification driving render-quality tradeoffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Mobile, or constrained memory / processor count.
    Low,
    /// Everything else.
    High,
}

/// A snapshot of the device signals, taken once per mount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapabilityProfile {
    /// Whether the device looks like a phone or tablet.
    pub is_mobile: bool,
    /// Approximate memory in gigabytes.
    pub approx_memory_gb: f32,
    /// Number of logical processors.
    pub logical_cores: u32,
}

impl CapabilityProfile {
    /// Creates a profile from explicit values.
    pub const fn new(is_mobile: bool, approx_memory_gb: f32, logical_cores: u32) -> Self {
        Self {
            is_mobile,
            approx_memory_gb,
            logical_cores,
        }
    }

    /// Derives the performance tier.
    pub fn tier(&self) -> Tier {
        if self.is_mobile
            || self.approx_memory_gb <= LOW_TIER_MEMORY_GB
            || self.logical_cores <= LOW_TIER_CORES
        {
            Tier::Low
        } else {
            Tier::High
        }
    }
}

impl Default for CapabilityProfile {
    fn default() -> Self {
        Self::new(false, DEFAULT_MEMORY_GB, DEFAULT_LOGICAL_CORES)
    }
}

/// Reads the ambient signals and produces a [`CapabilityProfile`].
///
/// Pure apart from the signal reads. Missing or nonsensical values (zero,
/// negative, NaN) fall back to 4 cores / 4 GB / not mobile.
pub fn probe(signals: &dyn EnvironmentSignals) -> CapabilityProfile {
    let approx_memory_gb = signals
        .device_memory_gb()
        .filter(|gb| gb.is_finite() && *gb > 0.0)
        .unwrap_or(DEFAULT_MEMORY_GB);
    let logical_cores = signals
        .logical_cores()
        .filter(|cores| *cores > 0)
        .unwrap_or(DEFAULT_LOGICAL_CORES);
    let is_mobile = signals.touch_primary().unwrap_or(false)
        || signals
            .user_agent()
            .is_some_and(|ua| is_mobile_user_agent(&ua));

    let profile = CapabilityProfile {
        is_mobile,
        approx_memory_gb,
        logical_cores,
    };
    log::debug!("Probed device capability: {profile:?} -> {:?}", profile.tier());
    profile
}

/// Matches the `Mobi|Android` user-agent heuristic, case-insensitively.
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    ua.contains("mobi") || ua.contains("android")
}

/// A fixed set of signals, used for configuration overrides and headless hosts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticSignals {
    /// Reported memory in gigabytes.
    pub device_memory_gb: Option<f32>,
    /// Reported logical core count.
    pub logical_cores: Option<u32>,
    /// Reported user agent.
    pub user_agent: Option<String>,
    /// Whether the primary pointer is touch.
    pub touch_primary: Option<bool>,
}

impl EnvironmentSignals for StaticSignals {
    fn device_memory_gb(&self) -> Option<f32> {
        self.device_memory_gb
    }

    fn logical_cores(&self) -> Option<u32> {
        self.logical_cores
    }

    fn user_agent(&self) -> Option<String> {
        self.user_agent.clone()
    }

    fn touch_primary(&self) -> Option<bool> {
        self.touch_primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_is_always_low() {
        for (memory, cores) in [(1.0, 1), (8.0, 8), (64.0, 32)] {
            assert_eq!(CapabilityProfile::new(true, memory, cores).tier(), Tier::Low);
        }
    }

    #[test]
    fn small_memory_is_low() {
        assert_eq!(CapabilityProfile::new(false, 2.0, 16).tier(), Tier::Low);
        assert_eq!(CapabilityProfile::new(false, 0.5, 16).tier(), Tier::Low);
    }

    #[test]
    fn few_cores_is_low() {
        assert_eq!(CapabilityProfile::new(false, 8.0, 2).tier(), Tier::Low);
        assert_eq!(CapabilityProfile::new(false, 8.0, 1).tier(), Tier::Low);
    }

    #[test]
    fn capable_desktop_is_high() {
        assert_eq!(CapabilityProfile::new(false, 2.5, 3).tier(), Tier::High);
        assert_eq!(CapabilityProfile::new(false, 8.0, 8).tier(), Tier::High);
    }

    #[test]
    fn probe_defaults_missing_signals() {
        let profile = probe(&StaticSignals::default());
        assert_eq!(profile, CapabilityProfile::new(false, 4.0, 4));
        assert_eq!(profile.tier(), Tier::High);
    }

    #[test]
    fn probe_ignores_nonsense_values() {
        let signals = StaticSignals {
            device_memory_gb: Some(f32::NAN),
            logical_cores: Some(0),
            ..Default::default()
        };
        assert_eq!(probe(&signals), CapabilityProfile::default());
    }

    #[test]
    fn probe_detects_mobile_user_agents() {
        let android = StaticSignals {
            user_agent: Some("Mozilla/5.0 (Linux; Android 14; Pixel 8)".into()),
            ..Default::default()
        };
        let iphone = StaticSignals {
            user_agent: Some("Mozilla/5.0 (iPhone) Mobile/15E148".into()),
            ..Default::default()
        };
        let desktop = StaticSignals {
            user_agent: Some("Mozilla/5.0 (X11; Linux x86_64)".into()),
            ..Default::default()
        };
        assert!(probe(&android).is_mobile);
        assert!(probe(&iphone).is_mobile);
        assert!(!probe(&desktop).is_mobile);
    }

    #[test]
    fn probe_honours_touch_signal() {
        let signals = StaticSignals {
            touch_primary: Some(true),
            device_memory_gb: Some(16.0),
            logical_cores: Some(12),
            ..Default::default()
        };
        assert_eq!(probe(&signals).tier(), Tier::Low);
    }
}
