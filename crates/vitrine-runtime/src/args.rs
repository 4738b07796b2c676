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

//! Command-line arguments.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use vitrine_core::platform::Tier;

/// Mounts one scene variant in a native window.
#[derive(Debug, Parser)]
#[command(name = "vitrine", version, about)]
pub struct Args {
    /// RON site file; the built-in hero and service presets are used without one.
    pub config: Option<PathBuf>,
    /// Variant to mount; defaults to the site's default variant.
    pub variant: Option<String>,
    /// Force a performance tier instead of probing the device.
    #[arg(long, value_enum)]
    pub tier: Option<TierArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TierArg {
    Low,
    High,
}

impl From<TierArg> for Tier {
    fn from(tier: TierArg) -> Self {
        match tier {
            TierArg::Low => Tier::Low,
            TierArg::High => Tier::High,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("vitrine").chain(args.iter().copied()))
    }

    #[test]
    fn no_arguments_use_builtin_defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.config, None);
        assert_eq!(args.variant, None);
        assert_eq!(args.tier, None);
    }

    #[test]
    fn positionals_and_tier_in_any_order() {
        let args = parse(&["--tier", "low", "assets/site.ron", "service"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("assets/site.ron")));
        assert_eq!(args.variant.as_deref(), Some("service"));
        assert_eq!(args.tier.map(Tier::from), Some(Tier::Low));
    }

    #[test]
    fn bad_input_is_rejected() {
        assert!(parse(&["--tier"]).is_err());
        assert!(parse(&["--tier", "medium"]).is_err());
        assert!(parse(&["--fast"]).is_err());
        assert!(parse(&["a.ron", "hero", "extra"]).is_err());
    }
}
