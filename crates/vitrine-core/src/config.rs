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

//! Site configuration: the scene variants a site embeds, loaded from RON.

use crate::lifecycle::SceneVariant;
use crate::platform::StaticSignals;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading a site file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read site config '{path}': {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid RON for a [`SiteConfig`].
    #[error("Failed to parse site config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// No variant has the requested name.
    #[error("Unknown scene variant '{0}'")]
    UnknownVariant(String),
    /// The file declares no variants.
    #[error("Site config declares no scene variants")]
    Empty,
}

/// The scene variants of a site plus optional environment overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Every embeddable scene.
    pub variants: Vec<SceneVariant>,
    /// Variant used when none is named.
    #[serde(default)]
    pub default_variant: Option<String>,
    /// Signals that replace the probed ones, for testing tiers on a workstation.
    #[serde(default)]
    pub signals: Option<StaticSignals>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            variants: vec![SceneVariant::hero(), SceneVariant::service()],
            default_variant: Some("hero".to_owned()),
            signals: None,
        }
    }
}

impl SiteConfig {
    /// Reads and validates a RON site file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron_str(&text)?;
        log::info!(
            "Loaded {} scene variant(s) from '{}'",
            config.variants.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parses and validates RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = ron::from_str(text)?;
        if config.variants.is_empty() {
            return Err(ConfigError::Empty);
        }
        if let Some(name) = &config.default_variant {
            config.variant(name)?;
        }
        Ok(config)
    }

    /// Looks up a variant by name.
    pub fn variant(&self, name: &str) -> Result<&SceneVariant, ConfigError> {
        self.variants
            .iter()
            .find(|variant| variant.name == name)
            .ok_or_else(|| ConfigError::UnknownVariant(name.to_owned()))
    }

    /// The named variant, or the default, or the first declared.
    pub fn select(&self, name: Option<&str>) -> Result<&SceneVariant, ConfigError> {
        match name.or(self.default_variant.as_deref()) {
            Some(name) => self.variant(name),
            None => self.variants.first().ok_or(ConfigError::Empty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::ProjectionKind;
    use std::io::Write;

    const SITE: &str = r#"(
        variants: [
            (
                name: "card",
                asset_url: "https://example.com/card.glb",
                projection: Orthographic(near: -10.0, far: 10.0),
                camera: (
                    position: (x: 1.0, y: 2.0, z: 3.0),
                    target: (x: 0.0, y: 0.0, z: 0.0),
                ),
                orbit: (damping_factor: 0.1),
                quality: (max_pixel_ratio: 2.0),
            ),
        ],
        signals: Some((logical_cores: Some(2))),
    )"#;

    #[test]
    fn parses_variants_with_defaults() {
        let config = SiteConfig::from_ron_str(SITE).expect("valid site config");
        let card = config.select(None).expect("first variant");
        assert_eq!(card.name, "card");
        assert!(matches!(card.projection, ProjectionKind::Orthographic { near, .. } if near == -10.0));
        assert_eq!(card.orbit.damping_factor, 0.1);
        assert!(card.orbit.enable_rotate);
        assert_eq!(card.idle_fallback_ms, 200);
        assert_eq!(config.signals.and_then(|s| s.logical_cores), Some(2));
    }

    #[test]
    fn unknown_variant_is_reported() {
        let config = SiteConfig::default();
        assert!(config.variant("service").is_ok());
        assert!(matches!(
            config.variant("missing"),
            Err(ConfigError::UnknownVariant(name)) if name == "missing"
        ));
    }

    #[test]
    fn empty_and_malformed_files_are_rejected() {
        assert!(matches!(
            SiteConfig::from_ron_str("(variants: [])"),
            Err(ConfigError::Empty)
        ));
        assert!(matches!(
            SiteConfig::from_ron_str("(variants: "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SITE.as_bytes()).expect("write site");
        let config = SiteConfig::load(file.path()).expect("load site");
        assert_eq!(config.variants.len(), 1);

        let missing = SiteConfig::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn default_site_round_trips_through_ron() {
        let text = ron::ser::to_string(&SiteConfig::default()).expect("serialize");
        let parsed = SiteConfig::from_ron_str(&text).expect("parse");
        assert_eq!(parsed, SiteConfig::default());
    }
}
