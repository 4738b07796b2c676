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

//! Loaded scene content and the asynchronous loader contract.

pub mod error;
pub mod loader;

pub use self::error::SceneError;
pub use self::loader::{LoadCompletion, LoadOutcome, LoadRequest, SceneLoader};

use crate::math::{Aabb, LinearRgba, Vec3};
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies a loaded scene for the lifetime of the process.
pub type SceneId = u64;

static NEXT_SCENE_ID: AtomicU64 = AtomicU64::new(1);

/// Allocates a fresh [`SceneId`].
pub fn next_scene_id() -> SceneId {
    NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed)
}

/// A triangle mesh in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneMesh {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Per-vertex normals, same length as `positions`.
    pub normals: Vec<Vec3>,
    /// Triangle list indices into `positions`.
    pub indices: Vec<u32>,
    /// Material base color.
    pub base_color: LinearRgba,
}

impl SceneMesh {
    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Everything a loaded asset contributes to a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneContent {
    /// Flattened meshes with node transforms applied.
    pub meshes: Vec<SceneMesh>,
    /// Bounds of every mesh position.
    pub bounds: Aabb,
}

impl SceneContent {
    /// Builds content from meshes, computing the bounds.
    pub fn from_meshes(meshes: Vec<SceneMesh>) -> Self {
        let bounds = meshes
            .iter()
            .flat_map(|mesh| mesh.positions.iter().copied())
            .fold(Aabb::INVALID, |bounds, point| bounds.merged_with_point(point));
        Self { meshes, bounds }
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.meshes.iter().all(|mesh| mesh.indices.is_empty())
    }
}

/// A live handle to a loaded asset.
///
/// Owned exclusively by the coordinator's scene slot and disposed exactly once.
pub trait SceneHandle: Send {
    /// Stable identifier, used by surfaces to cache GPU copies.
    fn id(&self) -> SceneId;
    /// Human-readable label, usually the asset URL.
    fn label(&self) -> &str;
    /// The drawable content.
    fn content(&self) -> &SceneContent;
    /// Bounds of the content, if it has any geometry.
    fn bounds(&self) -> Option<Aabb> {
        let bounds = self.content().bounds;
        bounds.is_valid().then_some(bounds)
    }
    /// Releases the content.
    fn dispose(&mut self);
    /// Whether [`SceneHandle::dispose`] has run.
    fn is_disposed(&self) -> bool;
}

/// The stock [`SceneHandle`]: owned content plus a disposed flag.
#[derive(Debug)]
pub struct LoadedScene {
    id: SceneId,
    label: String,
    content: SceneContent,
    disposed: bool,
}

impl LoadedScene {
    /// Wraps `content` under a fresh id.
    pub fn new(label: impl Into<String>, content: SceneContent) -> Self {
        Self {
            id: next_scene_id(),
            label: label.into(),
            content,
            disposed: false,
        }
    }
}

impl SceneHandle for LoadedScene {
    fn id(&self) -> SceneId {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn content(&self) -> &SceneContent {
        &self.content
    }

    fn dispose(&mut self) {
        if self.disposed {
            crate::report_misuse("SceneHandle::dispose called twice");
            return;
        }
        log::debug!("Disposing scene '{}' ({} meshes)", self.label, self.content.meshes.len());
        self.content.meshes = Vec::new();
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> SceneMesh {
        SceneMesh {
            positions: vec![
                Vec3::new(-1.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 2.0, -3.0),
            ],
            normals: vec![Vec3::Z; 3],
            indices: vec![0, 1, 2],
            base_color: LinearRgba::WHITE,
        }
    }

    #[test]
    fn content_bounds_cover_all_meshes() {
        let content = SceneContent::from_meshes(vec![triangle()]);
        assert_eq!(content.bounds.min, Vec3::new(-1.0, 0.0, -3.0));
        assert_eq!(content.bounds.max, Vec3::new(1.0, 2.0, 0.0));
        assert!(!content.is_empty());
        assert_eq!(content.meshes[0].triangle_count(), 1);
    }

    #[test]
    fn empty_content_has_no_bounds() {
        let scene = LoadedScene::new("empty", SceneContent::from_meshes(Vec::new()));
        assert!(scene.content().is_empty());
        assert_eq!(scene.bounds(), None);
    }

    #[test]
    fn scene_ids_are_unique_and_dispose_releases_content() {
        let mut a = LoadedScene::new("a", SceneContent::from_meshes(vec![triangle()]));
        let b = LoadedScene::new("b", SceneContent::from_meshes(vec![triangle()]));
        assert_ne!(a.id(), b.id());
        a.dispose();
        assert!(a.is_disposed());
        assert!(a.content().meshes.is_empty());
    }
}
