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

use super::document::{build_content, buffer_sources, BufferSource};
use std::path::{Path, PathBuf};
use tokio::runtime::Handle;
use vitrine_core::scene::{
    LoadOutcome, LoadRequest, LoadedScene, SceneError, SceneHandle, SceneLoader,
};

/// Loads `.gltf`/`.glb` assets on a tokio runtime.
///
/// `http(s)://` URLs go through `reqwest`. `file://` URLs and bare paths are
/// read with `tokio::fs`, bare paths relative to `base_dir`. External buffers
/// resolve against the document's own location.
#[derive(Debug, Clone)]
pub struct GltfSceneLoader {
    runtime: Handle,
    client: reqwest::Client,
    base_dir: PathBuf,
}

impl GltfSceneLoader {
    /// Creates a loader that spawns onto `runtime` and resolves bare paths under `base_dir`.
    pub fn new(runtime: Handle, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            client: reqwest::Client::new(),
            base_dir: base_dir.into(),
        }
    }
}

impl SceneLoader for GltfSceneLoader {
    fn load(&mut self, request: LoadRequest) {
        let client = self.client.clone();
        let base_dir = self.base_dir.clone();
        log::info!("Loading scene '{}'", request.url);
        self.runtime.spawn(async move {
            let LoadRequest { url, completion } = request;
            if completion.is_abandoned() {
                log::debug!("Skipping load of '{url}': no one is waiting for it");
                return;
            }
            let outcome = load_scene(&client, &base_dir, &url).await;
            match &outcome {
                Ok(scene) => log::info!(
                    "Scene '{url}' loaded: {} meshes",
                    scene.content().meshes.len()
                ),
                Err(e) => log::debug!("Load of '{url}' failed: {e}"),
            }
            completion.resolve(outcome);
        });
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Location {
    Remote(reqwest::Url),
    Local(PathBuf),
}

impl Location {
    fn parse(base_dir: &Path, url: &str) -> Result<Self, String> {
        if url.starts_with("http://") || url.starts_with("https://") {
            reqwest::Url::parse(url)
                .map(Location::Remote)
                .map_err(|e| format!("Invalid URL: {e}"))
        } else if let Some(path) = url.strip_prefix("file://") {
            Ok(Location::Local(PathBuf::from(path)))
        } else {
            Ok(Location::Local(base_dir.join(url)))
        }
    }

    fn join(&self, relative: &str) -> Result<Self, String> {
        match self {
            Location::Remote(url) => url
                .join(relative)
                .map(Location::Remote)
                .map_err(|e| format!("Invalid buffer URI '{relative}': {e}")),
            Location::Local(path) => {
                let dir = path.parent().unwrap_or_else(|| Path::new(""));
                Ok(Location::Local(dir.join(relative)))
            }
        }
    }

    async fn fetch(&self, client: &reqwest::Client) -> Result<Vec<u8>, String> {
        match self {
            Location::Remote(url) => {
                let response = client
                    .get(url.clone())
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| e.to_string())?;
                let bytes = response.bytes().await.map_err(|e| e.to_string())?;
                Ok(bytes.to_vec())
            }
            Location::Local(path) => tokio::fs::read(path)
                .await
                .map_err(|e| format!("{}: {e}", path.display())),
        }
    }
}

async fn load_scene(client: &reqwest::Client, base_dir: &Path, url: &str) -> LoadOutcome {
    let fetch_error = |reason: String| SceneError::Fetch {
        url: url.to_string(),
        reason,
    };
    let parse_error = |reason: String| SceneError::Parse {
        url: url.to_string(),
        reason,
    };

    let location = Location::parse(base_dir, url).map_err(fetch_error)?;
    let bytes = location.fetch(client).await.map_err(fetch_error)?;
    let gltf = gltf::Gltf::from_slice(&bytes).map_err(|e| parse_error(e.to_string()))?;

    let mut buffers = Vec::new();
    for source in buffer_sources(&gltf).map_err(parse_error)? {
        match source {
            BufferSource::Ready(data) => buffers.push(data),
            BufferSource::External(uri) => {
                let data = location
                    .join(&uri)
                    .map_err(fetch_error)?
                    .fetch(client)
                    .await
                    .map_err(fetch_error)?;
                buffers.push(data);
            }
        }
    }

    let content = build_content(&gltf, &buffers).map_err(parse_error)?;
    if content.is_empty() {
        return Err(SceneError::Empty {
            url: url.to_string(),
        });
    }
    Ok(Box::new(LoadedScene::new(url, content)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::document::tests::{embedded_triangle, triangle_buffer, triangle_gltf};
    use vitrine_core::scene::LoadCompletion;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap()
    }

    fn load_blocking(rt: &tokio::runtime::Runtime, base: &Path, url: &str) -> LoadOutcome {
        let mut loader = GltfSceneLoader::new(rt.handle().clone(), base);
        let (completion, receiver) = LoadCompletion::channel(url);
        loader.load(LoadRequest {
            url: url.to_string(),
            completion,
        });
        rt.block_on(receiver.recv_async()).unwrap()
    }

    #[test]
    fn loads_an_embedded_document_relative_to_the_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("scene.gltf"), embedded_triangle()).unwrap();

        let rt = runtime();
        let scene = load_blocking(&rt, dir.path(), "scene.gltf").unwrap();
        assert_eq!(scene.label(), "scene.gltf");
        assert_eq!(scene.content().meshes.len(), 1);
        assert!(scene.bounds().is_some());
    }

    #[test]
    fn external_buffers_resolve_next_to_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("models");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("scene.gltf"), triangle_gltf("scene.bin")).unwrap();
        std::fs::write(nested.join("scene.bin"), triangle_buffer()).unwrap();

        let rt = runtime();
        let scene = load_blocking(&rt, dir.path(), "models/scene.gltf").unwrap();
        assert_eq!(scene.content().meshes[0].indices, vec![0, 1, 2]);
    }

    #[test]
    fn missing_file_is_a_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let rt = runtime();
        let error = load_blocking(&rt, dir.path(), "nope.gltf").err().unwrap();
        assert!(matches!(error, SceneError::Fetch { .. }));
        assert_eq!(error.url(), "nope.gltf");
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.gltf"), b"not a gltf").unwrap();
        let rt = runtime();
        let error = load_blocking(&rt, dir.path(), "bad.gltf").err().unwrap();
        assert!(matches!(error, SceneError::Parse { .. }));
    }

    #[test]
    fn document_without_geometry_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("empty.gltf"),
            r#"{ "asset": { "version": "2.0" }, "scenes": [{ "nodes": [] }] }"#,
        )
        .unwrap();
        let rt = runtime();
        let error = load_blocking(&rt, dir.path(), "empty.gltf").err().unwrap();
        assert!(matches!(error, SceneError::Empty { .. }));
    }

    #[test]
    fn locations_join_relative_buffers() {
        let remote = Location::parse(Path::new("."), "https://cdn.example.com/scenes/hero.gltf")
            .unwrap()
            .join("hero.bin")
            .unwrap();
        assert_eq!(
            remote,
            Location::Remote(reqwest::Url::parse("https://cdn.example.com/scenes/hero.bin").unwrap())
        );

        let local = Location::parse(Path::new("/srv/site"), "assets/hero.gltf")
            .unwrap()
            .join("hero.bin")
            .unwrap();
        assert_eq!(local, Location::Local(PathBuf::from("/srv/site/assets/hero.bin")));
    }
}
