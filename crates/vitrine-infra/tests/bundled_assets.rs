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

//! The site file and scenes shipped under `assets/` load end to end.

use std::path::PathBuf;
use vitrine_core::scene::{LoadCompletion, LoadRequest, SceneHandle, SceneLoader};
use vitrine_core::{SceneVariant, SiteConfig};
use vitrine_infra::GltfSceneLoader;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn load_variant(variant: &SceneVariant) -> usize {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap();
    let mut loader = GltfSceneLoader::new(rt.handle().clone(), workspace_root());
    let (completion, receiver) = LoadCompletion::channel(variant.asset_url.clone());
    loader.load(LoadRequest {
        url: variant.asset_url.clone(),
        completion,
    });
    let scene = rt
        .block_on(receiver.recv_async())
        .unwrap()
        .unwrap_or_else(|e| panic!("{} failed to load: {e}", variant.name));
    assert!(scene.bounds().is_some());
    scene.content().meshes.len()
}

#[test]
fn site_file_matches_the_builtin_presets() {
    let site = SiteConfig::load(workspace_root().join("assets/site.ron")).unwrap();
    assert_eq!(site.select(None).unwrap().name, "hero");

    let hero = site.variant("hero").unwrap();
    let builtin = SceneVariant::hero();
    assert_eq!(hero.asset_url, builtin.asset_url);
    assert_eq!(hero.projection, builtin.projection);
    assert_eq!(hero.fit_to_scene, builtin.fit_to_scene);
    assert_eq!(hero.background, builtin.background);
    assert_eq!(hero.placeholder, builtin.placeholder);

    let service = site.variant("service").unwrap();
    assert_eq!(service.orbit.touch_zone, SceneVariant::service().orbit.touch_zone);
    assert_eq!(service.quality, SceneVariant::service().quality);
}

#[test]
fn bundled_scenes_load_from_disk() {
    assert_eq!(load_variant(&SceneVariant::hero()), 3);
    assert_eq!(load_variant(&SceneVariant::service()), 4);
}
