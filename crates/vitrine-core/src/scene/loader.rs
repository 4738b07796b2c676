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

//! The one-shot scene load contract.
//!
//! The coordinator hands a [`LoadRequest`] to a [`SceneLoader`] and keeps the
//! receiving end of a single-slot `flume` channel. The loader resolves the
//! [`LoadCompletion`] exactly once, from any thread. If the coordinator is
//! gone by then, the completion disposes the scene itself so nothing leaks.

use super::{SceneError, SceneHandle};

/// What a load produces.
pub type LoadOutcome = Result<Box<dyn SceneHandle>, SceneError>;

/// The sending half of a scene load. Consumed by [`LoadCompletion::resolve`].
#[derive(Debug)]
pub struct LoadCompletion {
    url: String,
    sender: flume::Sender<LoadOutcome>,
}

impl LoadCompletion {
    /// Creates a completion and the receiver that observes it.
    pub fn channel(url: impl Into<String>) -> (Self, flume::Receiver<LoadOutcome>) {
        let (sender, receiver) = flume::bounded(1);
        (
            Self {
                url: url.into(),
                sender,
            },
            receiver,
        )
    }

    /// The asset this completion belongs to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether nobody is waiting for the outcome any more.
    ///
    /// Loaders may check this to skip work for an unmounted instance.
    pub fn is_abandoned(&self) -> bool {
        self.sender.is_disconnected()
    }

    /// Delivers the outcome. A scene that arrives after its receiver was
    /// dropped is disposed here.
    pub fn resolve(self, outcome: LoadOutcome) {
        if let Err(flume::SendError(outcome)) = self.sender.send(outcome) {
            match outcome {
                Ok(mut scene) => {
                    log::debug!(
                        "Scene '{}' finished loading after its instance was disposed",
                        self.url
                    );
                    scene.dispose();
                }
                Err(error) => {
                    log::debug!("Discarding late load failure: {error}");
                }
            }
        }
    }
}

/// A request to load one scene asset.
#[derive(Debug)]
pub struct LoadRequest {
    /// Where the asset lives: an `http(s)://` URL, a `file://` URL or a path.
    pub url: String,
    /// Resolved once with the outcome.
    pub completion: LoadCompletion,
}

/// Starts asynchronous scene loads.
///
/// `load` must return promptly; the outcome is delivered later through the
/// request's [`LoadCompletion`]. Dropping the completion unresolved reports
/// [`SceneError::Abandoned`] to the coordinator.
pub trait SceneLoader {
    /// Begins loading `request.url`.
    fn load(&mut self, request: LoadRequest);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{LoadedScene, SceneContent};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    struct Tracked {
        inner: LoadedScene,
        disposed: Arc<AtomicBool>,
    }

    impl SceneHandle for Tracked {
        fn id(&self) -> crate::scene::SceneId {
            self.inner.id()
        }
        fn label(&self) -> &str {
            self.inner.label()
        }
        fn content(&self) -> &SceneContent {
            self.inner.content()
        }
        fn dispose(&mut self) {
            self.inner.dispose();
            self.disposed.store(true, Ordering::SeqCst);
        }
        fn is_disposed(&self) -> bool {
            self.inner.is_disposed()
        }
    }

    fn tracked(flag: &Arc<AtomicBool>) -> Box<dyn SceneHandle> {
        Box::new(Tracked {
            inner: LoadedScene::new("scene.glb", SceneContent::from_meshes(Vec::new())),
            disposed: flag.clone(),
        })
    }

    #[test]
    fn resolve_delivers_outcome_once() {
        let (completion, receiver) = LoadCompletion::channel("scene.glb");
        assert!(!completion.is_abandoned());
        let flag = Arc::new(AtomicBool::new(false));
        completion.resolve(Ok(tracked(&flag)));

        let scene = receiver.try_recv().expect("outcome should be delivered");
        assert!(scene.is_ok());
        assert!(receiver.try_recv().is_err());
        assert!(!flag.load(Ordering::SeqCst));
    }

    #[test]
    fn late_scene_is_disposed_by_the_completion() {
        let (completion, receiver) = LoadCompletion::channel("scene.glb");
        drop(receiver);
        assert!(completion.is_abandoned());
        let flag = Arc::new(AtomicBool::new(false));
        completion.resolve(Ok(tracked(&flag)));
        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn dropped_completion_disconnects_the_receiver() {
        let (completion, receiver) = LoadCompletion::channel("scene.glb");
        drop(completion);
        assert!(matches!(
            receiver.try_recv(),
            Err(flume::TryRecvError::Disconnected)
        ));
    }
}
