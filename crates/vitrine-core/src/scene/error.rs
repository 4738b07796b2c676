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

use thiserror::Error;

/// Why a scene asset could not be turned into a [`SceneHandle`](super::SceneHandle).
#[derive(Debug, Error)]
pub enum SceneError {
    /// The asset bytes could not be retrieved.
    #[error("Failed to fetch scene '{url}': {reason}")]
    Fetch {
        /// The requested asset.
        url: String,
        /// Transport-level description.
        reason: String,
    },
    /// The bytes were retrieved but are not a usable scene.
    #[error("Failed to parse scene '{url}': {reason}")]
    Parse {
        /// The requested asset.
        url: String,
        /// Parser description.
        reason: String,
    },
    /// The asset parsed but contains no drawable geometry.
    #[error("Scene '{url}' contains no renderable geometry")]
    Empty {
        /// The requested asset.
        url: String,
    },
    /// The loader dropped the request without resolving it.
    #[error("Scene loader abandoned the request for '{url}'")]
    Abandoned {
        /// The requested asset.
        url: String,
    },
}

impl SceneError {
    /// The asset URL the error refers to.
    pub fn url(&self) -> &str {
        match self {
            SceneError::Fetch { url, .. }
            | SceneError::Parse { url, .. }
            | SceneError::Empty { url }
            | SceneError::Abandoned { url } => url,
        }
    }
}
