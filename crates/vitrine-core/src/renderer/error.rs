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

//! Error types for render surface creation and presentation.

use thiserror::Error;

/// An error raised by a [`RenderSurface`](super::RenderSurface) or its factory.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The backend could not create the drawable surface or its device.
    #[error("Failed to create render surface: {0}")]
    Creation(String),
    /// The next frame could not be acquired from the swapchain.
    #[error("Failed to acquire surface frame: {0}")]
    Acquire(String),
    /// A backend-specific operation failed.
    #[error("Render backend error: {0}")]
    Backend(String),
    /// The surface was already disposed.
    #[error("The render surface has been disposed")]
    Disposed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_error_display() {
        assert_eq!(
            SurfaceError::Creation("no adapter".into()).to_string(),
            "Failed to create render surface: no adapter"
        );
        assert_eq!(
            SurfaceError::Disposed.to_string(),
            "The render surface has been disposed"
        );
    }
}
