//! Error types surfaced by scene transitions, asset loading and rendering.

use std::path::PathBuf;

use thiserror::Error;

use crate::scene::SceneId;

/// Failures while acquiring external resources (maps, data tables).
#[derive(Debug, Error)]
pub enum ResourceLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid map {path}: {reason}")]
    InvalidMap { path: PathBuf, reason: String },
    #[error("invalid data table entry: {reason}")]
    InvalidData { reason: String },
    #[error("asset loader exited before delivering a result")]
    LoaderVanished,
}

/// Errors from [`SceneController`](crate::scene::SceneController) transitions.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene \"{0}\" not found")]
    NotFound(SceneId),
    #[error("cannot switch to \"{requested}\" while \"{pending}\" is still initializing")]
    TransitionInProgress { pending: SceneId, requested: SceneId },
    #[error(transparent)]
    ResourceLoad(#[from] ResourceLoadError),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("animation frame \"{0}\" not found")]
    MissingFrame(String),
}

/// Top-level error returned from a game tick.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Render(#[from] RenderError),
}
