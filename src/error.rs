//! Error types for the collaborator boundaries.
//!
//! Nothing here is fatal once a run has started: the director logs these and
//! degrades the affected feature (missing score memory, uncached overlay).

/// Failures talking to the storage collaborator.
#[derive(thiserror::Error, Debug)]
pub enum PersistenceError {
    #[error("storage is unavailable")]
    Unavailable,

    #[error("player has not consented to local storage")]
    ConsentDenied,

    #[error("storage operation failed: {0}")]
    Storage(String),

    #[error("stored value is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures building canvas resources.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("2D context unavailable")]
    ContextUnavailable,

    #[error("failed to create offscreen surface ({width}x{height}): {reason}")]
    Surface {
        width: u32,
        height: u32,
        reason: String,
    },

    #[error("failed to create gradient '{key}': {reason}")]
    Gradient { key: String, reason: String },
}
