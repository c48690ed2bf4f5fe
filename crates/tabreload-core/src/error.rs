//! Error types for TabReload

use thiserror::Error;

/// Result type alias for TabReload operations
pub type TabReloadResult<T> = Result<T, TabReloadError>;

/// Result of a single call into the host browser
pub type HostResult<T> = Result<T, TabReloadError>;

/// Main error type for TabReload
#[derive(Error, Debug)]
pub enum TabReloadError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Tab error: {0}")]
    Tab(String),

    #[error("Context menu error: {0}")]
    Menu(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TabReloadError {
    /// Create a new storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a new tab error
    pub fn tab(msg: impl Into<String>) -> Self {
        Self::Tab(msg.into())
    }

    /// Create a new context menu error
    pub fn menu(msg: impl Into<String>) -> Self {
        Self::Menu(msg.into())
    }

    /// Create a new not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}
