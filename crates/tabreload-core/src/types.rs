//! Common types used throughout TabReload

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Host-assigned identifier for a tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TabId(pub u64);

/// Host-assigned identifier for a browser window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u64);

/// Tab metadata as reported by the host
///
/// Some tabs (devtools, certain internal pages) expose no id; the reload
/// loop skips those.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabInfo {
    pub id: Option<TabId>,
    pub window_id: WindowId,
    pub url: Option<Url>,
    pub title: Option<String>,
}

impl TabInfo {
    pub fn new(id: TabId, window_id: WindowId) -> Self {
        Self {
            id: Some(id),
            window_id,
            url: None,
            title: None,
        }
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
