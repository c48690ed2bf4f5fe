//! Capabilities provided by the host browser
//!
//! Each host operation is a single awaited call returning a typed result.
//! Implementations live outside this crate: the in-memory browser in
//! `tabreload-shell`, or a real extension binding.

use crate::error::HostResult;
use crate::menu::MenuItem;
use crate::types::{TabId, TabInfo, WindowId};
use async_trait::async_trait;
use serde_json::{Map, Value};
use url::Url;

/// Tab enumeration and control
#[async_trait]
pub trait TabHost: Send + Sync {
    /// All tabs of a window, in the host's order.
    async fn query_window(&self, window_id: WindowId) -> HostResult<Vec<TabInfo>>;

    /// Reload a single tab.
    async fn reload(&self, tab_id: TabId) -> HostResult<()>;

    /// Open a new tab at `url`.
    async fn create(&self, url: Url) -> HostResult<TabId>;
}

/// Persistent key-value storage
#[async_trait]
pub trait StorageArea: Send + Sync {
    /// Read the given keys. Absent keys are omitted from the result.
    async fn get(&self, keys: &[&str]) -> HostResult<Map<String, Value>>;

    /// Write all entries in one request.
    async fn set(&self, items: Map<String, Value>) -> HostResult<()>;
}

/// Context menu registry
///
/// Creating an id that already exists or removing one that does not is an
/// error; callers treat both as best-effort.
#[async_trait]
pub trait MenuHost: Send + Sync {
    async fn create(&self, item: &MenuItem) -> HostResult<()>;

    async fn remove(&self, id: &str) -> HostResult<()>;
}
