//! In-memory browser host - windows, tabs, storage, context menus
//!
//! Implements every host capability trait from `tabreload-core` over plain
//! maps. Every call is recorded, and individual operations can be made to
//! fail, so the background process can be driven without a real browser.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tabreload_core::{
    menu::MenuItem,
    types::{TabId, TabInfo, WindowId},
    HostResult, MenuHost, StorageArea, TabHost, TabReloadError,
};
use url::Url;

/// A host call observed by the shell, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    QueryWindow(WindowId),
    Reload(TabId),
    CreateTab(String),
    StorageGet,
    StorageSet,
    MenuCreate(String),
    MenuRemove(String),
}

#[derive(Debug, Default)]
struct WindowInfo {
    tabs: Vec<TabId>,
}

#[derive(Debug, Default)]
struct ShellState {
    tabs: HashMap<TabId, TabInfo>,
    windows: HashMap<WindowId, WindowInfo>,
    next_tab_id: u64,
    next_window_id: u64,
    storage: Map<String, Value>,
    menus: Vec<MenuItem>,
    calls: Vec<HostCall>,
    failing_tabs: HashSet<TabId>,
    failing_windows: HashSet<WindowId>,
    storage_failing: bool,
    reload_latency: Duration,
}

pub struct BrowserShell {
    state: Mutex<ShellState>,
}

impl BrowserShell {
    pub fn new() -> Self {
        log::info!("Initializing in-memory browser shell");

        Self {
            state: Mutex::new(ShellState {
                next_tab_id: 1,
                next_window_id: 1,
                ..ShellState::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ShellState> {
        // A panicking test thread must not poison the shell for later assertions.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    // Window management
    pub fn open_window(&self) -> WindowId {
        let mut state = self.state();
        let id = WindowId(state.next_window_id);
        state.next_window_id += 1;
        state.windows.insert(id, WindowInfo::default());
        log::info!("Opened window {}", id);
        id
    }

    /// Open a window holding `count` fresh tabs.
    pub fn open_window_with_tabs(&self, count: usize) -> (WindowId, Vec<TabId>) {
        let window_id = self.open_window();
        let tabs = (0..count)
            .filter_map(|_| self.open_tab(window_id, None).ok())
            .collect();
        (window_id, tabs)
    }

    pub fn close_window(&self, window_id: WindowId) {
        let mut state = self.state();
        if let Some(window) = state.windows.remove(&window_id) {
            for tab_id in window.tabs {
                state.tabs.remove(&tab_id);
            }
            log::info!("Closed window {}", window_id);
        }
    }

    pub fn list_windows(&self) -> Vec<WindowId> {
        let mut windows: Vec<WindowId> = self.state().windows.keys().copied().collect();
        windows.sort();
        windows
    }

    // Tab management
    pub fn open_tab(&self, window_id: WindowId, url: Option<Url>) -> HostResult<TabId> {
        let mut state = self.state();
        if !state.windows.contains_key(&window_id) {
            return Err(TabReloadError::not_found(format!("window {}", window_id)));
        }

        let tab_id = TabId(state.next_tab_id);
        state.next_tab_id += 1;

        log::debug!("Creating tab {} in window {}", tab_id, window_id);
        state.tabs.insert(
            tab_id,
            TabInfo {
                url,
                ..TabInfo::new(tab_id, window_id)
            },
        );
        if let Some(window) = state.windows.get_mut(&window_id) {
            window.tabs.push(tab_id);
        }
        Ok(tab_id)
    }

    pub fn close_tab(&self, tab_id: TabId) {
        let mut state = self.state();
        if let Some(tab) = state.tabs.remove(&tab_id) {
            log::debug!("Closing tab {}", tab_id);
            if let Some(window) = state.windows.get_mut(&tab.window_id) {
                window.tabs.retain(|&id| id != tab_id);
            }
        }
    }

    pub fn get_tab(&self, tab_id: TabId) -> Option<TabInfo> {
        self.state().tabs.get(&tab_id).cloned()
    }

    // Failure injection
    pub fn fail_reload(&self, tab_id: TabId) {
        self.state().failing_tabs.insert(tab_id);
    }

    pub fn fail_query(&self, window_id: WindowId) {
        self.state().failing_windows.insert(window_id);
    }

    pub fn set_storage_failing(&self, failing: bool) {
        self.state().storage_failing = failing;
    }

    /// Make every reload take `latency` before it completes.
    pub fn set_reload_latency(&self, latency: Duration) {
        self.state().reload_latency = latency;
    }

    // Inspection
    pub fn calls(&self) -> Vec<HostCall> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Tabs reloaded so far, in call order (failed attempts included).
    pub fn reloads(&self) -> Vec<TabId> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Reload(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn menus(&self) -> Vec<MenuItem> {
        self.state().menus.clone()
    }

    pub fn has_menu(&self, id: &str) -> bool {
        self.state().menus.iter().any(|m| m.id == id)
    }

    pub fn storage(&self) -> Map<String, Value> {
        self.state().storage.clone()
    }

    pub fn put_storage(&self, key: &str, value: Value) {
        self.state().storage.insert(key.to_string(), value);
    }
}

impl Default for BrowserShell {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TabHost for BrowserShell {
    async fn query_window(&self, window_id: WindowId) -> HostResult<Vec<TabInfo>> {
        let mut state = self.state();
        state.calls.push(HostCall::QueryWindow(window_id));

        if state.failing_windows.contains(&window_id) {
            return Err(TabReloadError::tab(format!(
                "cannot enumerate window {}",
                window_id
            )));
        }

        let Some(window) = state.windows.get(&window_id) else {
            return Ok(Vec::new());
        };
        Ok(window
            .tabs
            .iter()
            .filter_map(|id| state.tabs.get(id).cloned())
            .collect())
    }

    async fn reload(&self, tab_id: TabId) -> HostResult<()> {
        let latency = {
            let mut state = self.state();
            state.calls.push(HostCall::Reload(tab_id));

            if state.failing_tabs.contains(&tab_id) {
                return Err(TabReloadError::tab(format!("reload of tab {} failed", tab_id)));
            }
            if !state.tabs.contains_key(&tab_id) {
                return Err(TabReloadError::not_found(format!("tab {}", tab_id)));
            }
            state.reload_latency
        };

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        log::debug!("Reloaded tab {}", tab_id);
        Ok(())
    }

    async fn create(&self, url: Url) -> HostResult<TabId> {
        let window_id = {
            let mut state = self.state();
            state.calls.push(HostCall::CreateTab(url.to_string()));
            state.windows.keys().min().copied()
        };
        let window_id = match window_id {
            Some(id) => id,
            None => self.open_window(),
        };
        self.open_tab(window_id, Some(url))
    }
}

#[async_trait]
impl StorageArea for BrowserShell {
    async fn get(&self, keys: &[&str]) -> HostResult<Map<String, Value>> {
        let mut state = self.state();
        state.calls.push(HostCall::StorageGet);

        if state.storage_failing {
            return Err(TabReloadError::storage("storage area unavailable"));
        }
        Ok(keys
            .iter()
            .filter_map(|key| state.storage.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, items: Map<String, Value>) -> HostResult<()> {
        let mut state = self.state();
        state.calls.push(HostCall::StorageSet);

        if state.storage_failing {
            return Err(TabReloadError::storage("storage area unavailable"));
        }
        state.storage.extend(items);
        Ok(())
    }
}

#[async_trait]
impl MenuHost for BrowserShell {
    async fn create(&self, item: &MenuItem) -> HostResult<()> {
        let mut state = self.state();
        state.calls.push(HostCall::MenuCreate(item.id.clone()));

        if state.menus.iter().any(|m| m.id == item.id) {
            return Err(TabReloadError::menu(format!(
                "Cannot create item with duplicate id {}",
                item.id
            )));
        }
        state.menus.push(item.clone());
        Ok(())
    }

    async fn remove(&self, id: &str) -> HostResult<()> {
        let mut state = self.state();
        state.calls.push(HostCall::MenuRemove(id.to_string()));

        let before = state.menus.len();
        state.menus.retain(|m| m.id != id);
        if state.menus.len() == before {
            return Err(TabReloadError::menu(format!(
                "Cannot find menu item with id {}",
                id
            )));
        }
        Ok(())
    }
}
