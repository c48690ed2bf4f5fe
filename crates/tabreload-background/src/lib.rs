//! # TabReload Background
//!
//! The extension's background process: it reacts to host events (startup,
//! toolbar icon click, context menu click) and runs the reload loop.
//!
//! ## Architecture
//!
//! ```text
//! Background
//!     ├── TabHost      (enumerate, reload, open tabs)
//!     ├── StorageArea  (settings, re-read before every loop)
//!     ├── MenuHost     (context menu entries)
//!     └── WindowGuard  (one loop per window)
//! ```

pub mod delay;
pub mod guard;
pub mod menus;
pub mod reload;

pub use delay::DelayPolicy;
pub use guard::{WindowGuard, WindowLease};
pub use menus::{register_action_menus, sync_page_menu};
pub use reload::{reload_window, ReloadOutcome, ReloadReport};

use std::sync::Arc;
use tabreload_core::menu::MenuCommand;
use tabreload_core::types::{TabId, TabInfo, WindowId};
use tabreload_core::{MenuHost, Settings, SettingsStore, StorageArea, TabHost};
use tracing::{debug, info, info_span, warn, Instrument};
use url::Url;

/// What a context menu click led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuClickOutcome {
    /// A store listing was opened in a new tab.
    OpenedStorePage(TabId),
    /// The store listing could not be opened.
    OpenFailed,
    /// The clicked tab's window was handed to the reload loop.
    Reload(ReloadOutcome),
    /// Unknown id, or a page click without a tab.
    Ignored,
}

/// Background process state shared by all event handlers.
#[derive(Clone)]
pub struct Background {
    tabs: Arc<dyn TabHost>,
    storage: Arc<dyn StorageArea>,
    menus: Arc<dyn MenuHost>,
    guard: WindowGuard,
}

impl Background {
    pub fn new(
        tabs: Arc<dyn TabHost>,
        storage: Arc<dyn StorageArea>,
        menus: Arc<dyn MenuHost>,
    ) -> Self {
        Self {
            tabs,
            storage,
            menus,
            guard: WindowGuard::new(),
        }
    }

    /// Use one host object for every capability.
    pub fn with_host<H>(host: Arc<H>) -> Self
    where
        H: TabHost + StorageArea + MenuHost + 'static,
    {
        Self::new(host.clone(), host.clone(), host)
    }

    pub fn guard(&self) -> &WindowGuard {
        &self.guard
    }

    pub async fn load_settings(&self) -> Settings {
        SettingsStore::load(self.storage.as_ref()).await
    }

    /// Process start: permanent menus, then the page entry per settings.
    pub async fn on_startup(&self) {
        info!("background starting");
        register_action_menus(self.menus.as_ref()).await;
        self.refresh_menus().await;
    }

    /// Re-read settings and sync the page context menu entry.
    pub async fn refresh_menus(&self) {
        let settings = self.load_settings().await;
        sync_page_menu(self.menus.as_ref(), &settings).await;
    }

    /// Toolbar icon clicked on `tab`.
    pub async fn on_action_clicked(&self, tab: &TabInfo) -> ReloadOutcome {
        self.reload_all_tabs(tab.window_id).await
    }

    /// Context menu entry `menu_item_id` clicked, on `tab` if any.
    pub async fn on_menu_clicked(
        &self,
        menu_item_id: &str,
        tab: Option<&TabInfo>,
    ) -> MenuClickOutcome {
        let Some(command) = MenuCommand::from_id(menu_item_id) else {
            debug!(menu_item_id, "ignoring unknown menu item");
            return MenuClickOutcome::Ignored;
        };

        if let Some(store_url) = command.store_url() {
            return self.open_store_page(store_url).await;
        }

        match tab {
            Some(tab) => MenuClickOutcome::Reload(self.reload_all_tabs(tab.window_id).await),
            None => MenuClickOutcome::Ignored,
        }
    }

    async fn open_store_page(&self, store_url: &str) -> MenuClickOutcome {
        let url = match Url::parse(store_url) {
            Ok(url) => url,
            Err(e) => {
                warn!(store_url, error = %e, "bad store page url");
                return MenuClickOutcome::OpenFailed;
            }
        };
        match self.tabs.create(url).await {
            Ok(tab_id) => MenuClickOutcome::OpenedStorePage(tab_id),
            Err(e) => {
                warn!(store_url, error = %e, "failed to open store page");
                MenuClickOutcome::OpenFailed
            }
        }
    }

    /// Reload every tab of `window_id`, unless a loop for it is running.
    ///
    /// A second request for a busy window is dropped, not queued. The
    /// window is released however the loop ends.
    pub async fn reload_all_tabs(&self, window_id: WindowId) -> ReloadOutcome {
        let settings = self.load_settings().await;

        let Some(lease) = self.guard.try_acquire(window_id) else {
            debug!(%window_id, "reload already in progress, dropping request");
            return ReloadOutcome::Skipped;
        };

        let policy = DelayPolicy::from_settings(&settings);
        let span = info_span!("reload_all_tabs", window_id = window_id.0);
        let outcome = reload_window(self.tabs.as_ref(), window_id, &policy)
            .instrument(span)
            .await;
        drop(lease);

        info!(%window_id, ?outcome, "reload finished");
        outcome
    }
}
