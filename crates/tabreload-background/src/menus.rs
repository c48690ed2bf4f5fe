//! Context menu registration
//!
//! Best-effort: host errors (duplicate ids, missing ids) are logged at
//! debug level and otherwise ignored.

use tabreload_core::menu::{MenuItem, RELOAD_ALL_TABS_IN_WINDOW};
use tabreload_core::{MenuHost, Settings};
use tracing::debug;

/// Register the two permanent toolbar-icon entries.
pub async fn register_action_menus(menus: &dyn MenuHost) {
    for item in [MenuItem::open_chrome_store(), MenuItem::open_firefox_store()] {
        if let Err(e) = menus.create(&item).await {
            debug!(id = %item.id, error = %e, "ignoring menu create error");
        }
    }
}

/// Make the page entry exist iff `show_page_context_menu_item` is set.
pub async fn sync_page_menu(menus: &dyn MenuHost, settings: &Settings) {
    if settings.show_page_context_menu_item {
        if let Err(e) = menus.create(&MenuItem::reload_all_tabs()).await {
            debug!(error = %e, "ignoring page menu create error");
        }
    } else if let Err(e) = menus.remove(RELOAD_ALL_TABS_IN_WINDOW).await {
        debug!(error = %e, "ignoring page menu remove error");
    }
}
