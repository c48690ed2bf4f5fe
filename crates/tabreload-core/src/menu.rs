//! Context menu entries registered by the extension

use serde::{Deserialize, Serialize};

/// Action-context entry opening the Chrome Web Store listing
pub const OPEN_STORE_PAGE_CHROME: &str = "action--open-store-page-chrome";

/// Action-context entry opening the Firefox Add-ons listing
pub const OPEN_STORE_PAGE_FIREFOX: &str = "action--open-store-page-firefox";

/// Page-context entry reloading every tab of the clicked window
pub const RELOAD_ALL_TABS_IN_WINDOW: &str = "page--reload-all-tabs-in-window";

pub const CHROME_STORE_URL: &str =
    "https://chromewebstore.google.com/detail/reload-all-tabs-in-window/fobjljihdlfbamijbmadjkkehmlleaoa";

pub const FIREFOX_STORE_URL: &str =
    "https://addons.mozilla.org/en-US/firefox/addon/reloadalltabs-inwindow/";

/// Where a menu entry is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuContext {
    /// Toolbar icon menu
    Action,
    /// Right-click on a page
    Page,
}

/// A context menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub title: String,
    pub contexts: Vec<MenuContext>,
}

impl MenuItem {
    pub fn new(id: &str, title: &str, context: MenuContext) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            contexts: vec![context],
        }
    }

    pub fn open_chrome_store() -> Self {
        Self::new(
            OPEN_STORE_PAGE_CHROME,
            "Open Chrome Web Store Page",
            MenuContext::Action,
        )
    }

    pub fn open_firefox_store() -> Self {
        Self::new(
            OPEN_STORE_PAGE_FIREFOX,
            "Open Firefox Browser Add-ons Page",
            MenuContext::Action,
        )
    }

    pub fn reload_all_tabs() -> Self {
        Self::new(
            RELOAD_ALL_TABS_IN_WINDOW,
            "Reload All Tabs (in Window)",
            MenuContext::Page,
        )
    }
}

/// Menu click identifiers understood by the background process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    OpenChromeStore,
    OpenFirefoxStore,
    ReloadAllTabs,
}

impl MenuCommand {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            OPEN_STORE_PAGE_CHROME => Some(Self::OpenChromeStore),
            OPEN_STORE_PAGE_FIREFOX => Some(Self::OpenFirefoxStore),
            RELOAD_ALL_TABS_IN_WINDOW => Some(Self::ReloadAllTabs),
            _ => None,
        }
    }

    /// Store listing opened by this command, if any.
    pub fn store_url(self) -> Option<&'static str> {
        match self {
            Self::OpenChromeStore => Some(CHROME_STORE_URL),
            Self::OpenFirefoxStore => Some(FIREFOX_STORE_URL),
            Self::ReloadAllTabs => None,
        }
    }
}
