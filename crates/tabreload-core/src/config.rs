//! Persisted extension settings

use crate::error::{HostResult, TabReloadError, TabReloadResult};
use crate::host::StorageArea;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const DELAY: &str = "delay";
const SHOW_PAGE_CONTEXT_MENU_ITEM: &str = "show_page_context_menu_item";
const USE_ADVANCED_OPTIONS: &str = "use_advanced_options";
const ADVANCED_DELAY_RANGE_START: &str = "advanced_delay_range_start";
const ADVANCED_DELAY_RANGE_END: &str = "advanced_delay_range_end";

/// Storage keys, one per settings field. Must match the serde field names.
pub const SETTING_KEYS: [&str; 5] = [
    DELAY,
    SHOW_PAGE_CONTEXT_MENU_ITEM,
    USE_ADVANCED_OPTIONS,
    ADVANCED_DELAY_RANGE_START,
    ADVANCED_DELAY_RANGE_END,
];

/// Extension settings
///
/// Stored as a flat key-value record keyed by field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Fixed delay between tab reloads in milliseconds
    pub delay: u64,

    /// Register the "Reload All Tabs (in Window)" page context menu entry
    pub show_page_context_menu_item: bool,

    /// Use the randomized delay range instead of `delay`
    pub use_advanced_options: bool,

    /// Lower bound of the randomized delay in milliseconds
    pub advanced_delay_range_start: u64,

    /// Scale of the randomized delay in milliseconds
    pub advanced_delay_range_end: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delay: 0,
            show_page_context_menu_item: true,
            use_advanced_options: false,
            advanced_delay_range_start: 0,
            advanced_delay_range_end: 0,
        }
    }
}

impl Settings {
    /// Build settings from a stored record, falling back to defaults per field.
    pub fn from_stored(items: &Map<String, Value>) -> Self {
        let mut settings = Self::default();
        settings.merge_stored(items);
        settings
    }

    /// Overwrite fields whose stored value has the right type.
    ///
    /// Missing or ill-typed values leave the current value untouched.
    pub fn merge_stored(&mut self, items: &Map<String, Value>) {
        let millis = |key: &str| items.get(key).and_then(as_millis);
        let flag = |key: &str| items.get(key).and_then(Value::as_bool);

        if let Some(v) = millis(DELAY) {
            self.delay = v;
        }
        if let Some(v) = flag(SHOW_PAGE_CONTEXT_MENU_ITEM) {
            self.show_page_context_menu_item = v;
        }
        if let Some(v) = flag(USE_ADVANCED_OPTIONS) {
            self.use_advanced_options = v;
        }
        if let Some(v) = millis(ADVANCED_DELAY_RANGE_START) {
            self.advanced_delay_range_start = v;
        }
        if let Some(v) = millis(ADVANCED_DELAY_RANGE_END) {
            self.advanced_delay_range_end = v;
        }
    }

    /// Flat record written back to storage, keyed by serde field name.
    pub fn to_storage(&self) -> TabReloadResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(items) => Ok(items),
            other => Err(TabReloadError::storage(format!(
                "settings serialized to a non-object: {}",
                other
            ))),
        }
    }
}

/// Non-negative JSON number as milliseconds. Fractions are truncated.
fn as_millis(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    match value.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 => Some(f.trunc() as u64),
        _ => None,
    }
}

/// Loads and saves [`Settings`] through a host storage area.
pub struct SettingsStore;

impl SettingsStore {
    /// Read all settings keys in one request.
    ///
    /// Never fails: a storage error is logged and defaults are returned.
    pub async fn load(storage: &dyn StorageArea) -> Settings {
        match storage.get(&SETTING_KEYS).await {
            Ok(items) => Settings::from_stored(&items),
            Err(e) => {
                log::warn!("Failed to read settings, using defaults: {}", e);
                Settings::default()
            }
        }
    }

    /// Write every settings key in one request.
    pub async fn save(storage: &dyn StorageArea, settings: &Settings) -> HostResult<()> {
        storage.set(settings.to_storage()?).await?;
        log::info!("Saved settings: {:?}", settings);
        Ok(())
    }
}
