//! Options page state and the save action

use crate::form::OptionsForm;
use std::time::Duration;
use tabreload_background::sync_page_menu;
use tabreload_core::{MenuHost, Settings, SettingsStore, StorageArea, TabReloadResult};

/// How long the success message stays before [`OptionsPage::clear_status`].
pub const STATUS_CLEAR_DELAY: Duration = Duration::from_millis(1500);

/// Period of the save button pulse while there are unsaved changes.
pub const PULSE_INTERVAL: Duration = Duration::from_millis(500);

const SAVED_MESSAGE: &str = "Options saved successfully.";

/// Visual state of the save button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveButton {
    /// Nothing to save.
    Disabled,
    /// Unsaved changes; `highlighted` alternates every [`PULSE_INTERVAL`].
    Pulsing { highlighted: bool },
}

#[derive(Debug, Clone)]
pub struct OptionsPage {
    pub form: OptionsForm,
    saved: Settings,
    status: String,
    highlighted: bool,
}

impl OptionsPage {
    /// Load settings and sync the page menu entry, as opening the page does.
    pub async fn open(storage: &dyn StorageArea, menus: &dyn MenuHost) -> Self {
        let saved = SettingsStore::load(storage).await;
        sync_page_menu(menus, &saved).await;
        Self::with_settings(saved)
    }

    pub fn with_settings(saved: Settings) -> Self {
        Self {
            form: OptionsForm::from_settings(&saved),
            saved,
            status: String::new(),
            highlighted: false,
        }
    }

    /// Settings as last written to storage.
    pub fn saved(&self) -> &Settings {
        &self.saved
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn clear_status(&mut self) {
        self.status.clear();
    }

    pub fn is_dirty(&self) -> bool {
        self.form.is_dirty(&self.saved)
    }

    pub fn save_button(&self) -> SaveButton {
        if self.is_dirty() {
            SaveButton::Pulsing {
                highlighted: self.highlighted,
            }
        } else {
            SaveButton::Disabled
        }
    }

    /// Advance the pulse by one [`PULSE_INTERVAL`].
    pub fn tick_pulse(&mut self) {
        self.highlighted = self.is_dirty() && !self.highlighted;
    }

    /// Write the form to storage.
    ///
    /// On failure the status shows the error and menus are left alone. On
    /// success the saved baseline moves and the page menu entry is synced.
    pub async fn save(
        &mut self,
        storage: &dyn StorageArea,
        menus: &dyn MenuHost,
    ) -> TabReloadResult<()> {
        let settings = self.form.collect();

        if let Err(e) = SettingsStore::save(storage, &settings).await {
            log::error!("Failed to save options: {}", e);
            self.status = format!("Error! {}", e);
            return Err(e);
        }

        self.status = SAVED_MESSAGE.to_string();
        self.saved = settings;
        self.highlighted = false;
        sync_page_menu(menus, &self.saved).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tabreload_core::menu::RELOAD_ALL_TABS_IN_WINDOW;
    use tabreload_shell::{BrowserShell, HostCall};

    #[tokio::test]
    async fn test_open_loads_saved_settings() {
        let shell = BrowserShell::new();
        shell.put_storage("delay", json!(120));
        shell.put_storage("use_advanced_options", json!("true"));

        let page = OptionsPage::open(&shell, &shell).await;

        assert_eq!(page.saved().delay, 120);
        assert!(!page.saved().use_advanced_options);
        assert_eq!(page.form.delay, "120");
        assert!(shell.has_menu(RELOAD_ALL_TABS_IN_WINDOW));
        assert_eq!(page.save_button(), SaveButton::Disabled);
    }

    #[tokio::test]
    async fn test_save_malformed_number_stores_zero() {
        let shell = BrowserShell::new();
        shell.put_storage("delay", json!(500));
        let mut page = OptionsPage::open(&shell, &shell).await;

        page.form.delay = String::new();
        page.save(&shell, &shell).await.unwrap();

        assert_eq!(shell.storage()["delay"], json!(0));
        assert_eq!(page.status(), "Options saved successfully.");
        assert!(!page.is_dirty());
    }

    #[tokio::test]
    async fn test_save_writes_full_record_once() {
        let shell = BrowserShell::new();
        let mut page = OptionsPage::open(&shell, &shell).await;
        shell.clear_calls();

        page.form.use_advanced_options = true;
        page.form.advanced_delay_range_start = "100".to_string();
        page.form.advanced_delay_range_end = "50".to_string();
        page.save(&shell, &shell).await.unwrap();

        let writes = shell
            .calls()
            .into_iter()
            .filter(|c| *c == HostCall::StorageSet)
            .count();
        assert_eq!(writes, 1);
        assert_eq!(
            serde_json::Value::Object(shell.storage()),
            json!({
                "delay": 0,
                "show_page_context_menu_item": true,
                "use_advanced_options": true,
                "advanced_delay_range_start": 100,
                "advanced_delay_range_end": 50,
            })
        );
    }

    #[tokio::test]
    async fn test_save_toggles_page_menu() {
        let shell = BrowserShell::new();
        let mut page = OptionsPage::open(&shell, &shell).await;
        assert!(shell.has_menu(RELOAD_ALL_TABS_IN_WINDOW));

        page.form.show_page_context_menu_item = false;
        page.save(&shell, &shell).await.unwrap();
        assert!(!shell.has_menu(RELOAD_ALL_TABS_IN_WINDOW));

        page.form.show_page_context_menu_item = true;
        page.save(&shell, &shell).await.unwrap();
        assert!(shell.has_menu(RELOAD_ALL_TABS_IN_WINDOW));
    }

    #[tokio::test]
    async fn test_failed_save_reports_and_skips_menus() {
        let shell = BrowserShell::new();
        let mut page = OptionsPage::open(&shell, &shell).await;
        shell.set_storage_failing(true);
        shell.clear_calls();

        page.form.show_page_context_menu_item = false;
        assert!(page.save(&shell, &shell).await.is_err());

        assert!(page.status().starts_with("Error! "));
        assert!(page.is_dirty());
        assert!(shell.has_menu(RELOAD_ALL_TABS_IN_WINDOW));
        assert!(!shell
            .calls()
            .iter()
            .any(|c| matches!(c, HostCall::MenuRemove(_) | HostCall::MenuCreate(_))));
    }

    #[test]
    fn test_save_button_pulses_while_dirty() {
        let mut page = OptionsPage::with_settings(Settings::default());
        page.tick_pulse();
        assert_eq!(page.save_button(), SaveButton::Disabled);

        page.form.delay = "10".to_string();
        page.tick_pulse();
        assert_eq!(page.save_button(), SaveButton::Pulsing { highlighted: true });
        page.tick_pulse();
        assert_eq!(page.save_button(), SaveButton::Pulsing { highlighted: false });

        page.form.delay = String::new();
        page.tick_pulse();
        assert_eq!(page.save_button(), SaveButton::Disabled);
    }

    #[test]
    fn test_clear_status() {
        let mut page = OptionsPage::with_settings(Settings::default());
        page.status = SAVED_MESSAGE.to_string();
        page.clear_status();
        assert_eq!(page.status(), "");
    }
}
