//! Editable form fields

use serde::{Deserialize, Serialize};
use tabreload_core::Settings;

/// Parse user input the way a browser's `parseInt` does, clamped to `u64`.
///
/// Leading whitespace and a sign are accepted, a `0x` prefix selects hex,
/// and parsing stops at the first non-digit. No digits, or a negative
/// result, gives 0. Overflow saturates.
pub fn parse_int(input: &str) -> u64 {
    let s = input.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, s) = match s.get(..2) {
        Some("0x") | Some("0X") => (16, &s[2..]),
        _ => (10, s),
    };

    let mut value: u64 = 0;
    let mut any_digit = false;
    for c in s.chars() {
        let Some(digit) = c.to_digit(radix) else {
            break;
        };
        any_digit = true;
        value = value
            .saturating_mul(u64::from(radix))
            .saturating_add(u64::from(digit));
    }

    if !any_digit || negative {
        0
    } else {
        value
    }
}

/// Text shown in a numeric input: empty for the default so the `0`
/// placeholder shows through.
fn number_text(value: u64) -> String {
    if value == 0 {
        String::new()
    } else {
        value.to_string()
    }
}

/// Current state of the option inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsForm {
    pub delay: String,
    pub show_page_context_menu_item: bool,
    pub use_advanced_options: bool,
    pub advanced_delay_range_start: String,
    pub advanced_delay_range_end: String,
}

impl OptionsForm {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            delay: number_text(settings.delay),
            show_page_context_menu_item: settings.show_page_context_menu_item,
            use_advanced_options: settings.use_advanced_options,
            advanced_delay_range_start: number_text(settings.advanced_delay_range_start),
            advanced_delay_range_end: number_text(settings.advanced_delay_range_end),
        }
    }

    /// Settings as currently entered; unparseable numbers become 0.
    pub fn collect(&self) -> Settings {
        Settings {
            delay: parse_int(&self.delay),
            show_page_context_menu_item: self.show_page_context_menu_item,
            use_advanced_options: self.use_advanced_options,
            advanced_delay_range_start: parse_int(&self.advanced_delay_range_start),
            advanced_delay_range_end: parse_int(&self.advanced_delay_range_end),
        }
    }

    /// Whether the entered values differ from `saved`.
    pub fn is_dirty(&self, saved: &Settings) -> bool {
        self.collect() != *saved
    }

    /// The delay range section is shown only in advanced mode.
    pub fn advanced_visible(&self) -> bool {
        self.use_advanced_options
    }
}
