//! TabReload Core Library
//!
//! This crate provides shared types, errors, settings and the host
//! capability traits used by the background process and the options page.

pub mod config;
pub mod error;
pub mod host;
pub mod menu;
pub mod types;

pub use config::{Settings, SettingsStore, SETTING_KEYS};
pub use error::{HostResult, TabReloadError, TabReloadResult};
pub use host::{MenuHost, StorageArea, TabHost};
