//! Options page model
//!
//! Holds the form state behind the options page: raw text of the numeric
//! inputs, checkbox states, the last saved settings and the save status
//! line. Rendering is left to the embedding UI.

pub mod form;
pub mod page;

pub use form::{parse_int, OptionsForm};
pub use page::{OptionsPage, SaveButton, PULSE_INTERVAL, STATUS_CLEAR_DELAY};
