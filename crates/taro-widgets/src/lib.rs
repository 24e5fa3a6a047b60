//! The **taro** combobox: a searchable, groupable single-value selection
//! control.
//!
//! [`Combobox`](combobox::Combobox) implements [`taro_core::Component`], so it
//! can be embedded inside any [`taro_core::Model`] and laid out with
//! [`ratatui`].
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`combobox`] | State machine, builder and component impl |
//! | [`item`] | Items, groups and the item functions |
//! | [`filter`] | Pure filter & group engine |
//! | [`navigation`] | Highlight movement and scrolling over the flattened list |
//! | [`focus`] | Deferred blur checks and focus return |
//! | [`key`] | Key bindings |
//! | [`overlay`] | Floating-panel placement |
//! | [`panel`] | Trigger / panel rendering and the pointer hit map |

pub mod combobox;
pub mod filter;
pub mod focus;
pub mod item;
pub mod key;
pub mod navigation;
pub mod overlay;
pub mod panel;

pub use combobox::{Combobox, ComboboxState, Message};
pub use item::{Group, Item};
pub use panel::ComboboxStyle;
