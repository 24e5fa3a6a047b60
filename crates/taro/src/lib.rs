//! **taro** -- a searchable, groupable combobox for [`ratatui`] apps.
//!
//! This is the umbrella crate that re-exports everything you need from a
//! single dependency:
//!
//! ```toml
//! [dependencies]
//! taro = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`taro_core`] are available at the crate root
//!   ([`Model`], [`Component`], [`Command`], [`Program`], [`run`],
//!   [`run_with`], etc.).
//! * The [`widgets`] module re-exports everything from [`taro_widgets`].
//! * [`ratatui`], [`crossterm`], and [`tokio`] are re-exported so downstream
//!   crates do not need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use taro::widgets::{Combobox, Item, Message as ComboMsg};
//! use taro::{Command, Component, Model};
//! use ratatui::Frame;
//!
//! struct App {
//!     fruit: Combobox<String>,
//! }
//!
//! enum Msg {
//!     Fruit(ComboMsg<String>),
//! }
//!
//! impl Model for App {
//!     type Message = Msg;
//!     type Flags = ();
//!
//!     fn init(_: ()) -> (Self, Command<Msg>) {
//!         let fruit = Combobox::new(vec![
//!             Item::new("apple".to_string(), "Apple"),
//!             Item::new("pear".to_string(), "Pear"),
//!         ]);
//!         (App { fruit }, Command::none())
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Command<Msg> {
//!         match msg {
//!             Msg::Fruit(ComboMsg::Changed(v)) => {
//!                 self.fruit.set_value(Some(v));
//!                 Command::none()
//!             }
//!             Msg::Fruit(m) => self.fruit.update(m).map(Msg::Fruit),
//!         }
//!     }
//!
//!     fn view(&self, frame: &mut Frame) {
//!         self.fruit.view(frame, frame.area());
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     taro::run::<App>(()).await.unwrap();
//! }
//! ```

pub use taro_core::*;
pub mod widgets {
    pub use taro_widgets::*;
}

// Re-export dependencies for use in demos and downstream crates
pub use crossterm;
pub use ratatui;
pub use tokio;
