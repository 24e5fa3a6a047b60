//! Core runtime for **taro**.
//!
//! `taro-core` provides the traits, types, and runtime that drive taro
//! components. The design follows the [Elm Architecture]: state changes
//! happen in a synchronous **init -> update -> view** cycle, with side
//! effects pushed to the edges through [`Command`]s.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Model`] | Top-level application trait (init / update / view / event) |
//! | [`Component`] | Reusable sub-model that renders into a [`ratatui::layout::Rect`] |
//! | [`Command`] | Describes a side effect to be executed by the runtime |
//! | [`Program`] | Wires a [`Model`] to a real terminal and drives the event loop |
//! | [`TestProgram`](testing::TestProgram) | Headless harness for a [`Model`] |
//! | [`ComponentHarness`](testing::ComponentHarness) | Headless harness for a single [`Component`] |
//!
//! # Scheduling
//!
//! Every `update` runs to completion before the next message is processed.
//! The only way to observe the world "a moment later" is a deferred command
//! such as [`Command::next_tick`]: the runtime spawns it, and its message
//! re-enters the queue behind whatever arrived in the meantime.
//!
//! [Elm Architecture]: https://guide.elm-lang.org/architecture/

pub mod command;
pub mod component;
pub mod event;
pub mod model;
pub mod runtime;
pub mod testing;

pub use command::Command;
pub use component::Component;
pub use event::TerminalEvent;
pub use model::Model;
pub use runtime::{log_to_file, run, run_with, Program, ProgramError, ProgramOptions};
