//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, the State Sink channel, replay cursor and keyboard loop
//! - **[`panes`]**: stateless render functions for the structure view, run info,
//!   step list and status bar
//! - **[`theme`]**: centralized color palette and the mark → color mapping
//!
//! The entry point for consumers is [`App`]: construct it with an algorithm and a
//! [`RunConfig`] and call [`App::run`] to start the event loop.
//!
//! [`RunConfig`]: crate::config::RunConfig
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
