//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: browser state, keyboard event loop, pane focus and selection
//! - **[`panes`]**: stateless render functions for each visible pane (source,
//!   declarations, details, diagnostics, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a parsed
//! [`TranslationUnit`] and its source text, then call [`App::run`] to start
//! the event loop.
//!
//! [`TranslationUnit`]: crate::parser::ast::TranslationUnit
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
