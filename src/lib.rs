//! wikifind: interactive encyclopedia search from the terminal.
//!
//! This crate is the application shell around [`wikifind_search`]:
//!
//! - **Configuration**: TOML config file with search and logging sections
//! - **Preferences**: the chosen language, persisted between runs
//! - **Messages**: English and Indonesian interface strings
//! - **Presenter**: plain-text rendering of search views with article links
//! - **Session**: query, language and suggestion-highlight state driven by
//!   line commands
//!
//! The `wikifind` binary wires these to a debounced
//! [`wikifind_search::SearchOrchestrator`] reading from stdin.

pub mod config;
pub mod error;
pub mod messages;
pub mod preferences;
pub mod render;
pub mod session;
pub mod wikifind_dirs;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use preferences::Preferences;
pub use render::Presenter;
pub use session::{Action, Session};
