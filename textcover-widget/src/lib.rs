//! # textcover-widget
//!
//! Widget lifecycle on top of `textcover-text` and `textcover-core`:
//! the update/delete callbacks, the settings editor shared by a front and a
//! back widget, and a host abstraction that receives rendered images.
//!
//! ## Architecture
//!
//! ```text
//!            App ──────────────┬───────────────┐
//!             │                │               │
//!       WidgetUpdater    SettingsEditor     AppConfig
//!             │                │
//!             ▼                ▼
//!   PreferenceStore ◄── render() ──► WidgetHost
//!                                     ├── PngDirHost (widget_<id>.png)
//!                                     └── MemoryHost
//! ```

pub mod app;
pub mod config;
pub mod host;
pub mod settings;
pub mod updater;

pub use app::{build_engine, App, AppError};
pub use config::{AppConfig, ConfigError};
pub use host::{HostError, MemoryHost, PngDirHost, WidgetHost};
pub use settings::{SettingsEditor, SettingsError, PERSIST_ERROR_MESSAGE, SAVE_ERROR_MESSAGE};
pub use updater::{UpdateError, UpdateReport, WidgetUpdater};
