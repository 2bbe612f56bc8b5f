//! # textcover-core
//!
//! Widget identity and per-widget settings persistence for textcover.
//!
//! ## Architecture
//!
//! ```text
//! WidgetSettings ──load/edit_for──► "<prefix><widgetId>" keys
//!                                        │
//!                                        ▼
//!                              PreferenceStore (trait)
//!                               ├── MemoryPrefs  (BTreeMap)
//!                               └── FilePrefs    (JSON file, atomic batches)
//! ```
//!
//! - **`prefs`** — Typed values, edit batches, the store trait, in-memory backend.
//! - **`file`** — JSON-file backend.
//! - **`settings`** — Key layout, rotation positions, `WidgetSettings`.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod file;
pub mod prefs;
pub mod settings;

pub use file::FilePrefs;
pub use prefs::{MemoryPrefs, PrefOp, PrefValue, PreferenceStore, PrefsEdit, PrefsError};
pub use settings::{
    rotation_angle, PrefField, RotationPosition, WidgetSettings, DEFAULT_TEXT,
};

/// Platform-assigned identifier of one placed widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(pub i32);

impl WidgetId {
    /// The id a launcher reports when no widget is attached.
    pub const INVALID: WidgetId = WidgetId(0);

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl From<i32> for WidgetId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
