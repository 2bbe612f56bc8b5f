//! Key-value preferences.
//!
//! Values are strings, integers or booleans, mirroring what a launcher's
//! shared-preferences file holds. Writes go through [`PrefsEdit`] batches so
//! a backend can apply several keys at once, all or nothing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("Preference file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Preference file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A stored preference value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Str(String),
    Int(i32),
    Bool(bool),
}

impl PrefValue {
    fn kind(&self) -> &'static str {
        match self {
            PrefValue::Str(_) => "string",
            PrefValue::Int(_) => "int",
            PrefValue::Bool(_) => "bool",
        }
    }
}

impl From<&str> for PrefValue {
    fn from(v: &str) -> Self {
        PrefValue::Str(v.to_owned())
    }
}

impl From<String> for PrefValue {
    fn from(v: String) -> Self {
        PrefValue::Str(v)
    }
}

impl From<i32> for PrefValue {
    fn from(v: i32) -> Self {
        PrefValue::Int(v)
    }
}

impl From<bool> for PrefValue {
    fn from(v: bool) -> Self {
        PrefValue::Bool(v)
    }
}

/// One change inside a [`PrefsEdit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrefOp {
    Put(String, PrefValue),
    Remove(String),
}

/// Ordered batch of changes, applied atomically by a store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrefsEdit {
    ops: Vec<PrefOp>,
}

impl PrefsEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(mut self, key: impl Into<String>, value: impl Into<PrefValue>) -> Self {
        self.ops.push(PrefOp::Put(key.into(), value.into()));
        self
    }

    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.ops.push(PrefOp::Remove(key.into()));
        self
    }

    /// Append every change of `other` after the changes already queued.
    pub fn merge(mut self, other: PrefsEdit) -> Self {
        self.ops.extend(other.ops);
        self
    }

    pub fn ops(&self) -> &[PrefOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Replay the batch onto a plain map, in order.
    pub fn apply_to(&self, map: &mut BTreeMap<String, PrefValue>) {
        for op in &self.ops {
            match op {
                PrefOp::Put(key, value) => {
                    map.insert(key.clone(), value.clone());
                }
                PrefOp::Remove(key) => {
                    map.remove(key);
                }
            }
        }
    }
}

/// A key-value preference backend.
///
/// Typed getters fall back to the default when the key is missing or holds
/// a value of another type.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<PrefValue>;

    /// Apply every change in `edit`, or none of them.
    fn apply(&mut self, edit: PrefsEdit) -> Result<(), PrefsError>;

    /// All keys currently stored, sorted.
    fn keys(&self) -> Vec<String>;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn get_string(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(PrefValue::Str(v)) => v,
            Some(other) => {
                log::warn!("Preference {key} holds a {}, expected string", other.kind());
                default.to_owned()
            }
            None => default.to_owned(),
        }
    }

    fn get_int(&self, key: &str, default: i32) -> i32 {
        match self.get(key) {
            Some(PrefValue::Int(v)) => v,
            Some(other) => {
                log::warn!("Preference {key} holds a {}, expected int", other.kind());
                default
            }
            None => default,
        }
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(PrefValue::Bool(v)) => v,
            Some(other) => {
                log::warn!("Preference {key} holds a {}, expected bool", other.kind());
                default
            }
            None => default,
        }
    }

    fn put_string(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.apply(PrefsEdit::new().put(key, value))
    }

    fn put_int(&mut self, key: &str, value: i32) -> Result<(), PrefsError> {
        self.apply(PrefsEdit::new().put(key, value))
    }

    fn put_bool(&mut self, key: &str, value: bool) -> Result<(), PrefsError> {
        self.apply(PrefsEdit::new().put(key, value))
    }

    fn remove(&mut self, key: &str) -> Result<(), PrefsError> {
        self.apply(PrefsEdit::new().remove(key))
    }
}

/// In-memory preference store.
#[derive(Clone, Debug, Default)]
pub struct MemoryPrefs {
    values: BTreeMap<String, PrefValue>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PreferenceStore for MemoryPrefs {
    fn get(&self, key: &str) -> Option<PrefValue> {
        self.values.get(key).cloned()
    }

    fn apply(&mut self, edit: PrefsEdit) -> Result<(), PrefsError> {
        edit.apply_to(&mut self.values);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}
