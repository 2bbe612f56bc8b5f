//! JSON-file preference store.
//!
//! The whole map lives in memory and is mirrored to a single JSON object on
//! disk. Every batch is applied to a copy, written to `<file>.tmp`, renamed
//! over the real file, and only then swapped in, so a failed write leaves
//! both the file and the in-memory view unchanged.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::prefs::{PrefValue, PreferenceStore, PrefsEdit, PrefsError};

/// Decode the top-level JSON object. Entries that are not a string, an i32
/// or a bool are skipped with a warning; they are dropped on the next write.
fn parse_entries(path: &Path, bytes: &[u8]) -> Result<BTreeMap<String, PrefValue>, PrefsError> {
    let raw: BTreeMap<String, serde_json::Value> = serde_json::from_slice(bytes)?;
    let mut values = BTreeMap::new();
    for (key, value) in raw {
        match serde_json::from_value::<PrefValue>(value) {
            Ok(v) => {
                values.insert(key, v);
            }
            Err(_) => log::warn!(
                "FilePrefs: ignoring unsupported value for {key:?} in {}",
                path.display()
            ),
        }
    }
    Ok(values)
}

/// Preference store backed by a JSON file.
#[derive(Debug)]
pub struct FilePrefs {
    path: PathBuf,
    values: BTreeMap<String, PrefValue>,
}

impl FilePrefs {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing or empty file is an empty store. The file is not created
    /// until the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let path = path.into();
        let values = match fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => parse_entries(&path, &bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        log::info!(
            "FilePrefs: opened {} ({} entries)",
            path.display(),
            values.len()
        );
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn persist(&self, values: &BTreeMap<String, PrefValue>) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.tmp_path();
        fs::write(&tmp, serde_json::to_vec_pretty(values)?)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

impl PreferenceStore for FilePrefs {
    fn get(&self, key: &str) -> Option<PrefValue> {
        self.values.get(key).cloned()
    }

    fn apply(&mut self, edit: PrefsEdit) -> Result<(), PrefsError> {
        if edit.is_empty() {
            return Ok(());
        }
        let mut next = self.values.clone();
        edit.apply_to(&mut next);
        self.persist(&next)?;
        log::debug!(
            "FilePrefs: applied {} change(s) to {}",
            edit.len(),
            self.path.display()
        );
        self.values = next;
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}
