//! Per-widget settings and their preference keys.
//!
//! Each widget instance owns three keys, `"<prefix><widgetId>"`:
//!
//! | Field       | Prefix        | Type   | Default        |
//! |-------------|---------------|--------|----------------|
//! | text        | `bigText_`    | string | [`DEFAULT_TEXT`] |
//! | rotation    | `rotation_`   | int    | `0`            |
//! | center text | `centerText_` | bool   | `true`         |

use std::fmt;

use crate::prefs::{PreferenceStore, PrefsEdit};
use crate::WidgetId;

/// Placeholder shown until the user saves their own text.
pub const DEFAULT_TEXT: &str = "Hello\nWorld";

/// Degrees per rotation selector step.
const DEGREES_PER_STEP: i32 = 45;

/// The preference fields stored for each widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrefField {
    Text,
    Rotation,
    CenterText,
}

impl PrefField {
    pub const ALL: [PrefField; 3] = [PrefField::Text, PrefField::Rotation, PrefField::CenterText];

    pub fn prefix(self) -> &'static str {
        match self {
            PrefField::Text => "bigText_",
            PrefField::Rotation => "rotation_",
            PrefField::CenterText => "centerText_",
        }
    }

    /// Preference key of this field for widget `id`.
    pub fn key(self, id: WidgetId) -> String {
        format!("{}{}", self.prefix(), id)
    }
}

/// Rotation in degrees for a selector position: `position * 45`.
///
/// Out-of-range positions are accepted; on overflow the equivalent angle
/// modulo 360 is returned.
pub fn rotation_angle(position: i32) -> i32 {
    position
        .checked_mul(DEGREES_PER_STEP)
        .unwrap_or_else(|| position.rem_euclid(8) * DEGREES_PER_STEP)
}

/// One of the eight positions of the settings rotation selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RotationPosition(u8);

impl RotationPosition {
    pub const COUNT: u8 = 8;

    pub fn new(position: i32) -> Option<Self> {
        (0..Self::COUNT as i32)
            .contains(&position)
            .then_some(Self(position as u8))
    }

    /// Every selectable position, in selector order.
    pub fn all() -> impl Iterator<Item = RotationPosition> {
        (0..Self::COUNT).map(RotationPosition)
    }

    pub fn index(self) -> i32 {
        self.0 as i32
    }

    pub fn degrees(self) -> i32 {
        rotation_angle(self.index())
    }
}

impl fmt::Display for RotationPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// What a widget displays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetSettings {
    pub text: String,
    /// Rotation selector position, 0..=7 when written by the settings editor.
    pub rotation_position: i32,
    pub center_text: bool,
}

impl WidgetSettings {
    pub fn defaults(default_text: &str) -> Self {
        Self {
            text: default_text.to_owned(),
            rotation_position: 0,
            center_text: true,
        }
    }

    /// Read the settings of widget `id`, falling back to defaults per field.
    pub fn load<S: PreferenceStore + ?Sized>(store: &S, id: WidgetId, default_text: &str) -> Self {
        Self {
            text: store.get_string(&PrefField::Text.key(id), default_text),
            rotation_position: store.get_int(&PrefField::Rotation.key(id), 0),
            center_text: store.get_bool(&PrefField::CenterText.key(id), true),
        }
    }

    /// Rotation in degrees.
    pub fn angle(&self) -> i32 {
        rotation_angle(self.rotation_position)
    }

    /// Batch that stores these settings under widget `id`.
    pub fn edit_for(&self, id: WidgetId) -> PrefsEdit {
        PrefsEdit::new()
            .put(PrefField::Text.key(id), self.text.as_str())
            .put(PrefField::Rotation.key(id), self.rotation_position)
            .put(PrefField::CenterText.key(id), self.center_text)
    }

    /// Batch that deletes every key of widget `id`.
    pub fn removal(id: WidgetId) -> PrefsEdit {
        PrefField::ALL
            .iter()
            .fold(PrefsEdit::new(), |edit, field| edit.remove(field.key(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPrefs;

    #[test]
    fn test_keys() {
        assert_eq!(PrefField::Text.key(WidgetId(12)), "bigText_12");
        assert_eq!(PrefField::Rotation.key(WidgetId(12)), "rotation_12");
        assert_eq!(PrefField::CenterText.key(WidgetId(12)), "centerText_12");
    }

    #[test]
    fn test_rotation_angle() {
        assert_eq!(rotation_angle(0), 0);
        assert_eq!(rotation_angle(3), 135);
        assert_eq!(rotation_angle(7), 315);
        assert_eq!(rotation_angle(-1), -45);
        assert_eq!(rotation_angle(i32::MAX).rem_euclid(360), (i32::MAX % 8) * 45);
    }

    #[test]
    fn test_rotation_position_range() {
        assert!(RotationPosition::new(-1).is_none());
        assert!(RotationPosition::new(8).is_none());
        assert_eq!(RotationPosition::new(2).map(|p| p.degrees()), Some(90));
        let degrees: Vec<i32> = RotationPosition::all().map(|p| p.degrees()).collect();
        assert_eq!(degrees, vec![0, 45, 90, 135, 180, 225, 270, 315]);
    }

    #[test]
    fn test_rotation_position_display() {
        assert_eq!(RotationPosition::new(1).unwrap().to_string(), "45°");
    }

    #[test]
    fn test_load_defaults() {
        let prefs = MemoryPrefs::new();
        let settings = WidgetSettings::load(&prefs, WidgetId(1), "placeholder");
        assert_eq!(settings, WidgetSettings::defaults("placeholder"));
        assert_eq!(settings.angle(), 0);
        assert!(settings.center_text);
    }

    #[test]
    fn test_edit_and_load_roundtrip() {
        let mut prefs = MemoryPrefs::new();
        let settings = WidgetSettings {
            text: "Busy".into(),
            rotation_position: 2,
            center_text: false,
        };
        prefs.apply(settings.edit_for(WidgetId(9))).unwrap();
        assert_eq!(WidgetSettings::load(&prefs, WidgetId(9), "x"), settings);
        assert_eq!(settings.angle(), 90);
    }

    #[test]
    fn test_settings_are_per_widget() {
        let mut prefs = MemoryPrefs::new();
        let settings = WidgetSettings {
            text: "Only nine".into(),
            rotation_position: 4,
            center_text: false,
        };
        prefs.apply(settings.edit_for(WidgetId(9))).unwrap();
        let other = WidgetSettings::load(&prefs, WidgetId(10), "dflt");
        assert_eq!(other, WidgetSettings::defaults("dflt"));
    }

    #[test]
    fn test_removal_clears_only_that_widget() {
        let mut prefs = MemoryPrefs::new();
        let settings = WidgetSettings::defaults("t");
        prefs.apply(settings.edit_for(WidgetId(1))).unwrap();
        prefs.apply(settings.edit_for(WidgetId(2))).unwrap();
        prefs.apply(WidgetSettings::removal(WidgetId(1))).unwrap();
        assert_eq!(prefs.keys(), vec!["bigText_2", "centerText_2", "rotation_2"]);
    }
}
