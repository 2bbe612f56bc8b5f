//! Widget lifecycle integration tests.
//!
//! Verifies, against a real JSON preference file and PNG output directory:
//! - Saving settings writes both widgets and survives a restart
//! - A rejected save leaves the stored settings and images untouched
//! - Update re-renders from stored settings
//! - Delete removes every key of the deleted widgets

use std::fs;

use tempfile::tempdir;
use textcover_core::{FilePrefs, PreferenceStore, WidgetId, WidgetSettings};
use textcover_widget::{App, AppConfig, SettingsError, SAVE_ERROR_MESSAGE};

const FRONT: WidgetId = WidgetId(21);
const BACK: WidgetId = WidgetId(22);

fn settings(text: &str, rotation: i32, center: bool) -> WidgetSettings {
    WidgetSettings {
        text: text.into(),
        rotation_position: rotation,
        center_text: center,
    }
}

#[test]
fn test_save_persists_both_widgets_across_restart() {
    let dir = tempdir().unwrap();
    let config = AppConfig::for_testing(dir.path());
    let form = settings("On a call", 2, false);

    {
        let mut app = App::start(config.clone()).unwrap();
        let editor = app.editor(FRONT, BACK);
        app.save_settings(&editor, &form).unwrap();
        assert!(app.host().image_path(FRONT).exists());
        assert!(app.host().image_path(BACK).exists());
    }

    let prefs = FilePrefs::open(&config.prefs_path).unwrap();
    assert_eq!(WidgetSettings::load(&prefs, FRONT, ""), form);
    assert_eq!(WidgetSettings::load(&prefs, BACK, ""), form);

    let app = App::start(config).unwrap();
    let editor = app.editor(FRONT, BACK);
    assert_eq!(app.load_settings(&editor), form);
}

#[test]
fn test_rejected_save_changes_nothing() {
    let dir = tempdir().unwrap();
    let config = AppConfig::for_testing(dir.path());
    let mut app = App::start(config.clone()).unwrap();
    let editor = app.editor(FRONT, BACK);

    let original = settings("Short", 0, true);
    app.save_settings(&editor, &original).unwrap();
    let prefs_before = fs::read(&config.prefs_path).unwrap();
    let image_before = fs::read(app.host().image_path(FRONT)).unwrap();

    let err = app
        .save_settings(&editor, &settings(&"tall\n".repeat(300), 0, true))
        .unwrap_err();
    assert!(matches!(err, SettingsError::Render(_)));
    assert_eq!(err.inline_message(), SAVE_ERROR_MESSAGE);

    assert_eq!(fs::read(&config.prefs_path).unwrap(), prefs_before);
    assert_eq!(fs::read(app.host().image_path(FRONT)).unwrap(), image_before);
    assert_eq!(app.load_settings(&editor), original);
}

#[test]
fn test_update_renders_stored_settings() {
    let dir = tempdir().unwrap();
    let config = AppConfig::for_testing(dir.path());
    let mut app = App::start(config).unwrap();
    let editor = app.editor(FRONT, BACK);
    app.save_settings(&editor, &settings("Do not\ndisturb", 0, true))
        .unwrap();

    let front = app.host().image_path(FRONT);
    fs::remove_file(&front).unwrap();

    let report = app.update(&[FRONT, WidgetId(99)]);
    assert!(report.is_complete());
    assert_eq!(report.updated, vec![FRONT, WidgetId(99)]);
    assert!(front.exists());
    // Unconfigured widgets show the placeholder.
    assert!(app.host().image_path(WidgetId(99)).exists());
}

#[test]
fn test_delete_removes_widget_keys() {
    let dir = tempdir().unwrap();
    let config = AppConfig::for_testing(dir.path());
    {
        let mut app = App::start(config.clone()).unwrap();
        let editor = app.editor(FRONT, BACK);
        app.save_settings(&editor, &settings("Bye", 1, true)).unwrap();
        app.delete(&[FRONT]).unwrap();
    }

    let prefs = FilePrefs::open(&config.prefs_path).unwrap();
    assert_eq!(
        prefs.keys(),
        vec!["bigText_22", "centerText_22", "rotation_22"]
    );
}
