//! Application handle: owns the text engine, the preference store and the
//! widget host, and routes lifecycle events to them.

use thiserror::Error;

use textcover_core::{FilePrefs, PreferenceStore, PrefsError, WidgetId, WidgetSettings};
use textcover_text::{render, RasterImage, RenderConfig, RenderError, TextEngine};

use crate::config::{AppConfig, ConfigError};
use crate::host::{PngDirHost, WidgetHost};
use crate::settings::{SettingsEditor, SettingsError};
use crate::updater::{UpdateReport, WidgetUpdater};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Preference store error: {0}")]
    Prefs(#[from] PrefsError),
}

/// Text engine with system fonts plus every configured font directory.
pub fn build_engine(config: &AppConfig) -> TextEngine {
    let mut engine = TextEngine::new();
    for dir in &config.font_dirs {
        engine.load_fonts_dir(dir);
    }
    engine
}

/// Widget application state.
pub struct App<S = FilePrefs, H = PngDirHost> {
    config: AppConfig,
    engine: TextEngine,
    store: S,
    host: H,
    updater: WidgetUpdater,
}

impl App {
    /// Start with a file-backed store and a PNG directory host.
    pub fn start(config: AppConfig) -> Result<Self, AppError> {
        config.validate()?;

        let engine = build_engine(&config);
        let store = FilePrefs::open(&config.prefs_path)?;
        let host = PngDirHost::new(&config.output_dir);
        log::info!(
            "Started: prefs {}, output {}, {} font face(s)",
            config.prefs_path.display(),
            config.output_dir.display(),
            engine.face_count(),
        );
        Ok(Self::with_parts(config, engine, store, host))
    }
}

impl<S: PreferenceStore, H: WidgetHost> App<S, H> {
    pub fn with_parts(config: AppConfig, engine: TextEngine, store: S, host: H) -> Self {
        let updater = WidgetUpdater::new(config.text_size, config.default_text.clone());
        Self {
            config,
            engine,
            store,
            host,
            updater,
        }
    }

    /// Update event for `ids`.
    pub fn update(&mut self, ids: &[WidgetId]) -> UpdateReport {
        self.updater
            .on_update(&mut self.engine, &self.store, &mut self.host, ids)
    }

    /// Delete event for `ids`.
    pub fn delete(&mut self, ids: &[WidgetId]) -> Result<(), PrefsError> {
        self.updater.on_deleted(&mut self.store, ids)
    }

    pub fn editor(&self, front: WidgetId, back: WidgetId) -> SettingsEditor {
        SettingsEditor::new(front, back)
    }

    /// Settings the editor opens with.
    pub fn load_settings(&self, editor: &SettingsEditor) -> WidgetSettings {
        editor.open(&self.store, &self.config.default_text)
    }

    pub fn save_settings(
        &mut self,
        editor: &SettingsEditor,
        form: &WidgetSettings,
    ) -> Result<(), SettingsError> {
        editor.save(
            &mut self.engine,
            &mut self.store,
            &mut self.host,
            form,
            self.config.text_size,
        )
    }

    /// Render text without touching any widget.
    pub fn render_preview(&mut self, text: &str, config: &RenderConfig) -> Result<RasterImage, RenderError> {
        render(&mut self.engine, text, config)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}

impl<S, H> Drop for App<S, H> {
    fn drop(&mut self) {
        log::debug!("Shutting down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use tempfile::tempdir;
    use textcover_core::MemoryPrefs;

    fn memory_app() -> App<MemoryPrefs, MemoryHost> {
        let dir = std::env::temp_dir();
        App::with_parts(
            AppConfig::for_testing(dir),
            TextEngine::new(),
            MemoryPrefs::new(),
            MemoryHost::new(),
        )
    }

    #[test]
    fn test_start_rejects_invalid_config() {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            text_size: -1.0,
            ..AppConfig::for_testing(dir.path())
        };
        assert!(matches!(App::start(config), Err(AppError::Config(_))));
    }

    #[test]
    fn test_build_engine_loads_font_dirs() {
        let system = TextEngine::new();
        let font = system
            .font_system
            .db()
            .faces()
            .find_map(|face| match &face.source {
                textcover_text::cosmic_text::fontdb::Source::File(path) => Some(path.clone()),
                _ => None,
            })
            .expect("system fonts should be file-backed");
        let dir = tempdir().unwrap();
        std::fs::copy(&font, dir.path().join(font.file_name().unwrap())).unwrap();

        let config = AppConfig {
            font_dirs: vec![dir.path().to_path_buf(), dir.path().join("missing")],
            ..AppConfig::for_testing(dir.path())
        };
        assert!(build_engine(&config).face_count() > system.face_count());
    }

    #[test]
    fn test_start_with_corrupt_prefs() {
        let dir = tempdir().unwrap();
        let config = AppConfig::for_testing(dir.path());
        std::fs::write(&config.prefs_path, "not json").unwrap();
        assert!(matches!(App::start(config), Err(AppError::Prefs(_))));
    }

    #[test]
    fn test_save_then_update() {
        let mut app = memory_app();
        let editor = app.editor(WidgetId(1), WidgetId(2));
        let form = WidgetSettings {
            text: "Back soon".into(),
            rotation_position: 0,
            center_text: true,
        };
        app.save_settings(&editor, &form).unwrap();
        assert_eq!(app.load_settings(&editor), form);

        let report = app.update(&[WidgetId(1), WidgetId(2)]);
        assert!(report.is_complete());
        assert_eq!(app.host().image(WidgetId(1)), app.host().image(WidgetId(2)));
    }

    #[test]
    fn test_delete_clears_store() {
        let mut app = memory_app();
        let editor = app.editor(WidgetId(1), WidgetId(2));
        app.save_settings(&editor, &WidgetSettings::defaults("t")).unwrap();
        app.delete(&[WidgetId(1), WidgetId(2)]).unwrap();
        assert!(app.store().is_empty());
    }

    #[test]
    fn test_render_preview_does_not_show() {
        let mut app = memory_app();
        let image = app
            .render_preview("Preview", &RenderConfig::default())
            .unwrap();
        assert_eq!(image.height(), 220);
        assert_eq!(app.host().shown(), 0);
    }
}
