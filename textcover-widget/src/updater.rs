//! Widget updater — the update/delete callbacks of the widget lifecycle.
//!
//! On update, every widget is rendered from its own settings. A widget whose
//! image cannot be produced or shown is skipped and keeps its previous image;
//! the remaining widgets are still updated.

use thiserror::Error;

use textcover_core::{PreferenceStore, PrefsEdit, PrefsError, WidgetId, WidgetSettings};
use textcover_text::{render, RasterImage, RenderConfig, RenderError, TextEngine};

use crate::host::{HostError, WidgetHost};

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),
    #[error("Host rejected image: {0}")]
    Host(#[from] HostError),
}

/// Outcome of one update pass.
#[derive(Debug, Default)]
pub struct UpdateReport {
    pub updated: Vec<WidgetId>,
    pub failed: Vec<(WidgetId, UpdateError)>,
}

impl UpdateReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Renders widgets from their stored settings.
#[derive(Debug, Clone)]
pub struct WidgetUpdater {
    text_size: f32,
    default_text: String,
}

impl WidgetUpdater {
    pub fn new(text_size: f32, default_text: impl Into<String>) -> Self {
        Self {
            text_size,
            default_text: default_text.into(),
        }
    }

    /// Rendering parameters for `settings`.
    pub fn render_config(&self, settings: &WidgetSettings) -> RenderConfig {
        RenderConfig::new(self.text_size, settings.angle(), settings.center_text)
    }

    /// Render widget `id` from the store without showing it.
    pub fn render_widget<S: PreferenceStore + ?Sized>(
        &self,
        engine: &mut TextEngine,
        store: &S,
        id: WidgetId,
    ) -> Result<RasterImage, RenderError> {
        let settings = WidgetSettings::load(store, id, &self.default_text);
        render(engine, &settings.text, &self.render_config(&settings))
    }

    /// Render widget `id` and hand the image to the host.
    pub fn update_widget<S, H>(
        &self,
        engine: &mut TextEngine,
        store: &S,
        host: &mut H,
        id: WidgetId,
    ) -> Result<(), UpdateError>
    where
        S: PreferenceStore + ?Sized,
        H: WidgetHost + ?Sized,
    {
        let image = self.render_widget(engine, store, id)?;
        host.show(id, &image)?;
        log::info!("Widget {id} updated ({}x{})", image.width(), image.height());
        Ok(())
    }

    /// Update callback: refresh every widget in `ids`.
    pub fn on_update<S, H>(
        &self,
        engine: &mut TextEngine,
        store: &S,
        host: &mut H,
        ids: &[WidgetId],
    ) -> UpdateReport
    where
        S: PreferenceStore + ?Sized,
        H: WidgetHost + ?Sized,
    {
        let mut report = UpdateReport::default();
        for &id in ids {
            match self.update_widget(engine, store, host, id) {
                Ok(()) => report.updated.push(id),
                Err(e) => {
                    log::warn!("Widget {id} not updated, keeping previous image: {e}");
                    report.failed.push((id, e));
                }
            }
        }
        report
    }

    /// Delete callback: drop the stored settings of every widget in `ids`.
    pub fn on_deleted<S: PreferenceStore + ?Sized>(
        &self,
        store: &mut S,
        ids: &[WidgetId],
    ) -> Result<(), PrefsError> {
        let edit = ids
            .iter()
            .fold(PrefsEdit::new(), |edit, &id| edit.merge(WidgetSettings::removal(id)));
        store.apply(edit)?;
        log::info!("Removed settings of {} widget(s)", ids.len());
        Ok(())
    }
}
