//! Settings editor — one screen that configures a front/back widget pair.
//!
//! Saving renders the text first. Only if that image can be produced and
//! shown on both widgets are the settings written, for both ids, in a
//! single batch. Otherwise an inline message is returned and nothing is
//! persisted.

use thiserror::Error;

use textcover_core::{
    PreferenceStore, PrefsError, RotationPosition, WidgetId, WidgetSettings,
};
use textcover_text::{render, RenderConfig, RenderError, TextEngine};

use crate::host::{HostError, WidgetHost};

/// Inline message shown when the text cannot be turned into an image.
pub const SAVE_ERROR_MESSAGE: &str = "Unable to create an image from this text. Try a shorter text.";
/// Inline message shown when the settings cannot be written.
pub const PERSIST_ERROR_MESSAGE: &str = "Unable to save the settings. Please try again.";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Rotation position {0} is outside 0..=7")]
    InvalidRotation(i32),
    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),
    #[error("Widget display failed: {0}")]
    Display(#[from] HostError),
    #[error("Saving settings failed: {0}")]
    Persist(#[from] PrefsError),
}

impl SettingsError {
    /// User-facing text for the editor's error line.
    pub fn inline_message(&self) -> &'static str {
        match self {
            SettingsError::Persist(_) => PERSIST_ERROR_MESSAGE,
            _ => SAVE_ERROR_MESSAGE,
        }
    }
}

/// Editor bound to a front-screen and a back-screen widget sharing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsEditor {
    front: WidgetId,
    back: WidgetId,
}

impl SettingsEditor {
    pub fn new(front: WidgetId, back: WidgetId) -> Self {
        Self { front, back }
    }

    /// Build from launch ids: `[front, back]`. Missing ids are [`WidgetId::INVALID`].
    pub fn from_launch_ids(ids: &[i32]) -> Self {
        let id = |i: usize| ids.get(i).copied().map(WidgetId).unwrap_or(WidgetId::INVALID);
        Self::new(id(0), id(1))
    }

    pub fn front(&self) -> WidgetId {
        self.front
    }

    pub fn back(&self) -> WidgetId {
        self.back
    }

    /// Initial form contents, read from the back widget.
    pub fn open<S: PreferenceStore + ?Sized>(&self, store: &S, default_text: &str) -> WidgetSettings {
        WidgetSettings::load(store, self.back, default_text)
    }

    /// Validate `form` by rendering it, show it on both widgets, then persist it for both.
    pub fn save<S, H>(
        &self,
        engine: &mut TextEngine,
        store: &mut S,
        host: &mut H,
        form: &WidgetSettings,
        text_size: f32,
    ) -> Result<(), SettingsError>
    where
        S: PreferenceStore + ?Sized,
        H: WidgetHost + ?Sized,
    {
        let position = RotationPosition::new(form.rotation_position)
            .ok_or(SettingsError::InvalidRotation(form.rotation_position))?;

        let config = RenderConfig::new(text_size, position.degrees(), form.center_text);
        let image = render(engine, &form.text, &config)?;

        host.show(self.front, &image)?;
        host.show(self.back, &image)?;

        store.apply(form.edit_for(self.front).merge(form.edit_for(self.back)))?;

        log::info!(
            "Settings saved for widgets {} and {} ({}, centered: {})",
            self.front,
            self.back,
            position,
            form.center_text,
        );
        Ok(())
    }
}
