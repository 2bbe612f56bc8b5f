//! Widget hosts — where rendered images end up.
//!
//! A host only ever receives complete images. If showing an image fails,
//! the host keeps whatever it displayed before.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use textcover_core::WidgetId;
use textcover_text::{RasterError, RasterImage};

#[derive(Error, Debug)]
pub enum HostError {
    #[error("Cannot encode image: {0}")]
    Raster(#[from] RasterError),
    #[error("Cannot write widget image: {0}")]
    Io(#[from] std::io::Error),
}

/// Displays widget images.
pub trait WidgetHost {
    fn show(&mut self, id: WidgetId, image: &RasterImage) -> Result<(), HostError>;
}

/// Writes each widget's image to `<dir>/widget_<id>.png`.
#[derive(Debug, Clone)]
pub struct PngDirHost {
    dir: PathBuf,
}

impl PngDirHost {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn image_path(&self, id: WidgetId) -> PathBuf {
        self.dir.join(format!("widget_{id}.png"))
    }
}

impl WidgetHost for PngDirHost {
    fn show(&mut self, id: WidgetId, image: &RasterImage) -> Result<(), HostError> {
        // Encode first so a bad image never touches the existing file.
        let png = image.to_png()?;
        fs::create_dir_all(&self.dir)?;

        let path = self.image_path(id);
        let tmp = path.with_extension("png.tmp");
        if let Err(e) = fs::write(&tmp, png).and_then(|()| fs::rename(&tmp, &path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        log::debug!("Wrote {}x{} image to {}", image.width(), image.height(), path.display());
        Ok(())
    }
}

/// Keeps the latest image per widget in memory.
#[derive(Debug, Default)]
pub struct MemoryHost {
    images: HashMap<WidgetId, RasterImage>,
    shown: usize,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self, id: WidgetId) -> Option<&RasterImage> {
        self.images.get(&id)
    }

    /// Total number of successful `show` calls.
    pub fn shown(&self) -> usize {
        self.shown
    }
}

impl WidgetHost for MemoryHost {
    fn show(&mut self, id: WidgetId, image: &RasterImage) -> Result<(), HostError> {
        self.images.insert(id, image.clone());
        self.shown += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_png_host_writes_file() {
        let dir = tempdir().unwrap();
        let mut host = PngDirHost::new(dir.path().join("out"));
        host.show(WidgetId(3), &RasterImage::new(4, 4)).unwrap();
        let path = host.image_path(WidgetId(3));
        assert!(path.ends_with("widget_3.png"));
        assert!(path.exists());
        assert!(!path.with_extension("png.tmp").exists());
    }

    #[test]
    fn test_png_host_keeps_previous_on_empty_image() {
        let dir = tempdir().unwrap();
        let mut host = PngDirHost::new(dir.path());
        host.show(WidgetId(1), &RasterImage::new(2, 2)).unwrap();
        let before = fs::read(host.image_path(WidgetId(1))).unwrap();

        let err = host.show(WidgetId(1), &RasterImage::new(0, 220)).unwrap_err();
        assert!(matches!(err, HostError::Raster(_)));
        assert_eq!(fs::read(host.image_path(WidgetId(1))).unwrap(), before);
    }

    #[test]
    fn test_png_host_failed_rename_removes_tmp() {
        let dir = tempdir().unwrap();
        let mut host = PngDirHost::new(dir.path());
        // A directory in place of the image file makes the rename fail.
        fs::create_dir(host.image_path(WidgetId(4))).unwrap();

        let err = host.show(WidgetId(4), &RasterImage::new(2, 2)).unwrap_err();
        assert!(matches!(err, HostError::Io(_)));
        assert!(!host.image_path(WidgetId(4)).with_extension("png.tmp").exists());
        assert!(host.image_path(WidgetId(4)).is_dir());
    }

    #[test]
    fn test_memory_host_tracks_latest() {
        let mut host = MemoryHost::new();
        host.show(WidgetId(1), &RasterImage::new(1, 1)).unwrap();
        host.show(WidgetId(1), &RasterImage::new(2, 2)).unwrap();
        assert_eq!(host.image(WidgetId(1)).unwrap().width(), 2);
        assert!(host.image(WidgetId(2)).is_none());
        assert_eq!(host.shown(), 2);
    }
}
