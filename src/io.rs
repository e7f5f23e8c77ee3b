use rfd::FileDialog;
use std::path::{Path, PathBuf};

use crate::buffer::PixelBuffer;
use crate::error::{AppError, Result};

/// Extensions offered by the Open dialog's first filter.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Decode an image file into a three-channel buffer.
/// Alpha is dropped; greyscale and palette images are expanded to three channels.
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    if path.as_os_str().is_empty() {
        return Err(AppError::Decode("no file selected".to_string()));
    }
    let img = image::open(path)
        .map_err(|e| AppError::Decode(format!("{}: {}", path.display(), e)))?;
    let rgb = img.into_rgb8();
    PixelBuffer::from_rgb_image(&rgb)
        .ok_or_else(|| AppError::Decode(format!("{}: image has no pixels", path.display())))
}

/// Native file chooser.
#[derive(Default)]
pub struct FileHandler {
    /// Directory of the last chosen file; the next dialog starts there.
    pub last_dir: Option<PathBuf>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the native Open dialog. `None` means the user cancelled.
    pub fn pick_file_path(&mut self) -> Option<PathBuf> {
        let mut dialog = FileDialog::new()
            .add_filter("PNG/JPG", IMAGE_EXTENSIONS)
            .add_filter(t!("file_dialog.all_files"), &["*"]);
        if let Some(dir) = &self.last_dir {
            dialog = dialog.set_directory(dir);
        }
        let path = dialog.pick_file()?;
        self.last_dir = path.parent().map(Path::to_path_buf);
        Some(path)
    }
}
