// ============================================================================
// DISPLAY CONTROLLER - owns the live image and every mutation of it
// ============================================================================
//
// Each successful operation builds a complete new buffer and swaps it in;
// a failed one returns before touching `self.buffer`. The generation counter
// tells the canvas when its cached texture is stale, which is how a
// successful operation triggers a redraw.

use std::path::Path;

use crate::buffer::{Channel, PixelBuffer};
use crate::camera::{self, CaptureBackend};
use crate::error::{AppError, Result, ValidationError};
use crate::io;
use crate::ops::{channel, filters, shapes};
use crate::{log_info, log_warn};

pub struct DisplayController {
    buffer: Option<PixelBuffer>,
    status: String,
    generation: u64,
    camera: Box<dyn CaptureBackend>,
}

impl DisplayController {
    pub fn new(camera: Box<dyn CaptureBackend>) -> Self {
        Self {
            buffer: None,
            status: t!("status.ready"),
            generation: 0,
            camera,
        }
    }

    pub fn buffer(&self) -> Option<&PixelBuffer> {
        self.buffer.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.buffer.is_some()
    }

    /// Text for the status bar: the last completed action.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Bumped every time the buffer is replaced.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn require_image(&self) -> Result<&PixelBuffer> {
        self.buffer.as_ref().ok_or(AppError::Validation(ValidationError::NoImage))
    }

    fn replace(&mut self, buffer: PixelBuffer, status: String) {
        log_info!("{} ({}x{})", status, buffer.width(), buffer.height());
        self.buffer = Some(buffer);
        self.status = status;
        self.generation += 1;
    }

    /// Decode `path` and make it the live image.
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        let buffer = io::load_image(path).inspect_err(|e| log_warn!("Open failed: {}", e))?;
        self.replace(buffer, t!("status.loaded", path = path.display()));
        Ok(())
    }

    /// Grab one frame from the configured camera and make it the live image.
    /// The device is released before this returns, whatever the outcome.
    pub fn load_from_camera(&mut self) -> Result<()> {
        log_info!("Capturing from {}", self.camera.describe());
        let buffer = camera::capture_single_frame(self.camera.as_ref())
            .inspect_err(|e| log_warn!("Capture failed: {}", e))?;
        self.replace(buffer, t!("status.camera"));
        Ok(())
    }

    /// Zero every channel except the one named by `name` (R, G or B).
    pub fn extract_channel(&mut self, name: &str) -> Result<()> {
        let src = self.require_image()?;
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyChannel.into());
        }
        let ch = Channel::from_letter(trimmed)
            .ok_or_else(|| ValidationError::UnknownChannel(trimmed.to_string()))?;
        let out = channel::extract_channel(src, ch);
        self.replace(out, t!("status.channel", channel = ch.letter()));
        Ok(())
    }

    /// Average over a `k`×`k` window. `k` must be present, at least 1 and odd.
    pub fn box_blur(&mut self, kernel_size: Option<i32>) -> Result<()> {
        let src = self.require_image()?;
        let k = validate_kernel_size(kernel_size)?;
        let out = filters::box_blur(src, k);
        self.replace(out, t!("status.blur", k = k));
        Ok(())
    }

    pub fn sharpen(&mut self) -> Result<()> {
        let src = self.require_image()?;
        let out = filters::sharpen(src);
        self.replace(out, t!("status.sharpen"));
        Ok(())
    }

    /// Outline the rectangle between two corners. Any missing coordinate
    /// (a cancelled prompt) makes this a no-op that returns `Ok(false)`.
    pub fn draw_rectangle(&mut self, coords: [Option<i32>; 4]) -> Result<bool> {
        let src = self.require_image()?;
        let [Some(x1), Some(y1), Some(x2), Some(y2)] = coords else {
            return Ok(false);
        };
        let mut copy = src.clone();
        shapes::draw_rectangle(
            &mut copy,
            (x1, y1),
            (x2, y2),
            shapes::RECT_COLOR,
            shapes::RECT_THICKNESS,
        );
        self.replace(copy, t!("status.rectangle", x1 = x1, y1 = y1, x2 = x2, y2 = y2));
        Ok(true)
    }
}

/// Kernel sizes come from a prompt that may have been cancelled.
pub fn validate_kernel_size(kernel_size: Option<i32>) -> Result<u32> {
    let k = kernel_size.ok_or(ValidationError::MissingKernelSize)?;
    if k < 1 {
        return Err(ValidationError::KernelTooSmall(k).into());
    }
    if k % 2 == 0 {
        return Err(ValidationError::EvenKernelSize(k).into());
    }
    Ok(k as u32)
}
