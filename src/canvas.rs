use eframe::egui;
use egui::{Color32, ColorImage, Pos2, Rect, TextureHandle, TextureOptions, Vec2};
use image::RgbImage;
use image::imageops::{self, FilterType};

use crate::buffer::PixelBuffer;
use crate::controller::DisplayController;

/// Size of the image after fitting it into a `view_w`×`view_h` viewport.
///
/// Thumbnail semantics: the aspect ratio is kept and the image is only ever
/// shrunk, never enlarged. A degenerate viewport (1 px or less on an axis,
/// e.g. before the first layout) leaves the size unchanged.
pub fn fit_size(img_w: u32, img_h: u32, view_w: u32, view_h: u32) -> (u32, u32) {
    if view_w <= 1 || view_h <= 1 || img_w == 0 || img_h == 0 {
        return (img_w, img_h);
    }
    let scale = (view_w as f64 / img_w as f64)
        .min(view_h as f64 / img_h as f64)
        .min(1.0);
    let w = ((img_w as f64 * scale).round() as u32).clamp(1, img_w);
    let h = ((img_h as f64 * scale).round() as u32).clamp(1, img_h);
    (w, h)
}

/// Convert to display order and scale to fit the viewport.
pub fn display_image(buffer: &PixelBuffer, viewport: (u32, u32)) -> RgbImage {
    let rgb = buffer.to_rgb_image();
    let (w, h) = fit_size(rgb.width(), rgb.height(), viewport.0, viewport.1);
    if (w, h) == rgb.dimensions() {
        rgb
    } else {
        imageops::resize(&rgb, w, h, FilterType::Lanczos3)
    }
}

/// Draws the controller's buffer centred in the available area.
///
/// The scaled texture is rebuilt only when the buffer changes (new
/// generation) or the viewport is resized; every frame repaints the whole
/// area.
pub struct Canvas {
    pub background: Color32,
    texture: Option<TextureHandle>,
    cached_generation: Option<u64>,
    cached_viewport: (u32, u32),
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            background: Color32::DARK_GRAY,
            texture: None,
            cached_generation: None,
            cached_viewport: (0, 0),
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, controller: &DisplayController) {
        let canvas_rect = ui.max_rect();
        ui.painter().rect_filled(canvas_rect, 0.0, self.background);

        let Some(buffer) = controller.buffer() else {
            return;
        };

        // Work in physical pixels so the image is not resampled twice.
        let ppp = ui.ctx().pixels_per_point();
        let viewport = (
            (canvas_rect.width() * ppp).max(0.0) as u32,
            (canvas_rect.height() * ppp).max(0.0) as u32,
        );

        if self.cached_generation != Some(controller.generation())
            || self.cached_viewport != viewport
            || self.texture.is_none()
        {
            let img = display_image(buffer, viewport);
            let size = [img.width() as usize, img.height() as usize];
            let color_image = ColorImage::from_rgb(size, img.as_raw());
            if let Some(ref mut tex) = self.texture {
                tex.set(color_image, TextureOptions::LINEAR);
            } else {
                self.texture = Some(ui.ctx().load_texture(
                    "canvas_image",
                    color_image,
                    TextureOptions::LINEAR,
                ));
            }
            self.cached_generation = Some(controller.generation());
            self.cached_viewport = viewport;
        }

        if let Some(tex) = &self.texture {
            let [tw, th] = tex.size();
            let size = Vec2::new(tw as f32 / ppp, th as f32 / ppp);
            let temp_rect = Rect::from_center_size(canvas_rect.center(), size);
            // Round to pixel boundaries to prevent sub-pixel blurring
            let image_rect = Rect::from_min_size(
                Pos2::new(temp_rect.min.x.round(), temp_rect.min.y.round()),
                size,
            );
            let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
            ui.painter().image(tex.id(), image_rect, uv, Color32::WHITE);
        }
    }
}
