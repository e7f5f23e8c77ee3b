//! End-to-end checks of the display controller through the public API:
//! real image files on disk and a scripted capture device.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use image::{Rgb, RgbImage};
use tempfile::{TempDir, tempdir};

use photobench::buffer::{Channel, PixelBuffer};
use photobench::camera::{CaptureBackend, FrameStream};
use photobench::controller::DisplayController;
use photobench::error::{AppError, Result, ValidationError};
use photobench::i18n;
use photobench::ops::shapes::RECT_COLOR;

// ----------------------------------------------------------------------------
// Fixtures
// ----------------------------------------------------------------------------

#[derive(Default)]
struct DeviceLog {
    opened: Cell<u32>,
    released: Cell<u32>,
}

struct ScriptedCamera {
    log: Rc<DeviceLog>,
    frame: Option<PixelBuffer>,
    available: bool,
}

struct ScriptedStream {
    log: Rc<DeviceLog>,
    frame: Option<PixelBuffer>,
}

impl CaptureBackend for ScriptedCamera {
    fn describe(&self) -> String {
        "scripted camera".into()
    }

    fn open(&self) -> Result<Box<dyn FrameStream>> {
        if !self.available {
            return Err(AppError::Device("device busy".into()));
        }
        self.log.opened.set(self.log.opened.get() + 1);
        Ok(Box::new(ScriptedStream {
            log: self.log.clone(),
            frame: self.frame.clone(),
        }))
    }
}

impl FrameStream for ScriptedStream {
    fn read_frame(&mut self) -> Result<PixelBuffer> {
        self.frame
            .clone()
            .ok_or_else(|| AppError::Device("no frame".into()))
    }

    fn release(&mut self) {
        self.log.released.set(self.log.released.get() + 1);
    }
}

fn controller_with_camera(frame: Option<PixelBuffer>, available: bool) -> (DisplayController, Rc<DeviceLog>) {
    i18n::init();
    let log = Rc::new(DeviceLog::default());
    let camera = ScriptedCamera {
        log: log.clone(),
        frame,
        available,
    };
    (DisplayController::new(Box::new(camera)), log)
}

fn controller() -> DisplayController {
    controller_with_camera(None, false).0
}

/// Write a solid-colour PNG into `dir`. Colour is given in RGB.
fn solid_png(dir: &TempDir, name: &str, w: u32, h: u32, rgb: [u8; 3]) -> PathBuf {
    let path = dir.path().join(format!("{name}.png"));
    RgbImage::from_pixel(w, h, Rgb(rgb)).save(&path).unwrap();
    path
}

fn is_no_image<T: std::fmt::Debug>(r: &Result<T>) -> bool {
    matches!(r, Err(AppError::Validation(ValidationError::NoImage)))
}

// ----------------------------------------------------------------------------
// Scenarios
// ----------------------------------------------------------------------------

#[test]
fn green_of_a_red_image_is_black() {
    let dir = tempdir().unwrap();
    let path = solid_png(&dir, "red", 100, 50, [255, 0, 0]);
    let mut c = controller();
    c.load_from_file(&path).unwrap();
    assert!(c.status().contains("red"));

    c.extract_channel("G").unwrap();
    let buf = c.buffer().unwrap();
    assert_eq!(buf.dimensions(), (100, 50));
    assert!(buf.as_raw().iter().all(|&v| v == 0));
}

#[test]
fn blur_keeps_a_uniform_image() {
    let dir = tempdir().unwrap();
    let path = solid_png(&dir, "grey200", 10, 10, [200, 200, 200]);
    let mut c = controller();
    c.load_from_file(&path).unwrap();

    c.box_blur(Some(3)).unwrap();
    let buf = c.buffer().unwrap();
    assert!(buf.pixels().all(|p| p == [200, 200, 200]));

    for k in [1, 5, 9, 15] {
        c.box_blur(Some(k)).unwrap();
    }
    assert!(c.buffer().unwrap().pixels().all(|p| p == [200, 200, 200]));
}

#[test]
fn rectangle_on_black_image() {
    let dir = tempdir().unwrap();
    let path = solid_png(&dir, "black", 10, 10, [0, 0, 0]);
    let mut c = controller();
    c.load_from_file(&path).unwrap();

    assert!(c.draw_rectangle([Some(1), Some(1), Some(5), Some(5)]).unwrap());
    let buf = c.buffer().unwrap();
    for y in 0..10 {
        for x in 0..10 {
            let on_band = (1..=5).contains(&x) && (1..=5).contains(&y) && !(x == 3 && y == 3);
            let expected = if on_band { RECT_COLOR } else { [0, 0, 0] };
            assert_eq!(buf.get_pixel(x, y), expected, "pixel ({x}, {y})");
        }
    }
}

// ----------------------------------------------------------------------------
// Properties
// ----------------------------------------------------------------------------

#[test]
fn channel_extraction_is_exact_and_idempotent() {
    let dir = tempdir().unwrap();
    let path = solid_png(&dir, "mixed", 7, 5, [10, 120, 250]);
    let mut c = controller();
    c.load_from_file(&path).unwrap();
    let source = c.buffer().unwrap().clone();

    c.extract_channel("r").unwrap();
    let once = c.buffer().unwrap().clone();
    c.extract_channel("R").unwrap();
    assert_eq!(c.buffer().unwrap(), &once);

    let red = Channel::Red.index();
    for (out, src) in once.pixels().zip(source.pixels()) {
        for ch in 0..3 {
            let expected = if ch == red { src[ch] } else { 0 };
            assert_eq!(out[ch], expected);
        }
    }
}

#[test]
fn sharpen_stays_in_range_at_both_extremes() {
    for (name, value) in [("zeros", 0u8), ("full", 255u8)] {
        let dir = tempdir().unwrap();
        let path = solid_png(&dir, name, 6, 6, [value; 3]);
        let mut c = controller();
        c.load_from_file(&path).unwrap();
        c.sharpen().unwrap();
        assert!(c.buffer().unwrap().pixels().all(|p| p == [value; 3]));
    }
}

#[test]
fn cancelled_rectangle_changes_nothing() {
    let dir = tempdir().unwrap();
    let path = solid_png(&dir, "cancel", 8, 8, [30, 60, 90]);
    let mut c = controller();
    c.load_from_file(&path).unwrap();
    let before = c.buffer().unwrap().clone();
    let status = c.status().to_string();

    assert!(!c.draw_rectangle([Some(0), None, None, None]).unwrap());
    assert!(!c.draw_rectangle([None; 4]).unwrap());
    assert_eq!(c.buffer().unwrap(), &before);
    assert_eq!(c.status(), status);
}

#[test]
fn every_transform_needs_an_image() {
    let mut c = controller();
    assert!(is_no_image(&c.extract_channel("G")));
    assert!(is_no_image(&c.box_blur(Some(3))));
    assert!(is_no_image(&c.box_blur(None)));
    assert!(is_no_image(&c.sharpen()));
    assert!(is_no_image(&c.draw_rectangle([None; 4])));
    assert!(c.buffer().is_none());
    assert!(is_no_image(&c.sharpen()));
}

#[test]
fn invalid_kernel_leaves_image_intact() {
    let dir = tempdir().unwrap();
    let path = solid_png(&dir, "kernel", 5, 5, [1, 2, 3]);
    let mut c = controller();
    c.load_from_file(&path).unwrap();
    let before = c.buffer().unwrap().clone();
    let generation = c.generation();

    for bad in [None, Some(0), Some(-1), Some(2), Some(8)] {
        let err = c.box_blur(bad).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(!err.is_warning());
    }
    assert_eq!(c.buffer().unwrap(), &before);
    assert_eq!(c.generation(), generation);
}

#[test]
fn undecodable_file_keeps_previous_image() {
    let dir = tempdir().unwrap();
    let good = solid_png(&dir, "good", 4, 4, [9, 9, 9]);
    let bad = dir.path().join("bad.jpg");
    std::fs::write(&bad, b"\x00\x01 not an image").unwrap();

    let mut c = controller();
    c.load_from_file(&good).unwrap();
    let before = c.buffer().unwrap().clone();

    assert!(matches!(c.load_from_file(&bad), Err(AppError::Decode(_))));
    assert_eq!(c.buffer().unwrap(), &before);
}

// ----------------------------------------------------------------------------
// Camera
// ----------------------------------------------------------------------------

#[test]
fn snapshot_replaces_buffer_and_releases_device() {
    let frame = PixelBuffer::new_filled(16, 12, [5, 6, 7]);
    let (mut c, log) = controller_with_camera(Some(frame.clone()), true);

    c.load_from_camera().unwrap();
    assert_eq!(c.buffer(), Some(&frame));
    assert_eq!(log.opened.get(), 1);
    assert_eq!(log.released.get(), 1);

    c.load_from_camera().unwrap();
    assert_eq!(log.opened.get(), 2);
    assert_eq!(log.released.get(), 2);
}

#[test]
fn failed_read_still_releases_device() {
    let (mut c, log) = controller_with_camera(None, true);
    assert!(matches!(c.load_from_camera(), Err(AppError::Device(_))));
    assert_eq!(log.opened.get(), 1);
    assert_eq!(log.released.get(), 1);
    assert!(c.buffer().is_none());
}

#[test]
fn unavailable_camera_is_a_device_error() {
    let (mut c, log) = controller_with_camera(Some(PixelBuffer::new(2, 2)), false);
    let err = c.load_from_camera().unwrap_err();
    assert!(matches!(err, AppError::Device(_)));
    assert!(!err.user_message().is_empty());
    assert_eq!(log.opened.get(), 0);
    assert!(c.buffer().is_none());
}

#[test]
fn each_success_bumps_generation() {
    let (mut c, _) = controller_with_camera(Some(PixelBuffer::new(4, 4)), true);
    assert_eq!(c.generation(), 0);
    c.load_from_camera().unwrap();
    c.sharpen().unwrap();
    c.box_blur(Some(3)).unwrap();
    c.extract_channel("b").unwrap();
    c.draw_rectangle([Some(0), Some(0), Some(3), Some(3)]).unwrap();
    assert_eq!(c.generation(), 5);
}
