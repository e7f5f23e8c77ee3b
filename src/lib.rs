//! PhotoBench: load a picture or a webcam snapshot and apply simple
//! pixel operations (channel isolation, box blur, sharpen, rectangle overlay).
//!
//! The binary is a thin egui shell around [`controller::DisplayController`],
//! which owns the image and every mutation of it.

#[macro_use]
pub mod i18n;
pub mod logger;

pub mod app;
pub mod buffer;
pub mod camera;
pub mod canvas;
pub mod cli;
pub mod components;
pub mod controller;
pub mod error;
pub mod io;
pub mod ops;
