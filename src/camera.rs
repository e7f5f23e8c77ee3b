//! Single-frame webcam capture.
//!
//! A [`CaptureBackend`] opens a device and hands back a [`FrameStream`].
//! [`CameraSession`] owns the stream and releases it when dropped, so the
//! device is closed on every path out of [`capture_single_frame`].

use crate::buffer::PixelBuffer;
use crate::error::Result;

/// Something that can open a capture device.
pub trait CaptureBackend {
    /// Human-readable device name for logs and messages.
    fn describe(&self) -> String;
    fn open(&self) -> Result<Box<dyn FrameStream>>;
}

/// An opened capture device.
pub trait FrameStream {
    fn read_frame(&mut self) -> Result<PixelBuffer>;
    /// Close the device. Must be safe to call more than once.
    fn release(&mut self);
}

/// Scoped ownership of an opened device.
pub struct CameraSession {
    stream: Box<dyn FrameStream>,
}

impl CameraSession {
    pub fn open(backend: &dyn CaptureBackend) -> Result<Self> {
        let stream = backend.open()?;
        Ok(Self { stream })
    }

    pub fn read_frame(&mut self) -> Result<PixelBuffer> {
        self.stream.read_frame()
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.stream.release();
    }
}

/// Open the device, read exactly one frame, release the device.
pub fn capture_single_frame(backend: &dyn CaptureBackend) -> Result<PixelBuffer> {
    let mut session = CameraSession::open(backend)?;
    session.read_frame()
}

/// The platform's default camera at `index`.
pub fn default_backend(index: usize) -> Box<dyn CaptureBackend> {
    #[cfg(target_os = "linux")]
    {
        Box::new(v4l2::V4l2Camera::new(index))
    }
    #[cfg(not(target_os = "linux"))]
    {
        Box::new(Unsupported { index })
    }
}

#[cfg(not(target_os = "linux"))]
struct Unsupported {
    index: usize,
}

#[cfg(not(target_os = "linux"))]
impl CaptureBackend for Unsupported {
    fn describe(&self) -> String {
        format!("camera {}", self.index)
    }

    fn open(&self) -> Result<Box<dyn FrameStream>> {
        Err(crate::error::AppError::Device(
            "no capture backend on this platform".to_string(),
        ))
    }
}

/// Packed YUYV (4:2:2) to BGR using the BT.601 integer approximation.
///
/// `stride` is the driver's bytes-per-line; rows may carry padding past
/// `width * 2` bytes. A stride below that (0 from drivers that leave it
/// unset) means tightly packed rows. Returns `None` when `data` is too short
/// for the frame size.
pub fn yuyv_to_bgr(data: &[u8], width: u32, height: u32, stride: usize) -> Option<PixelBuffer> {
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 {
        return None;
    }
    let row_bytes = w * 2;
    let step = stride.max(row_bytes);
    // The last row needs no padding after it.
    if data.len() < step * (h - 1) + row_bytes {
        return None;
    }

    #[inline]
    fn convert(y: u8, u: u8, v: u8) -> [u8; 3] {
        let c = y as i32 - 16;
        let d = u as i32 - 128;
        let e = v as i32 - 128;
        let r = (298 * c + 409 * e + 128) >> 8;
        let g = (298 * c - 100 * d - 208 * e + 128) >> 8;
        let b = (298 * c + 516 * d + 128) >> 8;
        [
            b.clamp(0, 255) as u8,
            g.clamp(0, 255) as u8,
            r.clamp(0, 255) as u8,
        ]
    }

    let mut out = Vec::with_capacity(w * h * 3);
    for line in 0..h {
        let row = &data[line * step..line * step + row_bytes];
        for x in 0..w {
            // Two pixels share one U/V pair: Y0 U Y1 V
            let pair = (x / 2) * 4;
            let y = row[x * 2];
            let u = row[pair + 1];
            let v = row.get(pair + 3).copied().unwrap_or(128);
            out.extend_from_slice(&convert(y, u, v));
        }
    }
    PixelBuffer::from_raw(width, height, out)
}

#[cfg(target_os = "linux")]
mod v4l2 {
    //! Video4Linux2 backend.

    use v4l::buffer::Type;
    use v4l::format::FourCC;
    use v4l::io::traits::CaptureStream;
    use v4l::prelude::*;
    use v4l::video::Capture;

    use super::{CaptureBackend, FrameStream, yuyv_to_bgr};
    use crate::buffer::PixelBuffer;
    use crate::error::{AppError, Result};

    pub struct V4l2Camera {
        index: usize,
    }

    impl V4l2Camera {
        pub fn new(index: usize) -> Self {
            Self { index }
        }
    }

    impl CaptureBackend for V4l2Camera {
        fn describe(&self) -> String {
            format!("/dev/video{}", self.index)
        }

        fn open(&self) -> Result<Box<dyn FrameStream>> {
            let device = Device::new(self.index).map_err(|e| {
                AppError::Device(format!("failed to open {}: {}", self.describe(), e))
            })?;

            let mut fmt = device
                .format()
                .map_err(|e| AppError::Device(format!("failed to get format: {}", e)))?;
            fmt.fourcc = FourCC::new(b"YUYV");
            let fmt = device
                .set_format(&fmt)
                .map_err(|e| AppError::Device(format!("failed to set format: {}", e)))?;
            if fmt.fourcc != FourCC::new(b"YUYV") {
                return Err(AppError::Device(format!(
                    "device does not offer YUYV frames (got {})",
                    fmt.fourcc
                )));
            }

            Ok(Box::new(V4l2Stream {
                device: Some(device),
                width: fmt.width,
                height: fmt.height,
                stride: fmt.stride as usize,
            }))
        }
    }

    struct V4l2Stream {
        device: Option<Device>,
        width: u32,
        height: u32,
        stride: usize,
    }

    impl FrameStream for V4l2Stream {
        fn read_frame(&mut self) -> Result<PixelBuffer> {
            let device = self
                .device
                .as_ref()
                .ok_or_else(|| AppError::Device("device already released".to_string()))?;

            let mut stream = MmapStream::with_buffers(device, Type::VideoCapture, 4)
                .map_err(|e| AppError::Device(format!("failed to create stream: {}", e)))?;
            let (data, _meta) = stream
                .next()
                .map_err(|e| AppError::Device(format!("failed to grab frame: {}", e)))?;

            yuyv_to_bgr(data, self.width, self.height, self.stride)
                .ok_or_else(|| AppError::Device("camera returned a short frame".to_string()))
        }

        fn release(&mut self) {
            // Dropping the device closes its file descriptor.
            self.device.take();
        }
    }
}
