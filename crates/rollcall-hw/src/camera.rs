//! V4L2 photo capture via the `v4l` crate.

use crate::frame;
use rollcall_core::capability::{CaptureError, PhotoSource};
use rollcall_core::types::InlineImage;
use std::path::Path;
use thiserror::Error;
use v4l::buffer::Type as BufType;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::FourCC;

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("device not found: {0}")]
    DeviceNotFound(String),
    #[error("capture failed: {0}")]
    CaptureFailed(String),
    #[error("device busy")]
    DeviceBusy,
    #[error("format negotiation failed: {0}")]
    FormatNegotiationFailed(String),
    #[error("streaming not supported")]
    StreamingNotSupported,
    #[error("frame conversion failed: {0}")]
    Frame(#[from] frame::FrameError),
}

/// Info about a discovered V4L2 device.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub path: String,
    pub name: String,
    pub driver: String,
    pub bus: String,
}

/// Negotiated pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Motion-JPEG: each dequeued buffer is already a JPEG image.
    Mjpg,
    /// YUYV 4:2:2 packed; converted to RGB and JPEG-encoded on capture.
    Yuyv,
}

/// V4L2 camera device handle producing single JPEG photos.
pub struct Camera {
    device: Device,
    pub width: u32,
    pub height: u32,
    pub device_path: String,
    pub fourcc: FourCC,
    pixel_format: PixelFormat,
    jpeg_quality: u8,
}

impl Camera {
    /// Open a V4L2 camera device by path (e.g., "/dev/video0").
    ///
    /// Prefers MJPG at 1280x720 (JPEG passthrough on capture); accepts
    /// YUYV as the fallback the driver commonly negotiates instead.
    pub fn open(device_path: &str, jpeg_quality: u8) -> Result<Self, CameraError> {
        if !Path::new(device_path).exists() {
            return Err(CameraError::DeviceNotFound(device_path.to_string()));
        }

        let device = Device::with_path(device_path).map_err(|e| {
            if e.to_string().contains("busy") || e.to_string().contains("EBUSY") {
                CameraError::DeviceBusy
            } else {
                CameraError::DeviceNotFound(format!("{device_path}: {e}"))
            }
        })?;

        let caps = device.query_caps().map_err(|e| {
            CameraError::CaptureFailed(format!("failed to query capabilities: {e}"))
        })?;

        tracing::info!(
            device = device_path,
            driver = %caps.driver,
            card = %caps.card,
            "opened camera"
        );

        if !caps.capabilities.contains(v4l::capability::Flags::VIDEO_CAPTURE) {
            return Err(CameraError::StreamingNotSupported);
        }

        let mut fmt = device.format().map_err(|e| {
            CameraError::FormatNegotiationFailed(format!("failed to get format: {e}"))
        })?;

        fmt.fourcc = FourCC::new(b"MJPG");
        fmt.width = 1280;
        fmt.height = 720;

        let negotiated = device.set_format(&fmt).map_err(|e| {
            CameraError::FormatNegotiationFailed(format!("failed to set format: {e}"))
        })?;

        let fourcc = negotiated.fourcc;
        let pixel_format = if fourcc == FourCC::new(b"MJPG") {
            PixelFormat::Mjpg
        } else if fourcc == FourCC::new(b"YUYV") {
            PixelFormat::Yuyv
        } else {
            return Err(CameraError::FormatNegotiationFailed(format!(
                "unsupported pixel format: {fourcc:?} (need MJPG or YUYV)"
            )));
        };

        tracing::info!(
            width = negotiated.width,
            height = negotiated.height,
            fourcc = ?fourcc,
            "negotiated format"
        );

        Ok(Self {
            device,
            width: negotiated.width,
            height: negotiated.height,
            device_path: device_path.to_string(),
            fourcc,
            pixel_format,
            jpeg_quality,
        })
    }

    /// Capture a single photo as JPEG bytes.
    pub fn capture_jpeg(&self) -> Result<Vec<u8>, CameraError> {
        let mut stream =
            MmapStream::with_buffers(&self.device, BufType::VideoCapture, 4).map_err(|e| {
                CameraError::CaptureFailed(format!("failed to create mmap stream: {e}"))
            })?;

        let (buf, meta) = stream
            .next()
            .map_err(|e| CameraError::CaptureFailed(format!("failed to dequeue buffer: {e}")))?;

        let used = meta.bytesused as usize;
        let bytes = if used > 0 && used <= buf.len() {
            &buf[..used]
        } else {
            buf
        };

        tracing::debug!(
            seq = meta.sequence,
            len = bytes.len(),
            format = ?self.pixel_format,
            "captured frame"
        );

        match self.pixel_format {
            PixelFormat::Mjpg => Ok(bytes.to_vec()),
            PixelFormat::Yuyv => {
                let rgb = frame::yuyv_to_rgb(bytes, self.width, self.height)?;
                Ok(frame::encode_jpeg(
                    &rgb,
                    self.width,
                    self.height,
                    self.jpeg_quality,
                )?)
            }
        }
    }

    /// List available V4L2 video capture devices.
    pub fn list_devices() -> Vec<DeviceInfo> {
        let mut devices = Vec::new();

        for i in 0..16 {
            let path = format!("/dev/video{i}");
            if !Path::new(&path).exists() {
                continue;
            }
            let Ok(dev) = Device::with_path(&path) else {
                continue;
            };
            let Ok(caps) = dev.query_caps() else {
                continue;
            };
            if !caps.capabilities.contains(v4l::capability::Flags::VIDEO_CAPTURE) {
                continue;
            }
            devices.push(DeviceInfo {
                path,
                name: caps.card.clone(),
                driver: caps.driver.clone(),
                bus: caps.bus.clone(),
            });
        }

        devices
    }
}

impl PhotoSource for Camera {
    fn capture(&self) -> Result<InlineImage, CaptureError> {
        let jpeg = self
            .capture_jpeg()
            .map_err(|e| CaptureError::Source(e.to_string()))?;
        // An empty buffer means the driver handed back nothing usable.
        InlineImage::from_bytes("image/jpeg", &jpeg).map_err(|_| CaptureError::NoImage)
    }
}
