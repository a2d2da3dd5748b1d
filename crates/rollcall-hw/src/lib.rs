//! rollcall-hw — Photo capture for the attendance client.
//!
//! Provides a V4L2-backed camera and a file-backed source, both exposed
//! through the `PhotoSource` capability from rollcall-core.

pub mod camera;
pub mod frame;
pub mod photo_file;

pub use camera::{Camera, CameraError, DeviceInfo, PixelFormat};
pub use photo_file::FileSource;
