//! File-backed photo source.
//!
//! Serves an image file as an inline photo, for running without a
//! camera or submitting a previously captured shot.

use rollcall_core::capability::{CaptureError, PhotoSource};
use rollcall_core::types::InlineImage;
use std::path::PathBuf;

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PhotoSource for FileSource {
    fn capture(&self) -> Result<InlineImage, CaptureError> {
        let bytes = std::fs::read(&self.path)
            .map_err(|e| CaptureError::Source(format!("{}: {e}", self.path.display())))?;

        // Sniff the container format from magic bytes; the backend decodes
        // any common format, so the file is passed through unmodified.
        let format = image::guess_format(&bytes).map_err(|_| CaptureError::NoImage)?;
        let mime_type = format.to_mime_type();

        tracing::debug!(
            path = %self.path.display(),
            mime = mime_type,
            len = bytes.len(),
            "loaded photo from file"
        );

        InlineImage::from_bytes(mime_type, &bytes).map_err(|_| CaptureError::NoImage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rollcall-hw-{}-{name}", std::process::id()))
    }

    fn write_png(path: &PathBuf) -> Vec<u8> {
        let img = RgbImage::from_pixel(2, 2, image::Rgb([10, 20, 30]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        std::fs::write(path, &bytes).unwrap();
        bytes
    }

    #[test]
    fn serves_png_file_with_sniffed_mime() {
        let path = temp_path("ok.png");
        let bytes = write_png(&path);

        let image = FileSource::new(&path).capture().unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.decode_bytes().unwrap(), bytes);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_source_error() {
        let result = FileSource::new(temp_path("does-not-exist.jpg")).capture();
        assert!(matches!(result, Err(CaptureError::Source(_))));
    }

    #[test]
    fn unrecognized_bytes_are_no_image() {
        let path = temp_path("garbage.bin");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let result = FileSource::new(&path).capture();
        assert!(matches!(result, Err(CaptureError::NoImage)));

        std::fs::remove_file(&path).unwrap();
    }
}
