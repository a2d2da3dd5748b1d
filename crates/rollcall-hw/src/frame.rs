//! Raw frame handling — YUYV to RGB conversion and JPEG encoding.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("invalid YUYV length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("JPEG encode failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Convert packed YUYV (4:2:2) to RGB24 using BT.601 full-range math.
///
/// YUYV packs two pixels per 4 bytes: [Y0, U, Y1, V]; U and V are shared
/// by the pixel pair.
pub fn yuyv_to_rgb(yuyv: &[u8], width: u32, height: u32) -> Result<Vec<u8>, FrameError> {
    let expected = (width * height * 2) as usize;
    if yuyv.len() < expected {
        return Err(FrameError::InvalidLength {
            expected,
            actual: yuyv.len(),
        });
    }

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for chunk in yuyv[..expected].chunks_exact(4) {
        let [y0, u, y1, v] = [chunk[0], chunk[1], chunk[2], chunk[3]];
        rgb.extend_from_slice(&ycbcr_to_rgb(y0, u, v));
        rgb.extend_from_slice(&ycbcr_to_rgb(y1, u, v));
    }
    Ok(rgb)
}

/// BT.601 YCbCr to RGB, integer arithmetic.
fn ycbcr_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let c = y as i32 - 16;
    let d = u as i32 - 128;
    let e = v as i32 - 128;

    let r = (298 * c + 409 * e + 128) >> 8;
    let g = (298 * c - 100 * d - 208 * e + 128) >> 8;
    let b = (298 * c + 516 * d + 128) >> 8;

    [clamp_u8(r), clamp_u8(g), clamp_u8(b)]
}

fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Encode an RGB24 buffer as JPEG at the given quality (1-100).
pub fn encode_jpeg(rgb: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>, FrameError> {
    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, quality);
    encoder.encode(rgb, width, height, ExtendedColorType::Rgb8)?;
    Ok(jpeg)
}
