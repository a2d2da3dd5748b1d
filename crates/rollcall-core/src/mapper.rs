//! Mapping from the backend's raw response to the internal result model.
//!
//! This is the single seam between the backend's JSON contract and the
//! rest of the client: a schema change on the server side should only
//! ever require edits here and in [`crate::wire`].

use crate::types::{AttendanceResult, ImageError, InlineImage, RecognizedFace};
use crate::wire::{RawAttendanceResponse, RawFace};
use thiserror::Error;

/// The backend encodes the annotated photo as JPEG.
const ANNOTATED_MIME: &str = "image/jpeg";

#[derive(Error, Debug)]
pub enum MapError {
    #[error("annotated image is not decodable base64: {0}")]
    BadAnnotatedImage(#[source] ImageError),
}

/// Normalize a raw `recognize_faces` response into an [`AttendanceResult`].
///
/// Faces are mapped 1:1 in response order; nothing is merged, dropped, or
/// reordered, and bounding-box geometry passes through untouched. A face
/// whose cropped image fails to decode keeps its entry with
/// `cropped_image: None`. An undecodable annotated image rejects the whole
/// response, since there is nothing left to render.
pub fn to_attendance_result(raw: &RawAttendanceResponse) -> Result<AttendanceResult, MapError> {
    let annotated_image = InlineImage::from_base64(ANNOTATED_MIME, raw.image_base64.clone())
        .map_err(MapError::BadAnnotatedImage)?;

    let recognized_faces = raw.recognized_faces.iter().map(map_face).collect();

    Ok(AttendanceResult {
        recognized_faces,
        annotated_image,
    })
}

fn map_face(raw: &RawFace) -> RecognizedFace {
    let cropped_image = match InlineImage::from_data_url(&raw.photo_data_url) {
        Ok(image) => Some(image),
        Err(error) => {
            tracing::warn!(
                face = %raw.name,
                %error,
                "per-face image from backend does not decode; keeping face without crop"
            );
            None
        }
    };

    RecognizedFace {
        name: raw.name.clone(),
        confidence: raw.confidence,
        bounding_box: raw.bounding_box.into(),
        cropped_image,
    }
}
