//! JSON wire contract with the attendance backend.
//!
//! Field names here are the protocol, not a convenience: the backend
//! looks them up verbatim. Responses are decoded through these types so
//! a missing or mistyped field fails the decode instead of leaking
//! absent values into the result model.

use crate::types::{EnrollmentRequest, RecognitionRequest};
use serde::{Deserialize, Serialize};

/// Body of `POST /add_person`: exactly three string keys.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollBody {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    /// Full data URL of the captured photo.
    pub photo: String,
}

impl From<&EnrollmentRequest> for EnrollBody {
    fn from(request: &EnrollmentRequest) -> Self {
        Self {
            first_name: request.identity.first_name.clone(),
            last_name: request.identity.last_name.clone(),
            photo: request.photo.to_data_url(),
        }
    }
}

/// Body of `POST /recognize_faces`: a single key.
#[derive(Debug, Clone, Serialize)]
pub struct RecognizeBody {
    /// Full data URL of the captured photo.
    pub image: String,
}

impl From<&RecognitionRequest> for RecognizeBody {
    fn from(request: &RecognitionRequest) -> Self {
        Self {
            image: request.photo.to_data_url(),
        }
    }
}

/// One face entry in a `recognize_faces` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFace {
    pub name: String,
    pub confidence: f64,
    /// Pixel offsets in backend order: [top, right, bottom, left].
    #[serde(rename = "box")]
    pub bounding_box: [f64; 4],
    /// Data URL of the cropped face, supplied verbatim by the backend.
    #[serde(rename = "photoDataUrl")]
    pub photo_data_url: String,
}

/// Full `recognize_faces` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAttendanceResponse {
    pub recognized_faces: Vec<RawFace>,
    /// Annotated group photo as bare base64 (no data-URL prefix).
    pub image_base64: String,
}
