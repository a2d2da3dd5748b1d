use base64::engine::{DecodePaddingMode, Engine, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard-alphabet base64, indifferent to padding on decode.
///
/// The backend emits padded base64 but some payloads arrive stripped;
/// accept both rather than failing on a cosmetic difference.
const B64: GeneralPurpose = GeneralPurpose::new(
    &base64::alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("not a data URL: missing `data:` prefix")]
    MissingPrefix,
    #[error("data URL is not base64-encoded")]
    NotBase64,
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("image payload is empty")]
    EmptyPayload,
}

/// A self-contained inline image: MIME type plus base64-encoded bytes.
///
/// Equivalent to a single data URL (`data:<mime>;base64,<data>`), which is
/// how images travel to and from the backend. Immutable once constructed;
/// every constructor enforces that the payload decodes to at least one byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    pub mime_type: String,
    base64_data: String,
}

impl InlineImage {
    /// Encode raw bytes under the given MIME type.
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::EmptyPayload);
        }
        Ok(Self {
            mime_type: mime_type.into(),
            base64_data: B64.encode(bytes),
        })
    }

    /// Wrap an already base64-encoded payload, validating that it decodes.
    pub fn from_base64(
        mime_type: impl Into<String>,
        base64_data: String,
    ) -> Result<Self, ImageError> {
        let decoded = B64.decode(base64_data.as_bytes())?;
        if decoded.is_empty() {
            return Err(ImageError::EmptyPayload);
        }
        Ok(Self {
            mime_type: mime_type.into(),
            base64_data,
        })
    }

    /// Parse a `data:<mime>;base64,<data>` string.
    pub fn from_data_url(url: &str) -> Result<Self, ImageError> {
        let rest = url.strip_prefix("data:").ok_or(ImageError::MissingPrefix)?;
        let (mime_type, data) = rest.split_once(";base64,").ok_or(ImageError::NotBase64)?;
        Self::from_base64(mime_type, data.to_string())
    }

    /// Render as a data URL, the form the backend expects on the wire.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data)
    }

    /// Decode the payload back to raw bytes.
    pub fn decode_bytes(&self) -> Result<Vec<u8>, ImageError> {
        Ok(B64.decode(self.base64_data.as_bytes())?)
    }

    pub fn base64_data(&self) -> &str {
        &self.base64_data
    }
}

/// Identity fields attached to an enrollment. Either field may be an
/// empty string; neither is ever absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonIdentity {
    pub first_name: String,
    pub last_name: String,
}

/// Face bounding box as four pixel offsets, in the backend's order.
///
/// Untrusted geometry: the backend defines the coordinate semantics and
/// nothing here guarantees `top <= bottom` or `left <= right`. Passed
/// through verbatim for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceBox {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl From<[f64; 4]> for FaceBox {
    fn from([top, right, bottom, left]: [f64; 4]) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// One recognized face from an attendance check.
///
/// `cropped_image` is `None` when the backend supplied a per-face image
/// that does not decode; the face itself is still reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognizedFace {
    pub name: String,
    /// Match confidence in [0, 1] as reported by the backend.
    pub confidence: f64,
    pub bounding_box: FaceBox,
    pub cropped_image: Option<InlineImage>,
}

/// Result of one attendance check: faces in backend response order plus
/// the annotated group photo. Replaced wholesale on each new check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceResult {
    pub recognized_faces: Vec<RecognizedFace>,
    pub annotated_image: InlineImage,
}

/// Inputs for the two backend operations.
#[derive(Debug, Clone)]
pub struct EnrollmentRequest {
    pub identity: PersonIdentity,
    pub photo: InlineImage,
}

#[derive(Debug, Clone)]
pub struct RecognitionRequest {
    pub photo: InlineImage,
}
