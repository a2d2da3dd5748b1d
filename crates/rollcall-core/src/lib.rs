//! rollcall-core — Attendance client core.
//!
//! Data model for inline images and recognition results, the JSON wire
//! contract with the backend, and the mapper that turns raw responses
//! into the client's internal shape.

pub mod capability;
pub mod mapper;
pub mod types;
pub mod wire;

pub use types::{AttendanceResult, FaceBox, InlineImage, PersonIdentity, RecognizedFace};
