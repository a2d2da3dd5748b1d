//! Capability seams for the flow orchestrator.
//!
//! The camera and the notifier are injected interfaces rather than
//! ambient singletons so tests can substitute fakes.

use crate::types::InlineImage;
use std::time::Duration;
use thiserror::Error;

/// A failed capture is a normal outcome (user cancelled, permission
/// denied, hardware error), not an exceptional program state. Callers
/// branch on it explicitly and never retry.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("camera returned no image data")]
    NoImage,
    #[error("capture failed: {0}")]
    Source(String),
}

/// Produces exactly one photo per call, at maximum quality, already in
/// inline (data URL) form so it is network-transmissible without further
/// I/O.
pub trait PhotoSource {
    fn capture(&self) -> Result<InlineImage, CaptureError>;
}

impl<T: PhotoSource + ?Sized> PhotoSource for Box<T> {
    fn capture(&self) -> Result<InlineImage, CaptureError> {
        (**self).capture()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Top,
    Middle,
    Bottom,
}

/// One user-facing notification. Carries presentation hints only; never
/// raw error detail.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub duration: Duration,
    pub position: Position,
    pub severity: Severity,
}

impl Notice {
    pub fn success(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            duration,
            position: Position::Bottom,
            severity: Severity::Success,
        }
    }

    pub fn error(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            duration,
            position: Position::Bottom,
            severity: Severity::Error,
        }
    }
}

/// Fire-and-forget message presentation. Implementations must not block
/// the flow; the orchestrator does not await completion.
pub trait Notifier {
    fn notify(&self, notice: &Notice);
}
