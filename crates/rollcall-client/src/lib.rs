//! rollcall-client — HTTP recognition client and flow orchestration.
//!
//! Talks to the remote attendance backend over its fixed JSON contract
//! and runs the capture-submit-render flows.

pub mod api;
pub mod config;
pub mod pipeline;

pub use api::{ApiError, HttpRecognitionClient, RecognitionApi};
pub use config::Config;
pub use pipeline::{AttendancePipeline, FlowError};
