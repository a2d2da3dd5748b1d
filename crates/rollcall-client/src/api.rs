//! HTTP client for the remote recognition backend.

use reqwest::header::CONTENT_TYPE;
use rollcall_core::types::{EnrollmentRequest, RecognitionRequest};
use rollcall_core::wire::{EnrollBody, RawAttendanceResponse, RecognizeBody};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server returned HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The two backend operations, behind a seam so flows can run against a
/// fake in tests. Neither operation retries; the caller decides
/// presentation of failures.
#[allow(async_fn_in_trait)]
pub trait RecognitionApi {
    /// `POST /add_person`. The success payload is backend-defined JSON.
    async fn enroll(&self, request: &EnrollmentRequest) -> Result<serde_json::Value, ApiError>;

    /// `POST /recognize_faces`, decoded through the typed wire schema.
    async fn recognize(
        &self,
        request: &RecognitionRequest,
    ) -> Result<RawAttendanceResponse, ApiError>;
}

/// reqwest-backed client against a fixed base address.
pub struct HttpRecognitionClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpRecognitionClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Check the status and read the body, distinguishing transport and
    /// HTTP-level failures from undecodable payloads.
    async fn read_body(response: reqwest::Response) -> Result<String, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %detail, "backend rejected request");
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

impl RecognitionApi for HttpRecognitionClient {
    async fn enroll(&self, request: &EnrollmentRequest) -> Result<serde_json::Value, ApiError> {
        let body = EnrollBody::from(request);
        tracing::debug!(
            first_name = %body.first_name,
            last_name = %body.last_name,
            "submitting enrollment"
        );

        let response = self
            .http
            .post(self.endpoint("add_person"))
            .json(&body)
            .send()
            .await?;

        let text = Self::read_body(response).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn recognize(
        &self,
        request: &RecognitionRequest,
    ) -> Result<RawAttendanceResponse, ApiError> {
        let body = RecognizeBody::from(request);
        tracing::debug!(image_len = body.image.len(), "submitting recognition");

        // Some backend deployments are strict about content negotiation;
        // declare the JSON content type explicitly.
        let response = self
            .http
            .post(self.endpoint("recognize_faces"))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let text = Self::read_body(response).await?;
        Ok(serde_json::from_str(&text)?)
    }
}
