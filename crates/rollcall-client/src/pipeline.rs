//! Attendance flow orchestrator.
//!
//! Each user action runs one sequential flow: capture, submit, then map
//! and render. Every failure is converted to a single user notification
//! at this boundary and the pipeline returns to idle, ready for the next
//! attempt. Nothing here retries.

use crate::api::{ApiError, RecognitionApi};
use rollcall_core::capability::{CaptureError, Notice, Notifier, PhotoSource};
use rollcall_core::mapper::{self, MapError};
use rollcall_core::types::{
    AttendanceResult, EnrollmentRequest, PersonIdentity, RecognitionRequest,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("another flow is already in progress")]
    Busy,
    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),
    #[error("request failed: {0}")]
    Api(#[from] ApiError),
    #[error("response mapping failed: {0}")]
    Map(#[from] MapError),
}

#[derive(Clone, Copy)]
enum Flow {
    Enroll,
    Recognize,
}

/// Composes the photo source, recognition API, and notifier for the two
/// user flows. Owns the last attendance result, which is replaced
/// wholesale on each successful recognition.
pub struct AttendancePipeline<P, R, N> {
    photos: P,
    api: R,
    notifier: N,
    notice_duration: Duration,
    busy: AtomicBool,
    last_result: Mutex<Option<AttendanceResult>>,
}

/// Clears the busy flag when a flow ends, on any exit path.
struct FlowGuard<'a>(&'a AtomicBool);

impl Drop for FlowGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<P, R, N> AttendancePipeline<P, R, N>
where
    P: PhotoSource,
    R: RecognitionApi,
    N: Notifier,
{
    pub fn new(photos: P, api: R, notifier: N, notice_duration: Duration) -> Self {
        Self {
            photos,
            api,
            notifier,
            notice_duration,
            busy: AtomicBool::new(false),
            last_result: Mutex::new(None),
        }
    }

    /// Capture a photo and enroll it under the given identity.
    pub async fn enroll_flow(&self, identity: &PersonIdentity) -> Result<(), FlowError> {
        let _guard = self.begin()?;

        match self.run_enroll(identity).await {
            Ok(ack) => {
                tracing::info!(?ack, "enrollment accepted");
                self.notifier
                    .notify(&Notice::success("Person added successfully", self.notice_duration));
                Ok(())
            }
            Err(error) => Err(self.fail(Flow::Enroll, error)),
        }
    }

    /// Capture a photo, check attendance, and replace the stored result.
    pub async fn recognize_flow(&self) -> Result<AttendanceResult, FlowError> {
        let _guard = self.begin()?;

        match self.run_recognize().await {
            Ok(result) => {
                tracing::info!(faces = result.recognized_faces.len(), "attendance checked");
                *self.last_result.lock().expect("result lock poisoned") = Some(result.clone());
                self.notifier
                    .notify(&Notice::success("Attendance checked", self.notice_duration));
                Ok(result)
            }
            Err(error) => Err(self.fail(Flow::Recognize, error)),
        }
    }

    /// The result of the most recent successful recognition, if any.
    pub fn last_result(&self) -> Option<AttendanceResult> {
        self.last_result
            .lock()
            .expect("result lock poisoned")
            .clone()
    }

    fn begin(&self) -> Result<FlowGuard<'_>, FlowError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            tracing::debug!("flow rejected: another flow in progress");
            return Err(FlowError::Busy);
        }
        Ok(FlowGuard(&self.busy))
    }

    async fn run_enroll(&self, identity: &PersonIdentity) -> Result<serde_json::Value, FlowError> {
        tracing::debug!("enroll: capturing");
        let photo = self.photos.capture()?;

        tracing::debug!(mime = %photo.mime_type, "enroll: submitting");
        let request = EnrollmentRequest {
            identity: identity.clone(),
            photo,
        };
        Ok(self.api.enroll(&request).await?)
    }

    async fn run_recognize(&self) -> Result<AttendanceResult, FlowError> {
        tracing::debug!("recognize: capturing");
        let photo = self.photos.capture()?;

        tracing::debug!(mime = %photo.mime_type, "recognize: submitting");
        let raw = self.api.recognize(&RecognitionRequest { photo }).await?;

        tracing::debug!(faces = raw.recognized_faces.len(), "recognize: rendering");
        Ok(mapper::to_attendance_result(&raw)?)
    }

    /// Log the cause and emit exactly one error notice. Raw error detail
    /// stays in the log; the user sees only a flow-level message.
    fn fail(&self, flow: Flow, error: FlowError) -> FlowError {
        tracing::error!(%error, "flow failed");
        let message = match (&error, flow) {
            (FlowError::Capture(_), _) => "Error taking picture",
            (_, Flow::Enroll) => "Error uploading image",
            (_, Flow::Recognize) => "Error checking attendance",
        };
        self.notifier
            .notify(&Notice::error(message, self.notice_duration));
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::capability::Severity;
    use rollcall_core::types::InlineImage;
    use rollcall_core::wire::{RawAttendanceResponse, RawFace};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use tokio::sync::Notify;

    const NOTICE_TTL: Duration = Duration::from_millis(2000);

    fn photo() -> InlineImage {
        InlineImage::from_bytes("image/jpeg", b"fakejpeg").unwrap()
    }

    fn alice_response() -> RawAttendanceResponse {
        RawAttendanceResponse {
            recognized_faces: vec![RawFace {
                name: "Alice".into(),
                confidence: 0.93,
                bounding_box: [10.0, 50.0, 60.0, 5.0],
                photo_data_url: "data:image/png;base64,AAAA".into(),
            }],
            image_base64: "QkJC".into(),
        }
    }

    struct FakePhotos {
        image: Option<InlineImage>,
    }

    impl PhotoSource for FakePhotos {
        fn capture(&self) -> Result<InlineImage, CaptureError> {
            self.image.clone().ok_or(CaptureError::NoImage)
        }
    }

    struct FakeApi {
        calls: Arc<AtomicUsize>,
        fail_status: Option<u16>,
        response: RawAttendanceResponse,
        gate: Option<Arc<Notify>>,
    }

    impl FakeApi {
        fn ok(calls: Arc<AtomicUsize>) -> Self {
            Self {
                calls,
                fail_status: None,
                response: alice_response(),
                gate: None,
            }
        }

        fn failing(calls: Arc<AtomicUsize>, status: u16) -> Self {
            Self {
                fail_status: Some(status),
                ..Self::ok(calls)
            }
        }
    }

    impl RecognitionApi for FakeApi {
        async fn enroll(&self, _: &EnrollmentRequest) -> Result<serde_json::Value, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.fail_status {
                Some(status) => Err(ApiError::Status(status)),
                None => Ok(serde_json::json!({"message": "Person added successfully"})),
            }
        }

        async fn recognize(
            &self,
            _: &RecognitionRequest,
        ) -> Result<RawAttendanceResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match self.fail_status {
                Some(status) => Err(ApiError::Status(status)),
                None => Ok(self.response.clone()),
            }
        }
    }

    #[derive(Clone)]
    struct FakeNotifier {
        notices: Arc<Mutex<Vec<Notice>>>,
    }

    impl FakeNotifier {
        fn new() -> Self {
            Self {
                notices: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn severities(&self) -> Vec<Severity> {
            self.notices
                .lock()
                .unwrap()
                .iter()
                .map(|n| n.severity)
                .collect()
        }
    }

    impl Notifier for FakeNotifier {
        fn notify(&self, notice: &Notice) {
            self.notices.lock().unwrap().push(notice.clone());
        }
    }

    #[tokio::test]
    async fn enroll_success_notifies_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let notifier = FakeNotifier::new();
        let pipeline = AttendancePipeline::new(
            FakePhotos { image: Some(photo()) },
            FakeApi::ok(calls.clone()),
            notifier.clone(),
            NOTICE_TTL,
        );

        let identity = PersonIdentity {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
        };
        pipeline.enroll_flow(&identity).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.severities(), vec![Severity::Success]);
    }

    #[tokio::test]
    async fn capture_failure_never_touches_network() {
        let calls = Arc::new(AtomicUsize::new(0));
        let notifier = FakeNotifier::new();
        let pipeline = AttendancePipeline::new(
            FakePhotos { image: None },
            FakeApi::ok(calls.clone()),
            notifier.clone(),
            NOTICE_TTL,
        );

        let result = pipeline.recognize_flow().await;
        assert!(matches!(result, Err(FlowError::Capture(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let notices = notifier.notices.lock().unwrap().clone();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity, Severity::Error);
        assert_eq!(notices[0].message, "Error taking picture");
    }

    #[tokio::test]
    async fn recognize_success_stores_result() {
        let calls = Arc::new(AtomicUsize::new(0));
        let notifier = FakeNotifier::new();
        let pipeline = AttendancePipeline::new(
            FakePhotos { image: Some(photo()) },
            FakeApi::ok(calls),
            notifier.clone(),
            NOTICE_TTL,
        );

        let result = pipeline.recognize_flow().await.unwrap();
        assert_eq!(result.recognized_faces.len(), 1);
        assert_eq!(result.recognized_faces[0].name, "Alice");
        assert_eq!(result.recognized_faces[0].confidence, 0.93);
        assert_eq!(
            result.annotated_image.decode_bytes().unwrap(),
            b"BBB".to_vec()
        );
        assert_eq!(pipeline.last_result(), Some(result));
        assert_eq!(notifier.severities(), vec![Severity::Success]);
    }

    #[tokio::test]
    async fn server_error_leaves_displayed_result_unchanged() {
        let calls = Arc::new(AtomicUsize::new(0));
        let notifier = FakeNotifier::new();
        let pipeline = AttendancePipeline::new(
            FakePhotos { image: Some(photo()) },
            FakeApi::ok(calls.clone()),
            notifier.clone(),
            NOTICE_TTL,
        );
        let first = pipeline.recognize_flow().await.unwrap();

        // Same pipeline shape, now against a failing backend.
        let failing = AttendancePipeline::new(
            FakePhotos { image: Some(photo()) },
            FakeApi::failing(calls, 500),
            notifier.clone(),
            NOTICE_TTL,
        );
        *failing.last_result.lock().unwrap() = Some(first.clone());

        let result = failing.recognize_flow().await;
        assert!(matches!(result, Err(FlowError::Api(ApiError::Status(500)))));
        assert_eq!(failing.last_result(), Some(first));

        let notices = notifier.notices.lock().unwrap().clone();
        assert_eq!(notices.last().unwrap().message, "Error checking attendance");
        assert_eq!(
            notifier.severities(),
            vec![Severity::Success, Severity::Error]
        );
    }

    #[tokio::test]
    async fn enroll_api_failure_uses_upload_message() {
        let calls = Arc::new(AtomicUsize::new(0));
        let notifier = FakeNotifier::new();
        let pipeline = AttendancePipeline::new(
            FakePhotos { image: Some(photo()) },
            FakeApi::failing(calls, 400),
            notifier.clone(),
            NOTICE_TTL,
        );

        let result = pipeline.enroll_flow(&PersonIdentity::default()).await;
        assert!(result.is_err());

        let notices = notifier.notices.lock().unwrap().clone();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Error uploading image");
    }

    #[tokio::test]
    async fn second_flow_is_rejected_while_first_in_flight() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());
        let notifier = FakeNotifier::new();

        let mut api = FakeApi::ok(calls.clone());
        api.gate = Some(gate.clone());

        let pipeline = Arc::new(AttendancePipeline::new(
            FakePhotos { image: Some(photo()) },
            api,
            notifier,
            NOTICE_TTL,
        ));

        let in_flight = {
            let pipeline = pipeline.clone();
            tokio::spawn(async move { pipeline.recognize_flow().await })
        };

        // Wait for the first flow to reach the (gated) network stage.
        while calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let second = pipeline.recognize_flow().await;
        assert!(matches!(second, Err(FlowError::Busy)));

        gate.notify_one();
        in_flight.await.unwrap().unwrap();

        // Flow resolved; the pipeline accepts actions again.
        gate.notify_one();
        assert!(pipeline.recognize_flow().await.is_ok());
    }
}
