use std::time::Duration;

/// Client configuration, loaded from environment variables.
///
/// The backend base address is fixed configuration: changing deployment
/// target means changing `ROLLCALL_API_URL`, not code.
pub struct Config {
    /// Backend base URL (default: http://127.0.0.1:5000).
    pub api_url: String,
    /// V4L2 device path (default: /dev/video0).
    pub camera_device: String,
    /// JPEG quality for captured photos, 1-100.
    pub jpeg_quality: u8,
    /// Timeout for each backend request.
    pub http_timeout: Duration,
    /// How long a user notification stays visible.
    pub notice_duration: Duration,
}

impl Config {
    /// Load configuration from `ROLLCALL_*` environment variables with defaults.
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("ROLLCALL_API_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:5000".to_string()),
            camera_device: std::env::var("ROLLCALL_CAMERA_DEVICE")
                .unwrap_or_else(|_| "/dev/video0".to_string()),
            jpeg_quality: env_u8("ROLLCALL_JPEG_QUALITY", 100),
            http_timeout: Duration::from_secs(env_u64("ROLLCALL_HTTP_TIMEOUT_SECS", 30)),
            notice_duration: Duration::from_millis(env_u64("ROLLCALL_NOTICE_DURATION_MS", 2000)),
        }
    }
}

fn env_u8(key: &str, default: u8) -> u8 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
