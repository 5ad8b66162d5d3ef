use std::time::Duration;

/// How long an info notice stays on screen.
pub const INFO_NOTICE_TTL: Duration = Duration::from_secs(5);

pub const RESTORED_MESSAGE: &str = "Previous progress restored";
pub const SUBMITTED_MESSAGE: &str = "Application submitted successfully";
pub const SERVER_ERROR_MESSAGE: &str = "An error occurred. Please try again.";
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your connection and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// Banner message shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    /// Info notices fade; success and error notices stay until replaced.
    #[must_use]
    pub fn auto_hide_after(&self) -> Option<Duration> {
        (self.kind == NoticeKind::Info).then_some(INFO_NOTICE_TTL)
    }
}
