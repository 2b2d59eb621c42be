//! Haptic notification feedback

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Warning,
    Error,
}

impl FeedbackKind {
    pub fn as_raw(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Warning => 1,
            Self::Error => 2,
        }
    }
}

impl fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Plays notification-class feedback; called on the scene's own thread only
pub trait FeedbackGenerator {
    fn notification_occurred(&self, kind: FeedbackKind);
}

/// For hosts without a haptic engine
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFeedback;

impl FeedbackGenerator for LogFeedback {
    fn notification_occurred(&self, kind: FeedbackKind) {
        log::info!("Feedback: {}", kind);
    }
}
