//! # Notifications
//!
//! The client reports every failed call exactly once through a [`Notifier`].
//! A front end decides how that looks (toast, stderr line, log entry).

use std::sync::Mutex;

use tracing::{error, info};

pub trait Notifier: Send + Sync {
    /// A call failed. Called once per failure with the user-facing message.
    fn error(&self, message: &str);

    fn success(&self, _message: &str) {}
}

/// Sends notifications to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        error!(notification = message, "Request failed");
    }

    fn success(&self, message: &str) {
        info!(notification = message, "Request succeeded");
    }
}

/// Keeps every error message it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors
            .lock()
            .map(|errors| errors.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        let mut errors = self
            .errors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        errors.push(message.to_string());
    }
}
