//! Notifier implementations. The actual mail transport is a deployment
//! concern kept behind the `Notifier` trait; this crate carries the
//! logging implementation the binaries wire in by default, plus the
//! fakes the rest of the workspace tests against.

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

use vaultfund_core::{Notifier, NotifyBody, VaultError};

/// Writes every send to the log instead of a wire. `from` identifies the
/// configured sender so operators can trace which identity a deployment
/// would mail from.
pub struct LogNotifier {
    from: String,
}

impl LogNotifier {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        body: &NotifyBody,
    ) -> Result<(), VaultError> {
        info!(
            "notification from={} to={} subject={:?} bytes={}",
            self.from,
            recipient,
            subject,
            body.text().len()
        );
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub recipient: String,
    pub subject: String,
    pub body: NotifyBody,
}

/// Captures every send for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentNotification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().expect("notifier lock poisoned").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        body: &NotifyBody,
    ) -> Result<(), VaultError> {
        self.sent
            .lock()
            .expect("notifier lock poisoned")
            .push(SentNotification {
                recipient: recipient.to_string(),
                subject: subject.to_string(),
                body: body.clone(),
            });
        Ok(())
    }
}

/// Fails every send, optionally only for one recipient. Used to verify
/// that primary operations and digest runs shrug off notifier failures.
#[derive(Default)]
pub struct FailingNotifier {
    only_recipient: Option<String>,
    attempted: Mutex<Vec<String>>,
}

impl FailingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_recipient(recipient: impl Into<String>) -> Self {
        Self {
            only_recipient: Some(recipient.into()),
            attempted: Mutex::new(Vec::new()),
        }
    }

    pub fn attempted(&self) -> Vec<String> {
        self.attempted.lock().expect("notifier lock poisoned").clone()
    }
}

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(
        &self,
        recipient: &str,
        _subject: &str,
        _body: &NotifyBody,
    ) -> Result<(), VaultError> {
        self.attempted
            .lock()
            .expect("notifier lock poisoned")
            .push(recipient.to_string());

        let fails = self
            .only_recipient
            .as_deref()
            .is_none_or(|only| only == recipient);

        if fails {
            return Err(VaultError::Notification {
                recipient: recipient.to_string(),
                reason: "transport unavailable".to_string(),
            });
        }

        Ok(())
    }
}
