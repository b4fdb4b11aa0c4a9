//! Outbound email
//!
//! Messages are handed to a [`Mailer`]. Request handlers never wait on
//! delivery: [`dispatch`] detaches the send and only logs failures.

pub mod http;
pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

pub use http::HttpMailer;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Mail provider rejected message: {status} {body}")]
    Rejected { status: u16, body: String },
}

/// A rendered email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: Option<String>,
}

impl EmailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, text_body: String) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            text_body,
            html_body: None,
        }
    }

    pub fn with_html_body(mut self, body: String) -> Self {
        self.html_body = Some(body);
        self
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError>;
}

/// Mailer used when no provider API key is configured.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "Mail provider not configured, email logged instead:\n{}",
            message.text_body
        );
        Ok(())
    }
}

/// Test double that keeps every message in memory.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingMailer {
    sent: std::sync::Mutex<Vec<EmailMessage>>,
}

#[cfg(test)]
impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message);
        }
        Ok(())
    }
}

/// Send in the background. Failures are logged and dropped, never retried.
pub fn dispatch(mailer: Arc<dyn Mailer>, message: EmailMessage) {
    tokio::spawn(async move {
        let to = message.to.clone();
        let subject = message.subject.clone();
        match mailer.send(message).await {
            Ok(()) => {
                metrics::counter!("emails_dispatched_total", "outcome" => "sent").increment(1);
                info!(to = %to, subject = %subject, "Email dispatched");
            }
            Err(e) => {
                metrics::counter!("emails_dispatched_total", "outcome" => "failed").increment(1);
                warn!(to = %to, subject = %subject, error = %e, "Email dispatch failed");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _message: EmailMessage) -> Result<(), MailError> {
            Err(MailError::Rejected {
                status: 500,
                body: "down".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn dispatch_delivers_in_background() {
        let mailer = Arc::new(RecordingMailer::new());
        dispatch(
            mailer.clone(),
            EmailMessage::new("a@example.nl", "Hallo", "tekst".to_string()),
        );

        for _ in 0..50 {
            if !mailer.sent().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(mailer.sent().len(), 1);
        assert_eq!(mailer.sent()[0].subject, "Hallo");
    }

    #[tokio::test]
    async fn dispatch_failure_does_not_panic() {
        dispatch(
            Arc::new(FailingMailer),
            EmailMessage::new("a@example.nl", "Hallo", "tekst".to_string()),
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
